//! Error types for navigation and extraction
//!
//! Two kinds of failure exist in this protocol and they must not be
//! conflated: transport/structural failures are real errors and
//! surface undecorated; missing properties, relations, and fragment
//! ids are ordinary hypermedia outcomes and are modeled as `None`,
//! never as an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Tree error: {0}")]
    Dom(#[from] dom::DomError),

    #[error("<{tag}> missing required attribute '{attr}'")]
    MissingAttribute { tag: &'static str, attr: &'static str },
}
