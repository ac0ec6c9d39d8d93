//! Microdata hypermedia client
//!
//! A client for APIs expressed as plain HTML annotated with microdata
//! (`itemscope`/`itemtype`/`itemprop`), where anchors and forms double
//! as the API's navigation and mutation affordances.
//!
//! ```text
//! resolve(url) → Document → SemanticObject indices → Value resolution
//!                                  │                        │
//!                                  └── Link / Form ─────────┘
//!                                       (may fetch new Documents)
//! ```
//!
//! - Documents are immutable; objects, links, and forms are cheap
//!   handles into them
//! - Object indices are lazy and built at most once
//! - Missing properties/relations/fragments are absent (`None`),
//!   never errors; only transport and structural failures are errors

pub mod document;
pub mod error;
pub mod form;
pub mod link;
pub mod object;
pub mod resolve;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use document::Document;
pub use error::{ClientError, Result};
pub use form::Form;
pub use link::Link;
pub use object::{FormMap, LinkMap, SemanticObject};
pub use resolve::{resolve_node, Value};
pub use transport::{ClientConfig, HttpTransport, Transport};

use std::sync::Arc;
use url::Url;

/// Evaluate an entry point over HTTP.
pub fn resolve(url: &str) -> Result<Document> {
    let transport = Arc::new(HttpTransport::new()?);
    resolve_with(transport, url)
}

/// Evaluate an entry point over an injected transport.
pub fn resolve_with(transport: Arc<dyn Transport>, url: &str) -> Result<Document> {
    let parsed = Url::parse(url)?;
    let body = transport.get(parsed.as_str())?;
    Document::from_bytes(&body, parsed, transport)
}
