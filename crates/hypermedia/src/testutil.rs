//! Test fixtures: an in-memory transport so navigation paths run
//! without sockets.

use crate::error::{ClientError, Result};
use crate::transport::Transport;
use crate::Document;
use ahash::AHashMap;
use std::sync::{Arc, Mutex};

/// Serves a fixed URL → HTML map. GETs must hit an exact key;
/// anything else is a 404-shaped status error. POST bodies are
/// recorded for assertions.
pub(crate) struct StaticTransport {
    pages: AHashMap<String, String>,
    pub posts: Mutex<Vec<(String, String)>>,
}

impl StaticTransport {
    pub fn new(pages: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            posts: Mutex::new(Vec::new()),
        })
    }

    fn page(&self, url: &str) -> Result<Vec<u8>> {
        self.pages
            .get(url)
            .map(|html| html.as_bytes().to_vec())
            .ok_or_else(|| ClientError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

impl Transport for StaticTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.page(url)
    }

    fn post(&self, url: &str, body: &str) -> Result<Vec<u8>> {
        self.posts
            .lock()
            .expect("posts lock")
            .push((url.to_string(), body.to_string()));
        self.page(url)
    }
}

/// Capture navigation logs in test output. Safe to call from every
/// test; only the first installation wins.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Parse a document directly, with the given transport backing any
/// navigation it triggers.
pub(crate) fn document(transport: Arc<StaticTransport>, url: &str) -> Document {
    init_tracing();
    crate::resolve_with(transport, url).expect("fixture document")
}
