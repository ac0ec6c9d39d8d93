//! Links - `<a rel=…>` navigation affordances
//!
//! A Link is a view: a document handle plus a node id. Following one
//! either resolves within the same document (fragment navigation) or
//! fetches a new one, and in both cases lands on whatever the target
//! document's default value is.

use crate::document::Document;
use crate::error::{ClientError, Result};
use crate::resolve::Value;
use dom::NodeId;
use std::fmt;

#[derive(Clone)]
pub struct Link {
    doc: Document,
    node: NodeId,
}

impl Link {
    pub(crate) fn new(doc: Document, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// The link's relation (`rel` attribute)
    pub fn rel(&self) -> Option<&str> {
        self.doc
            .arena()
            .get(self.node)
            .ok()
            .and_then(|node| node.attr("rel"))
    }

    /// The link's target. A captured link without an href is a
    /// structural violation and fails fast.
    pub fn href(&self) -> Result<&str> {
        self.doc
            .arena()
            .get(self.node)?
            .attr("href")
            .ok_or(ClientError::MissingAttribute {
                tag: "a",
                attr: "href",
            })
    }

    /// Follow the link and land on a value.
    ///
    /// The href is joined against the owning document's URL; with the
    /// query and fragment stripped it is compared against that URL.
    /// Equal means fragment navigation within the same document;
    /// anything else fetches the stripped base. Either way the result
    /// is the target document's default value under the resolved
    /// fragment.
    pub fn follow(&self) -> Result<Option<Value>> {
        let resolved = self.doc.url().join(self.href()?)?;
        let fragment = resolved.fragment().map(str::to_string);

        let mut base = resolved;
        base.set_fragment(None);
        base.set_query(None);

        if &base == self.doc.url() {
            self.doc.default_value(fragment.as_deref())
        } else {
            let remote = self.doc.fetch(base.as_str())?;
            remote.default_value(fragment.as_deref())
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.href() {
            Ok(href) => write!(f, "<Link {}>", href),
            Err(_) => write!(f, "<Link>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{document, StaticTransport};

    #[test]
    fn test_follow_local_fragment() {
        let transport = StaticTransport::new(&[(
            "http://site/page",
            "<a rel=\"detail\" href=\"#target\">go</a>\
             <p id=\"target\">found it</p>",
        )]);
        let doc = document(transport, "http://site/page");

        let value = doc.follow("detail").unwrap().unwrap();
        assert_eq!(value.as_text(), Some("found it"));
    }

    #[test]
    fn test_follow_remote() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<a rel=\"next\" href=\"/other.html\">next</a>",
            ),
            (
                "http://site/other.html",
                "<div itemscope itemtype=\"Thing\"></div>",
            ),
        ]);
        let doc = document(transport, "http://site/page");

        let value = doc.follow("next").unwrap().unwrap();
        assert_eq!(value.as_object().unwrap().itemtype(), Some("Thing"));
    }

    #[test]
    fn test_follow_remote_with_fragment() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<a rel=\"next\" href=\"/other.html#part\">next</a>",
            ),
            (
                "http://site/other.html",
                "<div itemscope itemtype=\"Whole\"></div>\
                 <p id=\"part\">a piece</p>",
            ),
        ]);
        let doc = document(transport, "http://site/page");

        let value = doc.follow("next").unwrap().unwrap();
        assert_eq!(value.as_text(), Some("a piece"));
    }

    #[test]
    fn test_follow_surfaces_transport_failure() {
        let transport = StaticTransport::new(&[(
            "http://site/page",
            "<a rel=\"next\" href=\"/gone.html\">next</a>",
        )]);
        let doc = document(transport, "http://site/page");

        assert!(doc.follow("next").is_err());
    }
}
