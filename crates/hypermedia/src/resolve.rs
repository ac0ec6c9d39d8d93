//! Value resolution - interpreting a tree node as a semantic value
//!
//! Design: values are an enum, not trait objects. A resolved value is
//! one of a nested object, an ordered list, an image URL, or flattened
//! text; absence is `Option::None` and never an error.

use crate::document::Document;
use crate::error::Result;
use crate::object::{is_object_marker, SemanticObject};
use ahash::AHashSet;
use dom::NodeId;

/// A value extracted from a document.
#[derive(Debug, Clone)]
pub enum Value {
    /// A nested semantic object (itemscope/itemtype node)
    Object(SemanticObject),
    /// An ordered list of values (multiple matches / top-level objects)
    List(Vec<Value>),
    /// An image source URL, verbatim and unfetched
    Url(String),
    /// Flattened, whitespace-normalized text
    Text(String),
}

impl Value {
    pub fn as_object(&self) -> Option<&SemanticObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            Value::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Interpret a node as a value.
///
/// Priority order:
/// 1. object marker ⇒ a [`SemanticObject`] over that node
/// 2. `<a href>` ⇒ same-document fragment resolution, or a fetch of
///    the href's base followed by document-default resolution
/// 3. `<img src>` ⇒ the source URL string
/// 4. anything else ⇒ flattened subtree text
pub fn resolve_node(doc: &Document, node_id: NodeId) -> Result<Option<Value>> {
    let mut visited = AHashSet::new();
    resolve_guarded(doc, node_id, &mut visited)
}

/// The visited set breaks cyclic `#id` chains within one document:
/// revisiting a node resolves to absent.
pub(crate) fn resolve_guarded(
    doc: &Document,
    node_id: NodeId,
    visited: &mut AHashSet<NodeId>,
) -> Result<Option<Value>> {
    if !visited.insert(node_id) {
        tracing::warn!("cyclic fragment chain at node {}, treating as absent", node_id);
        return Ok(None);
    }

    let node = doc.arena().get(node_id)?;

    if is_object_marker(node) {
        return Ok(Some(Value::Object(SemanticObject::new(
            doc.clone(),
            node_id,
        ))));
    }

    if node.tag == "a" {
        if let Some(href) = node.attr("href") {
            if let Some(fragment) = href.strip_prefix('#') {
                return match doc.arena().find_by_id(fragment) {
                    Some(target) => resolve_guarded(doc, target, visited),
                    None => Ok(None),
                };
            }
            let resolved = doc.url().join(href)?;
            let fragment = resolved.fragment().map(str::to_string);
            let mut base = resolved;
            base.set_fragment(None);
            let remote = doc.fetch(base.as_str())?;
            return remote.default_value(fragment.as_deref());
        }
    }

    if node.tag == "img" {
        if let Some(src) = node.attr("src") {
            return Ok(Some(Value::Url(src.to_string())));
        }
    }

    Ok(Some(Value::Text(dom::flatten_text(doc.arena(), node_id)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{document, StaticTransport};

    fn doc_with(html: &str) -> Document {
        let transport = StaticTransport::new(&[("http://site/page", html)]);
        document(transport, "http://site/page")
    }

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.arena().find_all(tag)[0]
    }

    #[test]
    fn test_marker_wins_over_tag() {
        let doc = doc_with("<a itemscope href=\"/x\">not followed</a>");
        let a = first(&doc, "a");
        let value = resolve_node(&doc, a).unwrap().unwrap();
        assert!(value.as_object().is_some());
    }

    #[test]
    fn test_image_is_src_verbatim() {
        let doc = doc_with("<img src=\"relative/pic.png\">");
        let img = first(&doc, "img");
        let value = resolve_node(&doc, img).unwrap().unwrap();
        assert_eq!(value.as_url(), Some("relative/pic.png"));
    }

    #[test]
    fn test_plain_node_flattens_to_text() {
        let doc = doc_with("<div>Hello <b>World</b>!</div>");
        let div = first(&doc, "div");
        let value = resolve_node(&doc, div).unwrap().unwrap();
        assert_eq!(value.as_text(), Some("Hello World !"));
    }

    #[test]
    fn test_fragment_anchor_resolves_target() {
        let doc = doc_with(
            "<a href=\"#v\">see</a><span id=\"v\">forty-two</span>",
        );
        let a = first(&doc, "a");
        let value = resolve_node(&doc, a).unwrap().unwrap();
        assert_eq!(value.as_text(), Some("forty-two"));
    }

    #[test]
    fn test_missing_fragment_is_absent() {
        let doc = doc_with("<a href=\"#nowhere\">dangling</a>");
        let a = first(&doc, "a");
        assert!(resolve_node(&doc, a).unwrap().is_none());
    }

    #[test]
    fn test_cyclic_fragment_chain_is_absent() {
        let doc = doc_with(
            "<a id=\"one\" href=\"#two\">1</a>\
             <a id=\"two\" href=\"#one\">2</a>",
        );
        let a = first(&doc, "a");
        assert!(resolve_node(&doc, a).unwrap().is_none());
    }

    #[test]
    fn test_remote_anchor_keeps_query_strips_fragment() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<a href=\"/data.html?v=1#part\">data</a>",
            ),
            (
                "http://site/data.html?v=1",
                "<div itemscope itemtype=\"Whole\"></div>\
                 <p id=\"part\">slice</p>",
            ),
        ]);
        let doc = document(transport, "http://site/page");
        let a = first(&doc, "a");

        let value = resolve_node(&doc, a).unwrap().unwrap();
        assert_eq!(value.as_text(), Some("slice"));
    }
}
