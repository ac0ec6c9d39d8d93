//! Core tree type definitions
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most nodes have few children)
//! 3. Keep attributes as an ordered list, not a map — source order
//!    matters and attribute counts are tiny

use smallvec::SmallVec;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any webpage
pub type NodeId = u32;

/// A single element in the parsed tree.
///
/// This follows the lxml text/tail model: `text` is the character data
/// between the element's start tag and its first child element, `tail`
/// is the character data between this element's end tag and the next
/// sibling. That split is what makes mixed-content flattening exact.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Lowercased element name ("a", "form", "img", ...)
    pub tag: String,

    /// Attributes in source order
    pub attributes: Vec<(String, String)>,

    /// Immediate text before the first child element
    pub text: String,

    /// Text following this element's closing tag
    pub tail: String,
}

impl DomNode {
    /// Create a new element node with no children yet
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            node_id: 0,
            parent_id: None,
            children_ids: SmallVec::new(),
            tag: tag.into(),
            attributes: Vec::new(),
            text: String::new(),
            tail: String::new(),
        }
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether the attribute is present at all (valueless
    /// attributes like `itemscope` parse as empty strings)
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_lookup() {
        let mut node = DomNode::new("a");
        node.attributes.push(("href".to_string(), "/x".to_string()));
        node.attributes
            .push(("itemscope".to_string(), String::new()));

        assert_eq!(node.attr("href"), Some("/x"));
        assert_eq!(node.attr("rel"), None);
        assert!(node.has_attr("itemscope"));
        assert_eq!(node.attr("itemscope"), Some(""));
    }
}
