//! HTML parsing into the arena
//!
//! html5ever (via `scraper`) does the actual tokenizing and tree
//! building; this module converts the resulting tree into a
//! [`DomArena`]: elements become nodes allocated in pre-order, and
//! interleaved text nodes are folded into the lxml-style `text`/`tail`
//! fields of the surrounding elements. Comments and doctypes carry no
//! protocol meaning and are dropped.
//!
//! The build pattern is: allocate the node first, recurse into its
//! children, then patch the child list back in.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;
use smallvec::SmallVec;

/// Parse an HTML document into an arena.
///
/// The arena root is the `<html>` element that html5ever synthesizes
/// even for fragments, so every document has exactly one root.
pub fn parse_html(input: &str) -> Result<DomArena> {
    let html = Html::parse_document(input);
    let mut arena = DomArena::new();

    let root_ref = html
        .tree
        .root()
        .children()
        .find(|child| child.value().is_element())
        .ok_or(DomError::NoRoot)?;

    let root_id = build_element(&mut arena, root_ref, None).ok_or(DomError::NoRoot)?;
    arena.set_root(root_id)?;
    Ok(arena)
}

/// Recursively convert one element (and its subtree) into arena nodes.
///
/// Returns None for non-element nodes so the caller can skip them.
fn build_element(
    arena: &mut DomArena,
    node_ref: NodeRef<'_, Node>,
    parent_id: Option<NodeId>,
) -> Option<NodeId> {
    let element = node_ref.value().as_element()?;

    let mut node = DomNode::new(element.name().to_ascii_lowercase());
    node.parent_id = parent_id;
    node.attributes = element
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let node_id = arena.add_node(node);

    let mut child_ids: SmallVec<[NodeId; 4]> = SmallVec::new();
    let mut last_child: Option<NodeId> = None;

    for child in node_ref.children() {
        match child.value() {
            Node::Text(text) => {
                // Text before any child element belongs to this node;
                // after a child element it is that child's tail.
                let target = last_child.unwrap_or(node_id);
                if let Ok(target_node) = arena.get_mut(target) {
                    if last_child.is_some() {
                        target_node.tail.push_str(&text);
                    } else {
                        target_node.text.push_str(&text);
                    }
                }
            }
            Node::Element(_) => {
                if let Some(child_id) = build_element(arena, child, Some(node_id)) {
                    child_ids.push(child_id);
                    last_child = Some(child_id);
                }
            }
            _ => {}
        }
    }

    if let Ok(node) = arena.get_mut(node_id) {
        node.children_ids = child_ids;
    }

    Some(node_id)
}
