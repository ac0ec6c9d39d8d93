//! Text utilities for the parsed tree

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::NodeId;

/// Collapse any run of whitespace to a single space and trim the ends
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flatten a subtree to normalized plain text.
///
/// Pre-order walk: a node's own text is appended before its children,
/// each child's tail after that child returns. Every fragment is
/// whitespace-normalized and the fragments are joined with single
/// spaces, which reproduces standard mixed-content flattening:
/// `<div>Hello <b>World</b>!</div>` becomes `Hello World !`.
pub fn flatten_text(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut acc = Vec::new();
    flatten_help(arena, node_id, &mut acc)?;
    Ok(acc.join(" "))
}

fn flatten_help(arena: &DomArena, node_id: NodeId, acc: &mut Vec<String>) -> Result<()> {
    let node = arena.get(node_id)?;
    if !node.text.trim().is_empty() {
        acc.push(normalize_whitespace(&node.text));
    }
    for &child_id in &node.children_ids {
        flatten_help(arena, child_id, acc)?;
        let child = arena.get(child_id)?;
        if !child.tail.trim().is_empty() {
            acc.push(normalize_whitespace(&child.tail));
        }
    }
    Ok(())
}
