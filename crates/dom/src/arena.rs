//! Arena-based tree storage
//!
//! A single `Vec<DomNode>` holds every element of a parsed document in
//! pre-order, so a linear scan of the arena is a document-order walk.
//! Nodes reference each other by 4-byte indices, never by pointer:
//! no Rc/Arc per node, no recursion needed to traverse, and everything
//! derived from a document (objects, links, forms) can hold plain
//! `NodeId` handles whose lifetime is bounded by the arena's.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};
use ahash::AHashMap;

/// Arena allocator for parsed element trees
///
/// Design:
/// - Single Vec<DomNode> in document pre-order
/// - HashMap for HTML id attribute → NodeId lookup
/// - No Rc/Arc: use indices everywhere
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly, document order)
    nodes: Vec<DomNode>,

    /// `id` attribute → first node carrying it, in document order.
    /// Duplicate ids keep the first occurrence, which is exactly the
    /// "find first descendant with id = X" lookup contract.
    id_map: AHashMap<String, NodeId>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(256),
            id_map: AHashMap::new(),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        if let Some(id_attr) = node.attr("id") {
            self.id_map.entry(id_attr.to_string()).or_insert(node_id);
        }
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self.root_id.ok_or(DomError::NoRoot)?;
        self.get(root_id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes in document order
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Traverse a subtree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find first descendant (from the document root) with the given
    /// `id` attribute. "Not found" is a normal outcome, not an error.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// Find all elements in a subtree with the given tag name, in
    /// document order
    pub fn find_by_tag(&self, start_id: NodeId, tag: &str) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        self.traverse_df(start_id, |node| {
            if node.tag == tag {
                out.push(node.node_id);
            }
            Ok(())
        })?;
        Ok(out)
    }

    /// Find all elements in the whole document with the given tag name
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.tag == tag)
            .map(|node| node.node_id)
            .collect()
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}
