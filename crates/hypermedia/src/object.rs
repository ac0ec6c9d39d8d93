//! Semantic objects - lazily indexed views over an itemscope subtree
//!
//! An object owns nothing: it is a cheap handle (document + node id)
//! plus three build-once indices. All three indices share one
//! traversal rule: walk the children of the object's root depth-first,
//! capture at each node, and stop descending the moment a node itself
//! declares an object marker — that subtree belongs to a nested object
//! and must never be double-indexed by the outer one.
//!
//! Indices are memoized behind `OnceLock`: built at most once per
//! instance, deterministic given the tree, and safe for concurrent
//! first access.

use crate::document::Document;
use crate::error::Result;
use crate::form::Form;
use crate::link::Link;
use crate::resolve::{resolve_node, Value};
use ahash::AHashMap;
use dom::{DomArena, DomNode, NodeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// True when the node opens its own microdata scope
pub(crate) fn is_object_marker(node: &DomNode) -> bool {
    node.has_attr("itemscope") || node.has_attr("itemtype")
}

/// Relation → links index, document order within each relation
pub type LinkMap = AHashMap<String, Vec<Link>>;
/// Relation → forms index, document order within each relation
pub type FormMap = AHashMap<String, Vec<Form>>;

#[derive(Default)]
struct FormIndex {
    by_rel: FormMap,
    orphans: Vec<Form>,
}

struct ObjectInner {
    doc: Document,
    root: NodeId,
    propmap: OnceLock<AHashMap<String, Vec<NodeId>>>,
    linkmap: OnceLock<LinkMap>,
    forms: OnceLock<FormIndex>,
}

/// A microdata object: something identified by itemscope/itemtype.
#[derive(Clone)]
pub struct SemanticObject {
    inner: Arc<ObjectInner>,
}

impl SemanticObject {
    pub(crate) fn new(doc: Document, root: NodeId) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                doc,
                root,
                propmap: OnceLock::new(),
                linkmap: OnceLock::new(),
                forms: OnceLock::new(),
            }),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.inner.doc
    }

    pub fn root_id(&self) -> NodeId {
        self.inner.root
    }

    /// The object's `itemtype`, if annotated
    pub fn itemtype(&self) -> Option<&str> {
        self.inner
            .doc
            .arena()
            .get(self.inner.root)
            .ok()
            .and_then(|node| node.attr("itemtype"))
    }

    // ---- property index ----------------------------------------------------

    fn propmap(&self) -> &AHashMap<String, Vec<NodeId>> {
        self.inner.propmap.get_or_init(|| {
            let arena = self.inner.doc.arena();
            let mut map = AHashMap::new();
            for_each_root_child(arena, self.inner.root, |child_id| {
                collect_props(arena, child_id, &mut map);
            });
            map
        })
    }

    /// Names of the object's local properties
    pub fn prop_names(&self) -> Vec<&str> {
        self.propmap().keys().map(String::as_str).collect()
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.propmap().contains_key(name)
    }

    /// Raw property access: the indexed nodes themselves, unresolved.
    /// Local to this object — no self-link fallback.
    pub fn prop_nodes(&self, name: &str) -> &[NodeId] {
        self.propmap().get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a property to a single value (the first, when several
    /// nodes carry the name)
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.get_with(name, false)
    }

    /// Resolve a property, returning an ordered list when several
    /// nodes carry the name
    pub fn get_all(&self, name: &str) -> Result<Option<Value>> {
        self.get_with(name, true)
    }

    fn get_with(&self, name: &str, allow_multi: bool) -> Result<Option<Value>> {
        let Some(node_ids) = self.propmap().get(name) else {
            // Self-link fallback: the property may live on the
            // canonical representation this object points at.
            if let Some(link) = self.link("self") {
                if let Some(Value::Object(remote)) = link.follow()? {
                    return remote.get_with(name, allow_multi);
                }
            }
            return Ok(None);
        };

        let mut values = Vec::new();
        for &node_id in node_ids {
            if let Some(value) = resolve_node(&self.inner.doc, node_id)? {
                values.push(value);
            }
        }

        if values.is_empty() {
            return Ok(None);
        }
        if values.len() == 1 || !allow_multi {
            return Ok(values.into_iter().next());
        }
        Ok(Some(Value::List(values)))
    }

    // ---- link index --------------------------------------------------------

    pub(crate) fn linkmap(&self) -> &LinkMap {
        self.inner.linkmap.get_or_init(|| {
            let arena = self.inner.doc.arena();
            let mut map = LinkMap::new();
            for_each_root_child(arena, self.inner.root, |child_id| {
                collect_links(arena, child_id, &self.inner.doc, &mut map);
            });
            map
        })
    }

    /// All links under the given relation, in document order
    pub fn links(&self, rel: &str) -> &[Link] {
        self.linkmap().get(rel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First link under the given relation
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links(rel).first()
    }

    // ---- form index --------------------------------------------------------

    fn form_index(&self) -> &FormIndex {
        self.inner.forms.get_or_init(|| {
            let arena = self.inner.doc.arena();
            let mut index = FormIndex::default();
            for_each_root_child(arena, self.inner.root, |child_id| {
                collect_forms(arena, child_id, &self.inner.doc, &mut index);
            });
            index
        })
    }

    pub(crate) fn formmap(&self) -> &FormMap {
        &self.form_index().by_rel
    }

    /// All forms annotated with the given relation, in document order
    pub fn forms(&self, rel: &str) -> &[Form] {
        self.formmap().get(rel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First form under the given relation
    pub fn form(&self, rel: &str) -> Option<&Form> {
        self.forms(rel).first()
    }

    /// Forms without a relation annotation, in document order
    pub fn orphan_forms(&self) -> &[Form] {
        &self.form_index().orphans
    }

    /// Submit the first form under the given relation. Unknown
    /// relations are absent, not an error.
    pub fn submit(&self, rel: &str, args: &[(&str, &str)]) -> Result<Option<Document>> {
        match self.form(rel) {
            Some(form) => Ok(Some(form.submit(args)?)),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for SemanticObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.itemtype() {
            Some(itemtype) => write!(f, "<{} object>", itemtype),
            None => write!(f, "<untyped object>"),
        }
    }
}

/// Run the capture over each child of the object's root. The root
/// itself is never captured — its itemprop (if any) belongs to the
/// enclosing object.
fn for_each_root_child(arena: &DomArena, root: NodeId, mut capture: impl FnMut(NodeId)) {
    if let Ok(root_node) = arena.get(root) {
        for &child_id in &root_node.children_ids {
            capture(child_id);
        }
    }
}

fn collect_props(arena: &DomArena, node_id: NodeId, map: &mut AHashMap<String, Vec<NodeId>>) {
    let Ok(node) = arena.get(node_id) else { return };
    if let Some(prop) = node.attr("itemprop") {
        map.entry(prop.to_string()).or_default().push(node_id);
    }
    // A nested object's subtree is indexed by the nested object only
    if is_object_marker(node) {
        return;
    }
    for &child_id in &node.children_ids {
        collect_props(arena, child_id, map);
    }
}

fn collect_links(arena: &DomArena, node_id: NodeId, doc: &Document, map: &mut LinkMap) {
    let Ok(node) = arena.get(node_id) else { return };
    if node.tag == "a" {
        if let Some(rel) = node.attr("rel") {
            map.entry(rel.to_string())
                .or_default()
                .push(Link::new(doc.clone(), node_id));
        }
    }
    if is_object_marker(node) {
        return;
    }
    for &child_id in &node.children_ids {
        collect_links(arena, child_id, doc, map);
    }
}

fn collect_forms(arena: &DomArena, node_id: NodeId, doc: &Document, index: &mut FormIndex) {
    let Ok(node) = arena.get(node_id) else { return };
    if node.tag == "form" {
        let form = Form::new(doc.clone(), node_id);
        match node.attr("data-rel") {
            Some(rel) => index.by_rel.entry(rel.to_string()).or_default().push(form),
            None => index.orphans.push(form),
        }
    }
    if is_object_marker(node) {
        return;
    }
    for &child_id in &node.children_ids {
        collect_forms(arena, child_id, doc, index);
    }
}
