//! Documents - the root context of every navigation
//!
//! A Document is the parsed tree, its source URL (base for every
//! relative reference), and the transport that fetched it. It is
//! immutable once constructed and cheap to clone: everything derived
//! from it — objects, links, forms — holds a clone of the handle plus
//! a node id, so derived entities never outlive the tree they point
//! into.

use crate::error::Result;
use crate::form::Form;
use crate::object::{FormMap, LinkMap, SemanticObject};
use crate::resolve::{resolve_node, Value};
use crate::transport::Transport;
use dom::{flatten_text, DomArena, NodeId};
use std::fmt;
use std::sync::Arc;
use url::Url;

struct DocumentInner {
    arena: DomArena,
    url: Url,
    transport: Arc<dyn Transport>,
}

/// A fetched, parsed document: one client application state.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    /// Parse a response body into a document rooted at `url`.
    pub fn from_bytes(body: &[u8], url: Url, transport: Arc<dyn Transport>) -> Result<Self> {
        let text = String::from_utf8_lossy(body);
        let arena = dom::parse_html(&text)?;
        Ok(Self {
            inner: Arc::new(DocumentInner {
                arena,
                url,
                transport,
            }),
        })
    }

    /// Fetch a sibling document over the same transport.
    pub(crate) fn fetch(&self, url: &str) -> Result<Document> {
        let parsed = Url::parse(url)?;
        let body = self.inner.transport.get(parsed.as_str())?;
        Self::from_bytes(&body, parsed, Arc::clone(&self.inner.transport))
    }

    pub fn arena(&self) -> &DomArena {
        &self.inner.arena
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    // ---- top-level discovery ----------------------------------------------

    /// All top-level semantic objects: nodes bearing an object marker
    /// that are not themselves some enclosing object's property value.
    /// Discovery stops descending once an object is found — nested
    /// objects are reachable only through property resolution.
    pub fn objects(&self) -> Vec<SemanticObject> {
        let mut acc = Vec::new();
        if let Some(root_id) = self.inner.arena.root_id() {
            self.collect_objects(root_id, &mut acc);
        }
        acc
    }

    fn collect_objects(&self, node_id: NodeId, acc: &mut Vec<SemanticObject>) {
        let Ok(node) = self.inner.arena.get(node_id) else {
            return;
        };
        if crate::object::is_object_marker(node) && !node.has_attr("itemprop") {
            acc.push(SemanticObject::new(self.clone(), node_id));
            return;
        }
        for &child_id in &node.children_ids {
            self.collect_objects(child_id, acc);
        }
    }

    // ---- document-default resolution --------------------------------------

    /// The value a navigation lands on when it reaches this document.
    ///
    /// A found fragment id resolves that node. Otherwise: the single
    /// top-level object when there is exactly one, the ordered list
    /// when there are several, the flattened document text when there
    /// are none.
    pub fn default_value(&self, fragment: Option<&str>) -> Result<Option<Value>> {
        if let Some(fragment) = fragment {
            if !fragment.is_empty() {
                if let Some(target) = self.inner.arena.find_by_id(fragment) {
                    return resolve_node(self, target);
                }
                // Missing id: fall through to the no-fragment case
            }
        }

        let mut objects = self.objects();
        Ok(Some(match objects.len() {
            0 => {
                let root_id = self.inner.arena.root_id().unwrap_or(0);
                Value::Text(flatten_text(&self.inner.arena, root_id)?)
            }
            1 => Value::Object(objects.remove(0)),
            _ => Value::List(objects.into_iter().map(Value::Object).collect()),
        }))
    }

    // ---- facade over a synthetic root object -------------------------------

    /// The whole document viewed as one object rooted at the tree root
    fn as_object(&self) -> Option<SemanticObject> {
        self.inner
            .arena
            .root_id()
            .map(|root_id| SemanticObject::new(self.clone(), root_id))
    }

    /// All `rel`-annotated links, keyed by relation
    pub fn links(&self) -> LinkMap {
        self.as_object()
            .map(|obj| obj.linkmap().clone())
            .unwrap_or_default()
    }

    /// All `data-rel`-annotated forms, keyed by relation
    pub fn forms(&self) -> FormMap {
        self.as_object()
            .map(|obj| obj.formmap().clone())
            .unwrap_or_default()
    }

    /// Forms with no relation annotation
    pub fn orphan_forms(&self) -> Vec<Form> {
        self.as_object()
            .map(|obj| obj.orphan_forms().to_vec())
            .unwrap_or_default()
    }

    /// Every `<form>` in the document, annotated or not
    pub fn allforms(&self) -> Vec<Form> {
        self.inner
            .arena
            .find_all("form")
            .into_iter()
            .map(|node_id| Form::new(self.clone(), node_id))
            .collect()
    }

    /// Follow the first link with the given relation. An unknown
    /// relation is absent, not an error.
    pub fn follow(&self, rel: &str) -> Result<Option<Value>> {
        let Some(link) = self.as_object().and_then(|obj| obj.link(rel).cloned()) else {
            return Ok(None);
        };
        link.follow()
    }

    /// Submit the first form with the given relation. An unknown
    /// relation is absent, not an error.
    pub fn submit(&self, rel: &str, args: &[(&str, &str)]) -> Result<Option<Document>> {
        let Some(form) = self.as_object().and_then(|obj| obj.form(rel).cloned()) else {
            return Ok(None);
        };
        Ok(Some(form.submit(args)?))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Document {}>", self.inner.url)
    }
}
