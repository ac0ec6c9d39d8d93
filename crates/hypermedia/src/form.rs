//! Forms - `<form>` mutation affordances
//!
//! Submitting a form builds its parameter list from scratch on every
//! call: every named `<textarea>` descendant in document order, then
//! every named `<input>` descendant in document order. Each submitted
//! value is the caller's override when given, else the element's
//! `value` attribute, else empty. That declaration order is also the
//! serialization order, so an identical call encodes identically.
//!
//! Only `<input>` and `<textarea>` are supported.

use crate::document::Document;
use crate::error::{ClientError, Result};
use dom::NodeId;
use std::fmt;
use url::form_urlencoded;

#[derive(Clone)]
pub struct Form {
    doc: Document,
    node: NodeId,
}

impl Form {
    pub(crate) fn new(doc: Document, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// The form's relation (`data-rel` attribute)
    pub fn rel(&self) -> Option<&str> {
        self.doc
            .arena()
            .get(self.node)
            .ok()
            .and_then(|node| node.attr("data-rel"))
    }

    /// Declared public parameter names: named, non-hidden `<input>`
    /// descendants. Hidden inputs still participate in submission,
    /// they just are not advertised here.
    pub fn params(&self) -> Result<Vec<String>> {
        let arena = self.doc.arena();
        let mut out = Vec::new();
        for input_id in arena.find_by_tag(self.node, "input")? {
            let input = arena.get(input_id)?;
            if input.attr("type") == Some("hidden") {
                continue;
            }
            if let Some(name) = input.attr("name") {
                out.push(name.to_string());
            }
        }
        Ok(out)
    }

    /// Encode the submission body: textareas first, then inputs,
    /// document order within each group. Elements without a name do
    /// not contribute.
    fn build_params(&self, args: &[(&str, &str)]) -> Result<String> {
        let arena = self.doc.arena();
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for tag in ["textarea", "input"] {
            for field_id in arena.find_by_tag(self.node, tag)? {
                let field = arena.get(field_id)?;
                let Some(name) = field.attr("name") else {
                    continue;
                };
                let value = args
                    .iter()
                    .find(|(arg, _)| *arg == name)
                    .map(|(_, v)| *v)
                    .or_else(|| field.attr("value"))
                    .unwrap_or("");
                serializer.append_pair(name, value);
            }
        }

        Ok(serializer.finish())
    }

    /// Submit the form and return the resulting document.
    ///
    /// `args` overrides declared defaults by input name. Method GET
    /// (or none) appends the encoded parameters to the resolved
    /// action's existing query and fetches; anything else POSTs the
    /// encoded body to the action URL, which also becomes the new
    /// document's source URL.
    pub fn submit(&self, args: &[(&str, &str)]) -> Result<Document> {
        let node = self.doc.arena().get(self.node)?;
        let action = node.attr("action").ok_or(ClientError::MissingAttribute {
            tag: "form",
            attr: "action",
        })?;
        let action_url = self.doc.url().join(action)?;
        let encoded = self.build_params(args)?;

        let method = node.attr("method").unwrap_or("GET");
        if method.eq_ignore_ascii_case("get") {
            let mut target = action_url;
            let combined = match (target.query(), encoded.as_str()) {
                (Some(existing), "") => existing.to_string(),
                (Some(existing), fresh) if !existing.is_empty() => {
                    format!("{}&{}", existing, fresh)
                }
                (_, fresh) => fresh.to_string(),
            };
            target.set_query(if combined.is_empty() {
                None
            } else {
                Some(&combined)
            });
            target.set_fragment(None);
            self.doc.fetch(target.as_str())
        } else {
            let body = self.doc.transport().post(action_url.as_str(), &encoded)?;
            Document::from_bytes(&body, action_url, self.doc.transport().clone())
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rel() {
            Some(rel) => write!(f, "<Form {}>", rel),
            None => write!(f, "<Form>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ClientError;
    use crate::testutil::{document, StaticTransport};

    #[test]
    fn test_get_submit_merges_existing_query() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<form data-rel=\"search\" action=\"/s?a=1\">\
                   <input name=\"b\" value=\"2\">\
                 </form>",
            ),
            ("http://site/s?a=1&b=2", "<p>results</p>"),
        ]);
        let doc = document(transport, "http://site/page");

        let result = doc.submit("search", &[]).unwrap().unwrap();
        assert_eq!(result.url().as_str(), "http://site/s?a=1&b=2");
    }

    #[test]
    fn test_submit_overrides_and_defaults() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<form data-rel=\"q\" action=\"/find\">\
                   <input name=\"term\" value=\"default\">\
                   <input name=\"page\">\
                 </form>",
            ),
            ("http://site/find?term=cats&page=", "<p>ok</p>"),
        ]);
        let doc = document(transport, "http://site/page");

        let result = doc.submit("q", &[("term", "cats")]).unwrap().unwrap();
        assert_eq!(result.url().as_str(), "http://site/find?term=cats&page=");
    }

    #[test]
    fn test_textareas_serialize_before_inputs() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<form data-rel=\"post\" action=\"/new\">\
                   <input name=\"title\" value=\"t\">\
                   <textarea name=\"body\">ignored</textarea>\
                 </form>",
            ),
            ("http://site/new?body=&title=t", "<p>ok</p>"),
        ]);
        let doc = document(transport, "http://site/page");

        // The textarea's default comes from a value attribute (absent
        // here), not its content; it still sorts first in the encoding.
        let result = doc.submit("post", &[]).unwrap().unwrap();
        assert_eq!(result.url().as_str(), "http://site/new?body=&title=t");
    }

    #[test]
    fn test_hidden_inputs_submit_but_stay_out_of_params() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<form data-rel=\"q\" action=\"/go\">\
                   <input type=\"hidden\" name=\"token\" value=\"x\">\
                   <input name=\"visible\">\
                 </form>",
            ),
            ("http://site/go?token=x&visible=", "<p>ok</p>"),
        ]);
        let doc = document(transport, "http://site/page");
        let forms = doc.forms();
        let form = &forms.get("q").unwrap()[0];

        assert_eq!(form.params().unwrap(), vec!["visible"]);

        let result = form.submit(&[]).unwrap();
        assert_eq!(result.url().as_str(), "http://site/go?token=x&visible=");
    }

    #[test]
    fn test_post_submit() {
        let transport = StaticTransport::new(&[
            (
                "http://site/page",
                "<form data-rel=\"create\" action=\"/items\" method=\"POST\">\
                   <input name=\"name\" value=\"widget\">\
                 </form>",
            ),
            ("http://site/items", "<div itemscope itemtype=\"Item\"></div>"),
        ]);
        let doc = document(transport.clone(), "http://site/page");

        let result = doc.submit("create", &[]).unwrap().unwrap();
        // The new document's URL is the action URL
        assert_eq!(result.url().as_str(), "http://site/items");

        let posts = transport.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0], ("http://site/items".to_string(), "name=widget".to_string()));
    }

    #[test]
    fn test_missing_action_fails_fast() {
        let transport = StaticTransport::new(&[(
            "http://site/page",
            "<form data-rel=\"broken\"><input name=\"x\"></form>",
        )]);
        let doc = document(transport, "http://site/page");

        let err = doc.submit("broken", &[]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MissingAttribute {
                tag: "form",
                attr: "action"
            }
        ));
    }
}
