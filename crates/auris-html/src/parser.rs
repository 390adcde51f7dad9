//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to the arena DOM.

use auris_dom::{Document, Node, NodeId, ShadowRootMode};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// Parents whose whitespace-only text children carry no meaning
const WHITESPACE_INSENSITIVE: &[&str] = &[
    "html", "head", "table", "thead", "tbody", "tfoot", "tr", "ul", "ol", "dl",
    "select", "optgroup", "colgroup",
];

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        self.convert_node(&dom.document, &mut document, NodeId::ROOT);
        document.finalize();

        tracing::debug!(nodes = document.tree().len(), "Parsed document");
        Ok(document)
    }

    /// Convert an RcDom node (and its subtree) under `parent`
    fn convert_node(&self, handle: &Handle, doc: &mut Document, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                self.convert_children(handle, doc, parent);
            }
            RcNodeData::Doctype { name, .. } => {
                let id = doc.tree_mut().create_node(Node::doctype(name.to_string()));
                self.attach(doc, parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    let insensitive = parent == NodeId::ROOT
                        || doc.tag_name(parent).is_some_and(|t| WHITESPACE_INSENSITIVE.contains(&t));
                    if insensitive || text.is_empty() {
                        return;
                    }
                }
                let id = doc.tree_mut().create_text(&text);
                self.attach(doc, parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = doc.tree_mut().create_comment(contents);
                self.attach(doc, parent, id);
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let tag = name.local.as_ref().to_ascii_lowercase();
                let attrs: Vec<(String, String)> = attrs.borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();

                if tag == "template" {
                    let mode = attrs.iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case("shadowrootmode"))
                        .and_then(|(_, v)| ShadowRootMode::parse(v));
                    if let Some(mode) = mode {
                        match doc.attach_shadow(parent, mode) {
                            Ok(shadow) => {
                                if let Some(contents) = template_contents.borrow().as_ref() {
                                    self.convert_children(contents, doc, shadow);
                                }
                                return;
                            }
                            Err(err) => tracing::debug!(%err, "declarative shadow root ignored"),
                        }
                    }
                }

                let mut node = Node::element(&tag);
                if let Some(elem) = node.as_element_mut() {
                    for (key, value) in attrs {
                        elem.set_attr(&key, value);
                    }
                }
                let id = doc.tree_mut().create_node(node);
                self.attach(doc, parent, id);

                // template contents are inert and never rendered
                if tag != "template" {
                    self.convert_children(handle, doc, id);
                }
                if tag == "style" {
                    let css = doc.text_content(id);
                    doc.stylesheet_mut().add_css(&css);
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn convert_children(&self, handle: &Handle, doc: &mut Document, parent: NodeId) {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, doc, parent);
        }
    }

    fn attach(&self, doc: &mut Document, parent: NodeId, child: NodeId) {
        if let Err(err) = doc.tree_mut().append_child(parent, child) {
            tracing::warn!(%err, "dropped node during parse");
        }
    }
}
