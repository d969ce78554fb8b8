//! Template parser
//!
//! Uses html5ever's RcDom and copies the parsed body content into our DOM.
//! Templates are fragments, so the implied `html/head/body` wrapper that
//! html5ever produces is discarded.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use weft_dom::{Document, NodeId};

use crate::TemplateError;

/// Template parser
#[derive(Debug, Default)]
pub struct TemplateParser;

impl TemplateParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a template and append its top-level nodes under `parent`.
    ///
    /// Returns the ids of the appended top-level nodes.
    pub fn parse_into(
        &self,
        document: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, TemplateError> {
        if document.tag_name(parent).is_none() {
            return Err(TemplateError::InvalidParent(parent));
        }
        if html.trim().is_empty() {
            return Ok(Vec::new());
        }

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut appended = Vec::new();
        for section in Self::sections(&dom.document) {
            for child in section.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, document, parent) {
                    appended.push(id);
                }
            }
        }

        tracing::debug!("Parsed template into {} top-level nodes", appended.len());
        Ok(appended)
    }

    /// The implied `<head>` and `<body>` of the parsed document, in order
    fn sections(document: &Handle) -> Vec<Handle> {
        let mut sections = Vec::new();
        for html in document.children.borrow().iter() {
            if !matches!(html.data, RcNodeData::Element { .. }) {
                continue;
            }
            for child in html.children.borrow().iter() {
                if let RcNodeData::Element { name, .. } = &child.data {
                    let local: &str = &name.local;
                    if local == "head" || local == "body" {
                        sections.push(child.clone());
                    }
                }
            }
        }
        sections
    }

    /// Copy one RcDom node (and its subtree) under `parent`
    fn convert_node(&self, handle: &Handle, document: &mut Document, parent: NodeId) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return None;
                }
                let id = document.create_text(&text);
                document.append_child(parent, id);
                Some(id)
            }
            RcNodeData::Comment { contents } => {
                let id = document.tree_mut().create_comment(contents);
                document.append_child(parent, id);
                Some(id)
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = document.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    document.set_attribute(id, &attr.name.local, &attr.value);
                }
                document.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, document, id);
                }
                Some(id)
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let mut doc = Document::new();
        let host = doc.create_element("weft-button");

        let nodes = TemplateParser::new()
            .parse_into(&mut doc, host, "<span class=\"label\">Press</span><i></i>")
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.tag_name(nodes[0]), Some("span"));
        assert_eq!(doc.get_attribute(nodes[0], "class").as_deref(), Some("label"));
        assert_eq!(doc.tree().text_content(host), "Press");
    }

    #[test]
    fn test_empty_template_is_noop() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        let nodes = TemplateParser::new().parse_into(&mut doc, host, "  \n").unwrap();
        assert!(nodes.is_empty());
        assert!(doc.element_children(host).is_empty());
    }

    #[test]
    fn test_text_parent_rejected() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        let result = TemplateParser::new().parse_into(&mut doc, text, "<b></b>");
        assert!(matches!(result, Err(TemplateError::InvalidParent(_))));
    }
}
