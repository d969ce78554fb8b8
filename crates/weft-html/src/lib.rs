//! Weft HTML
//!
//! Turns a control's template string into a DOM subtree. Built on html5ever.

mod parser;

pub use parser::TemplateParser;

use weft_dom::{Document, NodeId};

/// Parse `html` and append the resulting nodes under `parent`
pub fn parse_template(
    document: &mut Document,
    parent: NodeId,
    html: &str,
) -> Result<Vec<NodeId>, TemplateError> {
    TemplateParser::new().parse_into(document, parent, html)
}

/// Template parsing error
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template parent {0:?} is not an element")]
    InvalidParent(NodeId),
}
