//! Weft CSS
//!
//! Per-instance stylesheets for controls. A tree of [`CssRuleNode`]s is
//! compiled by [`DynamicStyle`] into one live rule per node, scoped to the
//! instance by a generated `style-{id}` class. Compiled rules can then be
//! mutated in place, including temporary overrides with `push`/`pop`.

mod dynamic_style;
mod rule_node;
mod stylesheet;

pub use dynamic_style::{DynamicStyle, StyleIds, StyleOptions};
pub use rule_node::{CssRuleNode, css_rule};
pub use stylesheet::{CssStyleDeclaration, CssStyleRule, CssStyleSheet, SheetHandle};

/// Convert a camelCase property name to kebab-case.
///
/// Every uppercase ASCII letter becomes `-` followed by its lowercase form,
/// so `backgroundColor` becomes `background-color`. Names that are already
/// kebab-case pass through unchanged.
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Stylesheet errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("Invalid selector path: '{0}'")]
    InvalidSelector(String),

    #[error("No rule '{selector}' under '{parent}'")]
    NotFound { parent: String, selector: String },

    #[error("Invalid rule '{rule}': {message}")]
    Parse { rule: String, message: String },

    #[error("Rule index {index} out of range for {len} rules")]
    IndexOutOfRange { index: usize, len: usize },
}
