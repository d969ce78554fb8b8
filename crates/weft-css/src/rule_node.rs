//! CSS rule tree
//!
//! A [`CssRuleNode`] is a selector, its declarations and nested child rules.
//! Building a tree has no side effects; [`crate::DynamicStyle`] compiles it
//! and gives every node a handle to its own live rule.

use crate::{CssStyleDeclaration, SheetHandle, StyleError, camel_to_kebab};

/// Where a node's compiled rule lives
#[derive(Debug, Clone)]
struct CompiledRule {
    sheet: SheetHandle,
    index: usize,
    selector: String,
}

/// One selector + declarations + children unit of a rule tree
#[derive(Debug, Clone)]
pub struct CssRuleNode {
    selector: String,
    rules: Vec<(String, String)>,
    children: Vec<CssRuleNode>,
    compiled: Option<CompiledRule>,
    /// Values saved by `push`, restored by `pop`
    stack: Vec<(String, Option<String>)>,
}

/// Build a rule node from a selector, `(property, value)` pairs and children.
///
/// Property names may be camelCase; they are emitted as kebab-case.
pub fn css_rule<K, V>(
    selector: &str,
    rules: impl IntoIterator<Item = (K, V)>,
    children: impl IntoIterator<Item = CssRuleNode>,
) -> CssRuleNode
where
    K: Into<String>,
    V: Into<String>,
{
    let mut node = CssRuleNode::new(selector);
    for (property, value) in rules {
        node = node.rule(property, value);
    }
    for child in children {
        node = node.child(child);
    }
    node
}

impl CssRuleNode {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.trim().to_string(),
            rules: Vec::new(),
            children: Vec::new(),
            compiled: None,
            stack: Vec::new(),
        }
    }

    /// Add or replace a declaration
    pub fn rule(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let (property, value) = (property.into(), value.into());
        match self.rules.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value,
            None => self.rules.push((property, value)),
        }
        self
    }

    /// Append a nested rule
    pub fn child(mut self, child: CssRuleNode) -> Self {
        self.children.push(child);
        self
    }

    /// The selector as written, `&` marker included
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Declarations as written
    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }

    pub fn children(&self) -> &[CssRuleNode] {
        &self.children
    }

    /// Whether the selector appends to its parent without a descendant space
    pub fn is_self_reference(&self) -> bool {
        self.selector.starts_with('&')
    }

    /// Selector this node compiled to, if compiled
    pub fn resolved_selector(&self) -> Option<&str> {
        self.compiled.as_ref().map(|c| c.selector.as_str())
    }

    /// Index of this node's rule in the live sheet, if compiled
    pub fn rule_index(&self) -> Option<usize> {
        self.compiled.as_ref().map(|c| c.index)
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Find a direct child by its literal selector
    pub fn get(&self, selector: &str) -> Result<&CssRuleNode, StyleError> {
        self.children
            .iter()
            .find(|c| c.selector == selector)
            .ok_or_else(|| self.not_found(selector))
    }

    /// Find a direct child by its literal selector, mutably
    pub fn get_mut(&mut self, selector: &str) -> Result<&mut CssRuleNode, StyleError> {
        match self.children.iter().position(|c| c.selector == selector) {
            Some(index) => Ok(&mut self.children[index]),
            None => Err(self.not_found(selector)),
        }
    }

    fn not_found(&self, selector: &str) -> StyleError {
        StyleError::NotFound {
            parent: self.selector.clone(),
            selector: selector.to_string(),
        }
    }

    /// Current value of a property: the live rule once compiled, the
    /// declared value before that.
    pub fn value_of(&self, property: &str) -> Option<String> {
        let property = camel_to_kebab(property);
        match &self.compiled {
            Some(compiled) => compiled
                .sheet
                .borrow()
                .rule(compiled.index)
                .and_then(|r| r.style.get_property_value(&property))
                .map(str::to_string),
            None => self
                .rules
                .iter()
                .find(|(p, _)| camel_to_kebab(p) == property)
                .map(|(_, v)| v.clone()),
        }
    }

    /// Write a property straight into the live rule.
    ///
    /// Does nothing before the node is compiled. Returns whether a live rule
    /// was changed. An empty value removes the property.
    pub fn set(&mut self, property: &str, value: &str) -> bool {
        let Some(compiled) = &self.compiled else {
            return false;
        };
        let mut sheet = compiled.sheet.borrow_mut();
        let Some(rule) = sheet.rule_mut(compiled.index) else {
            return false;
        };
        rule.style.set_property(&camel_to_kebab(property), value);
        tracing::trace!("{} {{ {}: {} }}", compiled.selector, property, value);
        true
    }

    /// Save the current value of `property`, then set it to `value`
    pub fn push(&mut self, property: &str, value: &str) {
        let current = self.value_of(property);
        self.stack.push((property.to_string(), current));
        self.set(property, value);
    }

    /// Restore the value saved by the most recent `push`.
    ///
    /// Returns the restored `(property, value)` or None when nothing was pushed.
    pub fn pop(&mut self) -> Option<(String, Option<String>)> {
        let (property, previous) = self.stack.pop()?;
        self.set(&property, previous.as_deref().unwrap_or(""));
        Some((property, previous))
    }

    /// Number of pushed overrides not yet popped
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Declarations as a live declaration block, kebab-case names
    fn declaration(&self) -> CssStyleDeclaration {
        let mut style = CssStyleDeclaration::new();
        for (property, value) in &self.rules {
            style.set_property(&camel_to_kebab(property), value);
        }
        style
    }

    /// Compile this node and its subtree depth-first, appending one rule per
    /// node. `selector` is this node's already-resolved selector.
    pub(crate) fn compile(&mut self, sheet: &SheetHandle, selector: String) -> Result<(), StyleError> {
        let index = {
            let mut live = sheet.borrow_mut();
            let end = live.len();
            live.insert_style(&selector, self.declaration(), end)?
        };

        for child in &mut self.children {
            let resolved = child.resolve_under(&selector);
            child.compile(sheet, resolved)?;
        }

        self.compiled = Some(CompiledRule {
            sheet: SheetHandle::clone(sheet),
            index,
            selector,
        });
        Ok(())
    }

    /// Resolve this node's selector beneath an already-resolved parent
    fn resolve_under(&self, parent: &str) -> String {
        match self.selector.strip_prefix('&') {
            Some(rest) => format!("{}{}", parent, rest),
            None => format!("{} {}", parent, self.selector),
        }
    }

    /// Forget the live rule, recursively
    pub(crate) fn detach(&mut self) {
        self.compiled = None;
        self.stack.clear();
        for child in &mut self.children {
            child.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CssStyleSheet;

    fn button() -> CssRuleNode {
        css_rule(
            "button",
            [("backgroundColor", "#222"), ("color", "white")],
            [
                css_rule("&.down", [("background", "#444")], []),
                css_rule("span", [("fontSize", "12px")], []),
            ],
        )
    }

    #[test]
    fn test_build_has_no_side_effects() {
        let node = button();
        assert!(!node.is_compiled());
        assert_eq!(node.children().len(), 2);
        assert!(node.get("&.down").unwrap().is_self_reference());
        assert_eq!(node.value_of("background-color").as_deref(), Some("#222"));
    }

    #[test]
    fn test_get_is_direct_children_only() {
        let node = CssRuleNode::new("a").child(CssRuleNode::new("b").child(CssRuleNode::new("c")));
        assert!(node.get("b").is_ok());
        assert_eq!(
            node.get("c").unwrap_err(),
            StyleError::NotFound {
                parent: "a".into(),
                selector: "c".into()
            }
        );
    }

    #[test]
    fn test_compile_resolves_selectors() {
        let sheet = CssStyleSheet::new().into_handle();
        let mut node = button();
        node.compile(&sheet, "button.style-9".into()).unwrap();

        let live = sheet.borrow();
        assert_eq!(live.len(), 3);
        assert_eq!(live.rule(0).unwrap().selector_text, "button.style-9");
        assert_eq!(live.rule(1).unwrap().selector_text, "button.style-9.down");
        assert_eq!(live.rule(2).unwrap().selector_text, "button.style-9 span");
        assert_eq!(
            live.rule(0).unwrap().style.get_property_value("background-color"),
            Some("#222")
        );
        assert_eq!(live.rule(2).unwrap().style.get_property_value("font-size"), Some("12px"));
    }

    #[test]
    fn test_set_before_compile_is_noop() {
        let mut node = button();
        assert!(!node.set("color", "red"));
        assert_eq!(node.value_of("color").as_deref(), Some("white"));
    }

    #[test]
    fn test_push_pop_nested() {
        let sheet = CssStyleSheet::new().into_handle();
        let mut node = button();
        node.compile(&sheet, ".x".into()).unwrap();

        node.push("color", "red");
        node.push("color", "blue");
        assert_eq!(node.value_of("color").as_deref(), Some("blue"));
        assert_eq!(node.depth(), 2);

        node.pop();
        assert_eq!(node.value_of("color").as_deref(), Some("red"));
        node.pop();
        assert_eq!(node.value_of("color").as_deref(), Some("white"));
        assert!(node.pop().is_none());
    }

    #[test]
    fn test_punctuation_in_values_survives_push_pop() {
        let sheet = CssStyleSheet::new().into_handle();
        let mut node = css_rule("q", [("content", "\"a;b: {c}\"")], []);
        node.compile(&sheet, ".x q".into()).unwrap();
        assert_eq!(node.value_of("content").as_deref(), Some("\"a;b: {c}\""));

        node.push("content", "\"z;\"");
        assert_eq!(node.value_of("content").as_deref(), Some("\"z;\""));
        node.pop();
        assert_eq!(node.value_of("content").as_deref(), Some("\"a;b: {c}\""));
    }

    #[test]
    fn test_pop_removes_property_that_was_absent() {
        let sheet = CssStyleSheet::new().into_handle();
        let mut node = button();
        node.compile(&sheet, ".x".into()).unwrap();

        node.push("opacity", "0.5");
        assert_eq!(node.value_of("opacity").as_deref(), Some("0.5"));
        assert_eq!(node.pop(), Some(("opacity".to_string(), None)));
        assert_eq!(node.value_of("opacity"), None);
    }
}
