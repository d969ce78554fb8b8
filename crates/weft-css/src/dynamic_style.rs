//! Dynamic Style
//!
//! Owns a `<style>` element, its live sheet and the rule tree compiled into
//! it. Every instance gets a process-unique id and scopes its root rule with
//! the `style-{id}` class.

use std::sync::atomic::{AtomicU32, Ordering};

use weft_dom::{DocumentHandle, NodeId};

use crate::{CssRuleNode, CssStyleSheet, SheetHandle, StyleError, camel_to_kebab};

static NEXT_STYLE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-wide style id allocator
#[derive(Debug, Clone, Copy)]
pub struct StyleIds;

impl StyleIds {
    /// Allocate the next id. Ids are never reused until [`StyleIds::reset`].
    pub fn next() -> u32 {
        NEXT_STYLE_ID.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next allocation will return
    pub fn peek() -> u32 {
        NEXT_STYLE_ID.load(Ordering::Relaxed)
    }

    /// Restart allocation from 1. Only safe when no live style still uses
    /// an id, e.g. between isolated test documents.
    pub fn reset() {
        NEXT_STYLE_ID.store(1, Ordering::Relaxed);
    }
}

/// Compile options
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Prefix of the scoping class, `style-` by default
    pub class_prefix: String,
    /// Check every compiled rule with the CSS parser
    pub validate: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            class_prefix: "style-".to_string(),
            validate: true,
        }
    }
}

/// A compiled, instance-scoped stylesheet
#[derive(Debug)]
pub struct DynamicStyle {
    id: u32,
    class_name: String,
    document: DocumentHandle,
    element: NodeId,
    sheet: SheetHandle,
    root: CssRuleNode,
}

impl DynamicStyle {
    /// Allocate an id, append a `<style>` element to the document head and
    /// compile `root` into it
    pub fn new(document: &DocumentHandle, root: CssRuleNode) -> Result<Self, StyleError> {
        Self::with_options(document, root, &StyleOptions::default())
    }

    pub fn with_options(
        document: &DocumentHandle,
        root: CssRuleNode,
        options: &StyleOptions,
    ) -> Result<Self, StyleError> {
        let id = StyleIds::next();
        let class_name = format!("{}{}", options.class_prefix, id);

        let element = {
            let mut doc = document.borrow_mut();
            let element = doc.create_element("style");
            doc.set_attribute(element, "data-style-id", &id.to_string());
            let head = doc.head();
            doc.append_child(head, element);
            element
        };

        let sheet = if options.validate {
            CssStyleSheet::new()
        } else {
            CssStyleSheet::unvalidated()
        }
        .into_handle();

        let mut style = Self {
            id,
            class_name,
            document: DocumentHandle::clone(document),
            element,
            sheet,
            root,
        };
        if let Err(err) = style.parse() {
            style.release();
            return Err(err);
        }

        tracing::debug!(
            "Compiled {} ({} rules)",
            style.class_name,
            style.sheet.borrow().len()
        );
        Ok(style)
    }

    /// Compile every node of the tree, depth-first in document order
    fn parse(&mut self) -> Result<(), StyleError> {
        let selector = self.root_selector();
        self.root.compile(&self.sheet, selector)
    }

    /// The root selector with the scoping class appended. A `&` root scopes
    /// the scoping class itself.
    fn root_selector(&self) -> String {
        let scope = format!(".{}", self.class_name);
        match self.root.selector().strip_prefix('&') {
            Some(rest) => format!("{}{}", scope, rest),
            None => format!("{}{}", self.root.selector(), scope),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Scoping class name, `style-{id}`
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The `<style>` element
    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn sheet(&self) -> &SheetHandle {
        &self.sheet
    }

    pub fn root(&self) -> &CssRuleNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut CssRuleNode {
        &mut self.root
    }

    /// Whether `token` names the root of this style
    fn is_root_token(&self, token: &str) -> bool {
        token == "&"
            || token == self.root.selector()
            || self.root.resolved_selector() == Some(token)
            || token.strip_prefix('.') == Some(self.class_name.as_str())
    }

    /// Split a path into the child selectors below the root
    fn path<'a>(&self, path: &'a str) -> Result<Vec<&'a str>, StyleError> {
        let mut tokens = path.split_whitespace();
        let first = tokens
            .next()
            .ok_or_else(|| StyleError::InvalidSelector(path.to_string()))?;
        if !self.is_root_token(first) {
            return Err(StyleError::InvalidSelector(path.to_string()));
        }
        Ok(tokens.collect())
    }

    /// Resolve a space-separated selector path. The first token names the
    /// root; each following token is a direct child's literal selector.
    pub fn select(&self, path: &str) -> Result<&CssRuleNode, StyleError> {
        let mut node = &self.root;
        for token in self.path(path)? {
            node = node.get(token)?;
        }
        Ok(node)
    }

    pub fn select_mut(&mut self, path: &str) -> Result<&mut CssRuleNode, StyleError> {
        let tokens = self.path(path)?;
        let mut node = &mut self.root;
        for token in tokens {
            node = node.get_mut(token)?;
        }
        Ok(node)
    }

    /// Whether `key`, camelCase or kebab-case, names a CSS property a
    /// compiled rule can take. False until something has been compiled.
    ///
    /// Keys the first rule already declares always count. Anything else must
    /// be a property lightningcss knows; custom `--*` names are rejected.
    pub fn is_css_property(&self, key: &str) -> bool {
        use lightningcss::properties::PropertyId;

        let sheet = self.sheet.borrow();
        let Some(first) = sheet.rule(0) else {
            return false;
        };
        let property = camel_to_kebab(key);
        if first.style.keys().any(|declared| declared == property) {
            return true;
        }
        !matches!(PropertyId::from(property.as_str()), PropertyId::Custom(_))
    }

    /// Shorthand for `root_mut().set(..)`
    pub fn set(&mut self, property: &str, value: &str) -> bool {
        self.root.set(property, value)
    }

    /// Shorthand for `root_mut().push(..)`
    pub fn push(&mut self, property: &str, value: &str) {
        self.root.push(property, value);
    }

    /// Shorthand for `root_mut().pop()`
    pub fn pop(&mut self) -> Option<(String, Option<String>)> {
        self.root.pop()
    }

    fn release(&mut self) {
        self.document.borrow_mut().remove(self.element);
        self.sheet.borrow_mut().clear();
        self.root.detach();
    }

    /// Remove the `<style>` element and delete every rule. Consumes the
    /// style, so it cannot be used afterwards.
    pub fn dispose(mut self) {
        self.release();
        tracing::debug!("Disposed {}", self.class_name);
    }
}
