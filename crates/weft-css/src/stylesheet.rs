//! Live stylesheet object model
//!
//! A flat, indexed list of style rules whose declaration blocks can be
//! edited after insertion. Rule text is parsed with lightningcss.

use std::cell::RefCell;
use std::rc::Rc;

use crate::StyleError;

/// Shared handle to a live sheet. Compiled rule nodes keep one so they can
/// edit their own rule without going through the owning style.
pub type SheetHandle = Rc<RefCell<CssStyleSheet>>;

/// Ordered `property: value` declarations of one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a kebab-case property. An empty value removes the property.
    pub fn set_property(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove_property(property);
            return;
        }
        match self.declarations.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .declarations
                .push((property.to_string(), value.to_string())),
        }
    }

    pub fn get_property_value(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a property, returning its previous value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let index = self.declarations.iter().position(|(p, _)| p == property)?;
        Some(self.declarations.remove(index).1)
    }

    /// Declared property names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `a: b; c: d;`
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One style rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssStyleRule {
    pub selector_text: String,
    pub style: CssStyleDeclaration,
}

impl CssStyleRule {
    pub fn css_text(&self) -> String {
        format!("{} {{ {} }}", self.selector_text, self.style.css_text())
    }
}

/// Live stylesheet
#[derive(Debug, Clone, Default)]
pub struct CssStyleSheet {
    rules: Vec<CssStyleRule>,
    validate: bool,
}

impl CssStyleSheet {
    /// Create a sheet that validates inserted rules
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            validate: true,
        }
    }

    /// Create a sheet that stores compiled rules without checking them and
    /// skips unreadable declarations in rule text
    pub fn unvalidated() -> Self {
        Self::default()
    }

    pub fn into_handle(self) -> SheetHandle {
        Rc::new(RefCell::new(self))
    }

    /// Parse `text` as a single style rule and insert it at `index`.
    ///
    /// Declarations come from the lightningcss parse, so values holding
    /// strings, URLs or nested blocks stay intact. An unvalidated sheet
    /// drops declarations lightningcss cannot read instead of failing.
    pub fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, StyleError> {
        self.check_index(index)?;
        let rule = Self::parse_rule(text, !self.validate)?;
        self.rules.insert(index, rule);
        Ok(index)
    }

    /// Insert a rule from an already-split selector and declaration block.
    ///
    /// The declarations are stored as given. A validating sheet still runs
    /// the serialized rule through lightningcss first.
    pub fn insert_style(
        &mut self,
        selector: &str,
        style: CssStyleDeclaration,
        index: usize,
    ) -> Result<usize, StyleError> {
        self.check_index(index)?;
        let rule = CssStyleRule {
            selector_text: selector.trim().to_string(),
            style,
        };
        if rule.selector_text.is_empty() {
            return Err(StyleError::Parse {
                rule: rule.css_text(),
                message: "empty selector".to_string(),
            });
        }
        if self.validate {
            Self::parse_rule(&rule.css_text(), false)?;
        }
        self.rules.insert(index, rule);
        Ok(index)
    }

    fn check_index(&self, index: usize) -> Result<(), StyleError> {
        if index > self.rules.len() {
            return Err(StyleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(())
    }

    /// Run `text` through lightningcss and lift out its only style rule
    fn parse_rule(text: &str, error_recovery: bool) -> Result<CssStyleRule, StyleError> {
        use lightningcss::rules::CssRule;
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
        use lightningcss::traits::ToCss;

        let fail = |message: String| StyleError::Parse {
            rule: text.to_string(),
            message,
        };

        let options = ParserOptions {
            error_recovery,
            ..ParserOptions::default()
        };
        let parsed = StyleSheet::parse(text, options).map_err(|e| fail(e.to_string()))?;
        let style_rule = match parsed.rules.0.as_slice() {
            [CssRule::Style(rule)] => rule,
            [_] => return Err(fail("expected a style rule".to_string())),
            rules => return Err(fail(format!("expected one rule, found {}", rules.len()))),
        };

        let selector_text = style_rule
            .selectors
            .to_css_string(PrinterOptions::default())
            .map_err(|e| fail(e.to_string()))?;

        let block = &style_rule.declarations;
        let mut style = CssStyleDeclaration::new();
        let normal = block.declarations.iter().map(|p| (p, false));
        let important = block.important_declarations.iter().map(|p| (p, true));
        for (property, is_important) in normal.chain(important) {
            let mut value = property
                .value_to_css_string(PrinterOptions::default())
                .map_err(|e| fail(e.to_string()))?;
            if is_important {
                value.push_str(" !important");
            }
            style.set_property(property.property_id().name(), &value);
        }

        Ok(CssStyleRule {
            selector_text,
            style,
        })
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<CssStyleRule, StyleError> {
        if index >= self.rules.len() {
            return Err(StyleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(index))
    }

    pub fn rule(&self, index: usize) -> Option<&CssStyleRule> {
        self.rules.get(index)
    }

    pub fn rule_mut(&mut self, index: usize) -> Option<&mut CssStyleRule> {
        self.rules.get_mut(index)
    }

    pub fn rules(&self) -> &[CssStyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Delete every rule
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Serialize the live rules, one per line
    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .map(CssStyleRule::css_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_serialize() {
        let mut sheet = CssStyleSheet::new();
        sheet.insert_rule(".a { width: 10px; }", 0).unwrap();
        sheet.insert_rule(".b { height: 4px; padding-top: 2px; }", 1).unwrap();
        sheet.insert_rule(".first { }", 0).unwrap();

        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.rule(0).unwrap().selector_text, ".first");
        assert_eq!(
            sheet.rule(2).unwrap().style.get_property_value("padding-top"),
            Some("2px")
        );
        assert_eq!(
            sheet.to_css(),
            ".first {  }\n.a { width: 10px; }\n.b { height: 4px; padding-top: 2px; }"
        );
    }

    #[test]
    fn test_insert_rule_keeps_quoted_semicolons() {
        let mut sheet = CssStyleSheet::new();
        sheet
            .insert_rule(r#".a { content: "x;y"; width: 1px; }"#, 0)
            .unwrap();
        let style = &sheet.rule(0).unwrap().style;
        assert_eq!(style.get_property_value("content"), Some(r#""x;y""#));
        assert_eq!(style.get_property_value("width"), Some("1px"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_insert_style_stores_values_verbatim() {
        let mut sheet = CssStyleSheet::new();
        let mut style = CssStyleDeclaration::new();
        style.set_property("background-image", r#"url("data:image/png;base64,AAAA")"#);
        style.set_property("color", "black");
        sheet.insert_style(".a", style, 0).unwrap();

        let live = &sheet.rule(0).unwrap().style;
        assert_eq!(
            live.get_property_value("background-image"),
            Some(r#"url("data:image/png;base64,AAAA")"#)
        );
        assert_eq!(live.get_property_value("color"), Some("black"));
    }

    #[test]
    fn test_insert_style_validates() {
        let mut sheet = CssStyleSheet::new();
        assert!(matches!(
            sheet.insert_style("a]", CssStyleDeclaration::new(), 0),
            Err(StyleError::Parse { .. })
        ));
        assert!(matches!(
            sheet.insert_style("  ", CssStyleDeclaration::new(), 0),
            Err(StyleError::Parse { .. })
        ));

        let mut loose = CssStyleSheet::unvalidated();
        assert!(loose.insert_style("a]", CssStyleDeclaration::new(), 0).is_ok());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut sheet = CssStyleSheet::new();
        assert_eq!(
            sheet.insert_rule(".a { color: red; }", 1),
            Err(StyleError::IndexOutOfRange { index: 1, len: 0 })
        );
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let mut sheet = CssStyleSheet::new();
        assert!(matches!(
            sheet.insert_rule("color: red", 0),
            Err(StyleError::Parse { .. })
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_declaration_edits() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("color", "red");
        style.set_property("background", "#444");
        style.set_property("color", "blue");
        assert_eq!(style.css_text(), "color: blue; background: #444;");

        style.set_property("color", "");
        assert_eq!(style.get_property_value("color"), None);
        assert_eq!(style.keys().collect::<Vec<_>>(), vec!["background"]);
    }
}
