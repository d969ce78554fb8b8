//! Custom Elements
//!
//! Maps control tag names to the class that backs them, and carries the
//! callbacks a mounted control receives from its element.

use std::collections::HashMap;

/// Hyphenated names the HTML grammar already owns
const RESERVED_NAMES: [&str; 8] = [
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// One registered tag
#[derive(Debug, Clone)]
pub struct CustomElementDefinition {
    pub name: String,
    /// Name of the control class behind the tag
    pub class_name: String,
    pub observed_attributes: Vec<String>,
}

impl CustomElementDefinition {
    fn observes(&self, attribute: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attribute)
    }
}

/// What a control asks for when registering its tag
#[derive(Debug, Clone, Default)]
pub struct CustomElementOptions {
    pub class_name: String,
    pub observed_attributes: Vec<String>,
}

/// Tag name to control class, one entry per tag
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    by_tag: HashMap<String, CustomElementDefinition>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. A tag can only be claimed once.
    pub fn define(
        &mut self,
        name: &str,
        options: CustomElementOptions,
    ) -> Result<(), CustomElementError> {
        if !Self::is_valid_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }
        if self.is_defined(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        let CustomElementOptions {
            class_name,
            observed_attributes,
        } = options;
        tracing::debug!(tag = name, class = %class_name, "custom element defined");
        self.by_tag.insert(
            name.to_string(),
            CustomElementDefinition {
                name: name.to_string(),
                class_name,
                observed_attributes,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.by_tag.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.by_tag.contains_key(name)
    }

    /// Whether a change to `attribute` on `<name>` should reach the control
    pub fn observes(&self, name: &str, attribute: &str) -> bool {
        self.get(name).is_some_and(|def| def.observes(attribute))
    }

    /// A lowercase ASCII start, at least one hyphen, no uppercase or
    /// whitespace, and not one of the reserved SVG/MathML names.
    pub fn is_valid_name(name: &str) -> bool {
        let starts_lower = name.bytes().next().is_some_and(|b| b.is_ascii_lowercase());
        let clean = !name
            .chars()
            .any(|c| c.is_ascii_uppercase() || c.is_whitespace());

        starts_lower && clean && name.contains('-') && !RESERVED_NAMES.contains(&name)
    }
}

/// Which callback an element is delivering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCallback {
    Connected,
    Disconnected,
    AttributeChanged,
}

/// A callback plus, for attribute changes, what changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleCallbackInfo {
    pub callback: LifecycleCallback,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl LifecycleCallbackInfo {
    fn bare(callback: LifecycleCallback) -> Self {
        Self {
            callback,
            attribute_name: None,
            old_value: None,
            new_value: None,
        }
    }

    pub fn connected() -> Self {
        Self::bare(LifecycleCallback::Connected)
    }

    pub fn disconnected() -> Self {
        Self::bare(LifecycleCallback::Disconnected)
    }

    pub fn attribute_changed(name: &str, old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self {
            attribute_name: Some(name.to_owned()),
            old_value: old_value.map(str::to_owned),
            new_value: new_value.map(str::to_owned),
            ..Self::bare(LifecycleCallback::AttributeChanged)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("'{0}' is not a valid custom element name")]
    InvalidName(String),

    #[error("custom element '{0}' has already been defined")]
    AlreadyDefined(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(CustomElementRegistry::is_valid_name("weft-button"));
        assert!(CustomElementRegistry::is_valid_name("x-1"));
        assert!(!CustomElementRegistry::is_valid_name("weftbutton"));
        assert!(!CustomElementRegistry::is_valid_name("-button"));
        assert!(!CustomElementRegistry::is_valid_name("weft-Button"));
        assert!(!CustomElementRegistry::is_valid_name("weft button-x"));
        assert!(!CustomElementRegistry::is_valid_name("missing-glyph"));
    }

    #[test]
    fn test_invalid_name_is_not_registered() {
        let mut registry = CustomElementRegistry::new();
        assert_eq!(
            registry.define("Button", CustomElementOptions::default()),
            Err(CustomElementError::InvalidName("Button".into()))
        );
        assert!(!registry.is_defined("Button"));
    }

    #[test]
    fn test_definition_keeps_class_name() {
        let mut registry = CustomElementRegistry::new();
        registry
            .define(
                "weft-slider",
                CustomElementOptions {
                    class_name: "Slider".into(),
                    observed_attributes: vec!["value".into()],
                },
            )
            .unwrap();
        let def = registry.get("weft-slider").unwrap();
        assert_eq!(def.class_name, "Slider");
        assert!(registry.observes("weft-slider", "value"));
        assert!(!registry.observes("weft-other", "value"));
    }

    #[test]
    fn test_attribute_changed_info() {
        let info = LifecycleCallbackInfo::attribute_changed("value", None, Some("3"));
        assert_eq!(info.callback, LifecycleCallback::AttributeChanged);
        assert_eq!(info.attribute_name.as_deref(), Some("value"));
        assert_eq!(info.old_value, None);
        assert_eq!(info.new_value.as_deref(), Some("3"));
        assert_eq!(LifecycleCallbackInfo::disconnected().attribute_name, None);
    }
}
