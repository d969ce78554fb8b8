//! Descriptors
//!
//! Static metadata attached to one level of a control class hierarchy.

use serde::Deserialize;

use crate::{DescriptorError, PropType, PropValue};

/// One declared prop
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PropType,
    #[serde(default)]
    pub default: PropValue,
}

/// Descriptor of one class level: `{ id, props, template }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Descriptor {
    pub id: String,
    #[serde(default)]
    pub props: Vec<PropDef>,
    /// HTML parsed once into the element's initial subtree
    #[serde(default)]
    pub template: String,
}

impl Descriptor {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            props: Vec::new(),
            template: String::new(),
        }
    }

    /// Declare a prop, replacing an earlier declaration of the same name
    pub fn prop(mut self, name: &str, kind: PropType, default: impl Into<PropValue>) -> Self {
        let def = PropDef {
            name: name.to_string(),
            kind,
            default: default.into(),
        };
        match self.props.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = def,
            None => self.props.push(def),
        }
        self
    }

    pub fn template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Load a descriptor literal from JSON
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        serde_json::from_str(json).map_err(|e| DescriptorError::Json(e.to_string()))
    }

    pub fn get_prop(&self, name: &str) -> Option<&PropDef> {
        self.props.iter().find(|p| p.name == name)
    }
}
