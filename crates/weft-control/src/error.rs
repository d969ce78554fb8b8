//! Control errors
//!
//! Everything here is a misconfiguration error. Nothing retries; errors
//! propagate to the caller unchanged.

use weft_css::StyleError;
use weft_dom::CustomElementError;
use weft_html::TemplateError;

/// Descriptor chain collection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("{class} does not declare a descriptor")]
    MissingDescriptor { class: String },

    #[error("Descriptor id '{id}' appears twice in the chain of {class}")]
    DuplicateDescriptorId { id: String, class: String },

    #[error("Control id '{id}' of {class} is already used by {claimed_by}")]
    DuplicateControlId {
        id: String,
        class: String,
        claimed_by: String,
    },

    #[error("Invalid descriptor JSON: {0}")]
    Json(String),
}

/// Behavior installation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BehaviorError {
    #[error("Failed to construct behavior {behavior}: {message}")]
    Construction { behavior: String, message: String },
}

impl BehaviorError {
    pub fn construction(behavior: &str, message: impl Into<String>) -> Self {
        Self::Construction {
            behavior: behavior.to_string(),
            message: message.into(),
        }
    }
}

/// Control errors
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Custom element error: {0}")]
    Element(#[from] CustomElementError),

    #[error("No member named '{0}'")]
    UnknownMember(String),

    #[error("'{0}' is a method, not a property")]
    NotAnAccessor(String),

    #[error("'{0}' is a property, not a method")]
    NotAMethod(String),

    #[error("'{0}' has no getter")]
    NoGetter(String),

    #[error("'{0}' has no setter")]
    NoSetter(String),
}
