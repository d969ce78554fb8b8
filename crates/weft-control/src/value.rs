//! Prop values and attribute coercion
//!
//! Every declared prop carries an explicit [`PropType`]. Reflection between
//! string attributes and typed props goes through that type, never through
//! the runtime shape of the default value.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Merged prop values of a control instance
pub type Props = BTreeMap<String, PropValue>;

/// A prop value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Num(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Num(value.into())
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Declared type of a prop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Boolean,
    /// Not reflected to an attribute
    #[default]
    Any,
}

impl PropType {
    /// Whether props of this type mirror a DOM attribute
    pub fn reflects(&self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Coerce an attribute value into a prop value.
    ///
    /// A missing attribute reverts to `default`. Numbers that fail to parse,
    /// including unit-suffixed text like `12px` and non-finite values such
    /// as `NaN` or `inf`, also revert to `default`. Booleans are true only
    /// for the literal string `"true"`.
    pub fn from_attribute(&self, value: Option<&str>, default: &PropValue) -> PropValue {
        let Some(value) = value else {
            return default.clone();
        };
        match self {
            Self::String | Self::Any => PropValue::Str(value.to_string()),
            Self::Number => match value.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => PropValue::Num(n),
                _ => {
                    tracing::warn!("Attribute value '{}' is not a number", value);
                    default.clone()
                }
            },
            Self::Boolean => PropValue::Bool(value == "true"),
        }
    }

    /// Attribute text for a prop value. `None` means the attribute is removed.
    pub fn to_attribute(&self, value: &PropValue) -> Option<String> {
        if !self.reflects() {
            return None;
        }
        match value {
            PropValue::Null => None,
            PropValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            other => Some(other.to_string()),
        }
    }
}
