//! Weft
//!
//! Descriptor-driven UI controls on a small arena DOM.
//!
//! # Example
//! ```rust,ignore
//! use weft::control::{Control, ControlClass, Descriptor, PropType, Props};
//!
//! let button = ControlClass::define("Button")
//!     .descriptor(Descriptor::new("button").prop("label", PropType::String, "OK"))
//!     .build();
//! let mut control = Control::new(&button, Props::new())?;
//! let document = weft::dom::new_document();
//! let body = document.borrow().body();
//! control.mount(&document, body)?;
//! ```

mod config;

pub use config::{Config, ConfigError};

pub use weft_control as control;
pub use weft_css as css;
pub use weft_dom as dom;
pub use weft_html as html;

pub use weft_control::{
    Behavior, Control, ControlClass, ControlError, Descriptor, Mixin, PropType, PropValue, Props,
};
pub use weft_css::{DynamicStyle, css_rule};

/// Toolkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
