//! Weft Control
//!
//! Descriptor-driven controls. A control class chain declares descriptors;
//! the collector merges them into typed props, the control renders them into
//! the DOM with a scoped stylesheet, and behaviors are fused onto instances
//! through [`Mixin`].

mod behavior;
mod class;
mod control;
mod descriptor;
mod error;
mod registry;
mod value;

pub use behavior::{
    Behavior, BehaviorClass, BehaviorGetter, BehaviorSetter, Member, Mixin, Prototype,
};
pub use class::{Accessor, ClassBuilder, ClassId, ControlClass, Getter, Setter, StyleFactory};
pub use control::{Control, ControlOptions, InstalledMember, Method, define_element};
pub use descriptor::{Descriptor, PropDef};
pub use error::{BehaviorError, ControlError, DescriptorError};
pub use registry::{DescriptorRegistry, get_descriptors};
pub use value::{PropType, PropValue, Props};
