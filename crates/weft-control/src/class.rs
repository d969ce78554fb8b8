//! Control classes
//!
//! A control class is one level of a single-inheritance hierarchy rooted at
//! [`ControlClass::root`]. A level may declare its own descriptor; a level
//! that does not sees its parent's.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use weft_css::CssRuleNode;

use crate::{Control, Descriptor, PropValue};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique class identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

/// Getter bound to a control
pub type Getter = Rc<dyn Fn(&Control) -> PropValue>;
/// Setter bound to a control
pub type Setter = Rc<dyn Fn(&mut Control, PropValue)>;
/// Builds the rule tree compiled for each mounted instance
pub type StyleFactory = Rc<dyn Fn() -> CssRuleNode>;

/// A property accessor. Either half may be missing.
#[derive(Clone, Default)]
pub struct Accessor {
    pub get: Option<Getter>,
    pub set: Option<Setter>,
}

impl Accessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn getter(mut self, get: impl Fn(&Control) -> PropValue + 'static) -> Self {
        let get: Getter = Rc::new(get);
        self.get = Some(get);
        self
    }

    pub fn setter(mut self, set: impl Fn(&mut Control, PropValue) + 'static) -> Self {
        let set: Setter = Rc::new(set);
        self.set = Some(set);
        self
    }

    /// Fill whichever halves are missing from `fallback`
    pub fn or(mut self, fallback: Option<Accessor>) -> Self {
        if let Some(fallback) = fallback {
            if self.get.is_none() {
                self.get = fallback.get;
            }
            if self.set.is_none() {
                self.set = fallback.set;
            }
        }
        self
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .finish()
    }
}

/// One level of a control class hierarchy
pub struct ControlClass {
    id: ClassId,
    name: String,
    parent: Option<Rc<ControlClass>>,
    descriptor: Option<Rc<Descriptor>>,
    style: Option<StyleFactory>,
    accessors: Vec<(String, Accessor)>,
}

thread_local! {
    static ROOT: Rc<ControlClass> = Rc::new(ControlClass {
        id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
        name: "Control".to_string(),
        parent: None,
        descriptor: None,
        style: None,
        accessors: Vec::new(),
    });
}

impl ControlClass {
    /// The root base class every control class extends. It has no descriptor.
    pub fn root() -> Rc<ControlClass> {
        ROOT.with(Rc::clone)
    }

    /// Start a direct subclass of the root
    pub fn define(name: &str) -> ClassBuilder {
        Self::extend(&Self::root(), name)
    }

    /// Start a subclass of `parent`
    pub fn extend(parent: &Rc<ControlClass>, name: &str) -> ClassBuilder {
        ClassBuilder {
            name: name.to_string(),
            parent: Rc::clone(parent),
            descriptor: None,
            style: None,
            accessors: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<ControlClass>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The descriptor declared at this level, if any
    pub fn own_descriptor(&self) -> Option<&Rc<Descriptor>> {
        self.descriptor.as_ref()
    }

    /// The descriptor this level reports: its own, or the nearest ancestor's
    pub fn descriptor(&self) -> Option<Rc<Descriptor>> {
        match &self.descriptor {
            Some(descriptor) => Some(Rc::clone(descriptor)),
            None => self.parent.as_ref().and_then(|p| p.descriptor()),
        }
    }

    /// Nearest style factory along the chain
    pub fn style(&self) -> Option<StyleFactory> {
        match &self.style {
            Some(style) => Some(Rc::clone(style)),
            None => self.parent.as_ref().and_then(|p| p.style()),
        }
    }

    /// Nearest accessor named `name`, walking from this level to the root
    pub fn find_accessor(&self, name: &str) -> Option<Accessor> {
        self.accessors
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a.clone())
            .or_else(|| self.parent.as_ref().and_then(|p| p.find_accessor(name)))
    }

    /// Whether `ancestor` is this class or one of its ancestors
    pub fn is_subclass_of(&self, ancestor: &ControlClass) -> bool {
        if self.id == ancestor.id {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|p| p.is_subclass_of(ancestor))
    }
}

impl fmt::Debug for ControlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlClass")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("descriptor", &self.descriptor.as_ref().map(|d| d.id.as_str()))
            .finish()
    }
}

/// Builder for a control class level
pub struct ClassBuilder {
    name: String,
    parent: Rc<ControlClass>,
    descriptor: Option<Descriptor>,
    style: Option<StyleFactory>,
    accessors: Vec<(String, Accessor)>,
}

impl ClassBuilder {
    /// Declare this level's descriptor
    pub fn descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Rule tree compiled for every mounted instance
    pub fn style(mut self, style: impl Fn() -> CssRuleNode + 'static) -> Self {
        let style: StyleFactory = Rc::new(style);
        self.style = Some(style);
        self
    }

    /// Declare an accessor on this level
    pub fn accessor(mut self, name: &str, accessor: Accessor) -> Self {
        self.accessors.retain(|(n, _)| n != name);
        self.accessors.push((name.to_string(), accessor));
        self
    }

    pub fn build(self) -> Rc<ControlClass> {
        Rc::new(ControlClass {
            id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
            name: self.name,
            parent: Some(self.parent),
            descriptor: self.descriptor.map(Rc::new),
            style: self.style,
            accessors: self.accessors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropType;

    #[test]
    fn test_descriptor_inherited_by_identity() {
        let base = ControlClass::define("Base")
            .descriptor(Descriptor::new("class-base"))
            .build();
        let sub = ControlClass::extend(&base, "Sub").build();

        assert!(sub.own_descriptor().is_none());
        let inherited = sub.descriptor().unwrap();
        assert!(Rc::ptr_eq(&inherited, base.own_descriptor().unwrap()));
        assert!(sub.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&sub));
    }

    #[test]
    fn test_root_is_shared() {
        let a = ControlClass::root();
        let b = ControlClass::root();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(a.is_root());
        assert!(a.descriptor().is_none());
    }

    #[test]
    fn test_find_accessor_walks_chain() {
        let base = ControlClass::define("Base")
            .descriptor(Descriptor::new("class-acc").prop("x", PropType::Number, 1))
            .accessor("double", Accessor::new().getter(|c| {
                PropValue::Num(c.prop("x").and_then(PropValue::as_f64).unwrap_or(0.0) * 2.0)
            }))
            .build();
        let sub = ControlClass::extend(&base, "Sub").build();

        let accessor = sub.find_accessor("double").unwrap();
        assert!(accessor.get.is_some());
        assert!(accessor.set.is_none());
        assert!(sub.find_accessor("triple").is_none());
    }
}
