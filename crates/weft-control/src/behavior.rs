//! Behavior mixins
//!
//! A behavior is a separately constructed object whose members are fused
//! onto a control at construction time. Methods are bound to the host
//! control. Accessors stay bound to the behavior object, so the state they
//! read and write lives in the behavior, not in the control.
//!
//! Fusion is permanent: there is no uninstall path.

use std::fmt;
use std::rc::Rc;

use crate::{
    Accessor, BehaviorError, Control, ControlClass, ControlError, ControlOptions,
    DescriptorRegistry, Getter, InstalledMember, Method, PropValue, Props, Setter,
};

/// Name that is never copied onto a host
const CONSTRUCTOR: &str = "constructor";

/// Getter bound to a behavior object
pub type BehaviorGetter<B> = Rc<dyn Fn(&B) -> PropValue>;
/// Setter bound to a behavior object
pub type BehaviorSetter<B> = Rc<dyn Fn(&B, PropValue)>;

/// One member declared on a behavior prototype level
pub enum Member<B> {
    /// Called with the host control
    Method(Method),
    /// Called with the behavior object. Either half may be missing.
    Accessor {
        get: Option<BehaviorGetter<B>>,
        set: Option<BehaviorSetter<B>>,
    },
}

impl<B> Clone for Member<B> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(method) => Self::Method(Rc::clone(method)),
            Self::Accessor { get, set } => Self::Accessor {
                get: get.clone(),
                set: set.clone(),
            },
        }
    }
}

impl<B> fmt::Debug for Member<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => write!(f, "Method"),
            Self::Accessor { get, set } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("set", &set.is_some())
                .finish(),
        }
    }
}

/// One level of a behavior's prototype chain
pub struct Prototype<B> {
    name: String,
    members: Vec<(String, Member<B>)>,
    parent: Option<Box<Prototype<B>>>,
}

impl<B: 'static> Prototype<B> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members declared on this level, in declaration order
    pub fn members(&self) -> &[(String, Member<B>)] {
        &self.members
    }

    pub fn parent(&self) -> Option<&Prototype<B>> {
        self.parent.as_deref()
    }

    /// Put `parent` above this level
    pub fn extends(mut self, parent: Prototype<B>) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Declare a method. Redeclaring a name on the same level replaces it.
    pub fn method(
        mut self,
        name: &str,
        method: impl Fn(&mut Control, &[PropValue]) -> Result<PropValue, ControlError> + 'static,
    ) -> Self {
        let method: Method = Rc::new(method);
        self.put(name, Member::Method(method));
        self
    }

    /// Declare the getter half of an accessor
    pub fn getter(mut self, name: &str, get: impl Fn(&B) -> PropValue + 'static) -> Self {
        let get: BehaviorGetter<B> = Rc::new(get);
        match self.accessor_mut(name) {
            Some((slot, _)) => *slot = Some(get),
            None => self.put(
                name,
                Member::Accessor {
                    get: Some(get),
                    set: None,
                },
            ),
        }
        self
    }

    /// Declare the setter half of an accessor
    pub fn setter(mut self, name: &str, set: impl Fn(&B, PropValue) + 'static) -> Self {
        let set: BehaviorSetter<B> = Rc::new(set);
        match self.accessor_mut(name) {
            Some((_, slot)) => *slot = Some(set),
            None => self.put(
                name,
                Member::Accessor {
                    get: None,
                    set: Some(set),
                },
            ),
        }
        self
    }

    fn accessor_mut(
        &mut self,
        name: &str,
    ) -> Option<(&mut Option<BehaviorGetter<B>>, &mut Option<BehaviorSetter<B>>)> {
        self.members.iter_mut().find_map(|(n, member)| match member {
            Member::Accessor { get, set } if n == name => Some((get, set)),
            _ => None,
        })
    }

    fn put(&mut self, name: &str, member: Member<B>) {
        self.members.retain(|(n, _)| n != name);
        self.members.push((name.to_string(), member));
    }

    /// Every level from this one up to the top of the chain
    pub fn chain(&self) -> impl Iterator<Item = &Prototype<B>> {
        std::iter::successors(Some(self), |level| level.parent())
    }
}

impl<B> fmt::Debug for Prototype<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("name", &self.name)
            .field("members", &self.members)
            .field("parent", &self.parent)
            .finish()
    }
}

/// A capability fused onto controls by [`Mixin`]
pub trait Behavior: Sized + 'static {
    const NAME: &'static str;

    /// Build a fresh behavior object. Called once per composite instance.
    fn create() -> Result<Self, BehaviorError>;

    /// The members to install, most derived level first
    fn prototype() -> Prototype<Self>;
}

/// Type-erased handle to a [`Behavior`]
#[derive(Clone, Copy)]
pub struct BehaviorClass {
    name: &'static str,
    install: fn(&mut Control) -> Result<usize, BehaviorError>,
}

impl BehaviorClass {
    pub fn of<B: Behavior>() -> Self {
        Self {
            name: B::NAME,
            install: install::<B>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Construct the behavior and fuse its members onto `control`.
    /// Returns the number of members installed.
    pub fn install(&self, control: &mut Control) -> Result<usize, BehaviorError> {
        (self.install)(control)
    }
}

impl fmt::Debug for BehaviorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BehaviorClass").field(&self.name).finish()
    }
}

/// Walk the behavior's chain from the most derived level upwards and copy
/// every member onto the host. A later write to the same name wins, so a
/// base level overrides a derived one.
fn install<B: Behavior>(control: &mut Control) -> Result<usize, BehaviorError> {
    let behavior = Rc::new(B::create()?);
    let prototype = B::prototype();
    let mut installed = 0;

    for level in prototype.chain() {
        for (name, member) in level.members() {
            if name == CONSTRUCTOR {
                continue;
            }
            let member = match member {
                Member::Method(method) => InstalledMember::Method(Rc::clone(method)),
                Member::Accessor { get, set } => {
                    let fallback = control.existing_accessor(name);
                    InstalledMember::Accessor(bind(&behavior, get, set).or(fallback))
                }
            };
            control.install_member(name, member);
            installed += 1;
        }
    }

    tracing::debug!(
        "Installed {} ({} members) on {}",
        B::NAME,
        installed,
        control.class().name()
    );
    Ok(installed)
}

/// Bind accessor halves to the behavior object
fn bind<B: 'static>(
    behavior: &Rc<B>,
    get: &Option<BehaviorGetter<B>>,
    set: &Option<BehaviorSetter<B>>,
) -> Accessor {
    let mut accessor = Accessor::new();
    if let Some(get) = get {
        let (behavior, get) = (Rc::clone(behavior), Rc::clone(get));
        let bound: Getter = Rc::new(move |_: &Control| get(&*behavior));
        accessor.get = Some(bound);
    }
    if let Some(set) = set {
        let (behavior, set) = (Rc::clone(behavior), Rc::clone(set));
        let bound: Setter = Rc::new(move |_: &mut Control, value: PropValue| set(&*behavior, value));
        accessor.set = Some(bound);
    }
    accessor
}

/// A control class composed with an ordered list of behaviors
#[derive(Debug, Clone)]
pub struct Mixin {
    class: Rc<ControlClass>,
    behaviors: Vec<BehaviorClass>,
    options: ControlOptions,
}

impl Mixin {
    pub fn new(class: &Rc<ControlClass>) -> Self {
        Self {
            class: Rc::clone(class),
            behaviors: Vec::new(),
            options: ControlOptions::default(),
        }
    }

    /// Append a behavior. Later behaviors win name collisions.
    pub fn with<B: Behavior>(self) -> Self {
        self.behavior(BehaviorClass::of::<B>())
    }

    pub fn behavior(mut self, behavior: BehaviorClass) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn options(mut self, options: ControlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn class(&self) -> &Rc<ControlClass> {
        &self.class
    }

    pub fn behaviors(&self) -> &[BehaviorClass] {
        &self.behaviors
    }

    /// Construct the control, then install every behavior in order. A
    /// failing behavior aborts construction and the partial instance is
    /// dropped.
    pub fn construct(&self, overrides: Props) -> Result<Control, ControlError> {
        let control = Control::with_options(&self.class, overrides, self.options.clone())?;
        self.fuse(control)
    }

    /// Like [`Mixin::construct`], against an explicit registry
    pub fn construct_with(
        &self,
        overrides: Props,
        registry: &mut DescriptorRegistry,
    ) -> Result<Control, ControlError> {
        let control =
            Control::with_registry(&self.class, overrides, self.options.clone(), registry)?;
        self.fuse(control)
    }

    fn fuse(&self, mut control: Control) -> Result<Control, ControlError> {
        for behavior in &self.behaviors {
            behavior.install(&mut control)?;
        }
        Ok(control)
    }
}
