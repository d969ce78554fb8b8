//! Control base
//!
//! A control merges the descriptor chain of its class into typed props,
//! renders the leaf template into an element, reflects reflectable props to
//! attributes and owns an instance-scoped [`DynamicStyle`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use weft_css::{DynamicStyle, StyleOptions};
use weft_dom::{
    CustomElementOptions, CustomElementRegistry, DocumentHandle, Event, EventHandler,
    EventRegistry, LifecycleCallback, LifecycleCallbackInfo, ListenerId, NodeId,
};

use crate::registry::get_descriptors;
use crate::{
    Accessor, ControlClass, ControlError, Descriptor, DescriptorRegistry, PropDef, PropValue,
    Props,
};

/// A method bound to the host control
pub type Method = Rc<dyn Fn(&mut Control, &[PropValue]) -> Result<PropValue, ControlError>>;

/// A member installed directly on one instance
#[derive(Clone)]
pub enum InstalledMember {
    Method(Method),
    Accessor(Accessor),
}

impl fmt::Debug for InstalledMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => write!(f, "Method"),
            Self::Accessor(accessor) => accessor.fmt(f),
        }
    }
}

/// Naming and style options of a control
#[derive(Debug, Clone)]
pub struct ControlOptions {
    /// Prefix of the element tag and of each descriptor class, `weft-` by default
    pub class_prefix: String,
    pub style: StyleOptions,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            class_prefix: "weft-".to_string(),
            style: StyleOptions::default(),
        }
    }
}

/// A control instance
pub struct Control {
    class: Rc<ControlClass>,
    descriptors: Vec<Rc<Descriptor>>,
    /// Merged prop declarations, derived levels win
    schema: Vec<PropDef>,
    props: Props,
    options: ControlOptions,
    document: Option<DocumentHandle>,
    element: Option<NodeId>,
    events: EventRegistry,
    style: Option<DynamicStyle>,
    members: HashMap<String, InstalledMember>,
    mounted: bool,
    rendered: bool,
}

impl Control {
    /// Construct an instance of `class`. `overrides` win over descriptor defaults.
    pub fn new(class: &Rc<ControlClass>, overrides: Props) -> Result<Self, ControlError> {
        Self::with_options(class, overrides, ControlOptions::default())
    }

    pub fn with_options(
        class: &Rc<ControlClass>,
        overrides: Props,
        options: ControlOptions,
    ) -> Result<Self, ControlError> {
        let descriptors = get_descriptors(class)?;
        Ok(Self::from_chain(class, descriptors, overrides, options))
    }

    /// Construct against an explicit registry instead of the global one
    pub fn with_registry(
        class: &Rc<ControlClass>,
        overrides: Props,
        options: ControlOptions,
        registry: &mut DescriptorRegistry,
    ) -> Result<Self, ControlError> {
        let descriptors = registry.collect(class)?;
        Ok(Self::from_chain(class, descriptors, overrides, options))
    }

    fn from_chain(
        class: &Rc<ControlClass>,
        descriptors: Vec<Rc<Descriptor>>,
        overrides: Props,
        options: ControlOptions,
    ) -> Self {
        let mut schema: Vec<PropDef> = Vec::new();
        for def in descriptors.iter().flat_map(|d| d.props.iter()) {
            match schema.iter_mut().find(|p| p.name == def.name) {
                Some(existing) => *existing = def.clone(),
                None => schema.push(def.clone()),
            }
        }

        let mut props: Props = schema
            .iter()
            .map(|def| (def.name.clone(), def.default.clone()))
            .collect();
        props.extend(overrides);

        tracing::trace!("Constructed {} with {} props", class.name(), props.len());
        Self {
            class: Rc::clone(class),
            descriptors,
            schema,
            props,
            options,
            document: None,
            element: None,
            events: EventRegistry::new(),
            style: None,
            members: HashMap::new(),
            mounted: false,
            rendered: false,
        }
    }

    pub fn class(&self) -> &Rc<ControlClass> {
        &self.class
    }

    /// Descriptor chain, base first
    pub fn descriptors(&self) -> &[Rc<Descriptor>] {
        &self.descriptors
    }

    /// Id of the most derived descriptor
    pub fn leaf_id(&self) -> &str {
        self.descriptors.last().map_or("", |d| d.id.as_str())
    }

    /// Element tag, `{prefix}{leaf id}`
    pub fn tag_name(&self) -> String {
        format!("{}{}", self.options.class_prefix, self.leaf_id())
    }

    /// One class per descriptor, base first
    pub fn class_names(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| format!("{}{}", self.options.class_prefix, d.id))
            .collect()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn prop_def(&self, name: &str) -> Option<&PropDef> {
        self.schema.iter().find(|p| p.name == name)
    }

    /// Names of props that mirror an attribute
    pub fn observed_attributes(&self) -> Vec<String> {
        self.schema
            .iter()
            .filter(|p| p.kind.reflects())
            .map(|p| p.name.clone())
            .collect()
    }

    /// Set a prop and reflect it to the element when one exists
    pub fn set_prop(&mut self, name: &str, value: impl Into<PropValue>) -> Option<PropValue> {
        let value = value.into();
        self.reflect(name, &value);
        self.props.insert(name.to_string(), value)
    }

    fn reflect(&self, name: &str, value: &PropValue) {
        let (Some(document), Some(element)) = (&self.document, self.element) else {
            return;
        };
        let Some(def) = self.prop_def(name) else {
            return;
        };
        if !def.kind.reflects() {
            return;
        }
        let mut doc = document.borrow_mut();
        match def.kind.to_attribute(value) {
            Some(text) => {
                doc.set_attribute(element, name, &text);
            }
            None => {
                doc.remove_attribute(element, name);
            }
        }
    }

    /// Apply an attribute change to the matching prop. A removed attribute
    /// reverts the prop to its descriptor default.
    pub fn attribute_changed(&mut self, name: &str, value: Option<&str>) -> bool {
        let Some(def) = self.prop_def(name) else {
            return false;
        };
        if !def.kind.reflects() {
            return false;
        }
        let coerced = def.kind.from_attribute(value, &def.default);
        tracing::trace!("Attribute {} -> {}", name, coerced);
        self.props.insert(name.to_string(), coerced);
        true
    }

    /// Dispatch a custom element lifecycle callback
    pub fn lifecycle(&mut self, info: &LifecycleCallbackInfo) -> Result<(), ControlError> {
        match info.callback {
            LifecycleCallback::Connected => self.render(),
            LifecycleCallback::Disconnected => {
                self.unmount();
                Ok(())
            }
            LifecycleCallback::AttributeChanged => {
                if let Some(name) = &info.attribute_name {
                    self.attribute_changed(name, info.new_value.as_deref());
                }
                Ok(())
            }
        }
    }

    /// The element, once mounted
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attach the element under `parent`, creating it on first mount, then render
    pub fn mount(&mut self, document: &DocumentHandle, parent: NodeId) -> Result<NodeId, ControlError> {
        if let (true, Some(element)) = (self.mounted, self.element) {
            return Ok(element);
        }

        let element = match self.element {
            Some(element) => element,
            None => self.create_element(document),
        };
        document.borrow_mut().append_child(parent, element);
        self.document = Some(DocumentHandle::clone(document));
        self.element = Some(element);
        self.mounted = true;

        tracing::debug!("Mounted <{}>", self.tag_name());
        self.emit("mount", None);
        self.render()?;
        Ok(element)
    }

    fn create_element(&self, document: &DocumentHandle) -> NodeId {
        let mut doc = document.borrow_mut();
        let element = doc.create_element(&self.tag_name());
        if let Some(classes) = doc.class_list_mut(element) {
            for class in self.class_names() {
                classes.add(&class);
            }
        }
        for def in self.schema.iter().filter(|p| p.kind.reflects()) {
            let value = self.props.get(&def.name).unwrap_or(&def.default);
            if let Some(text) = def.kind.to_attribute(value) {
                doc.set_attribute(element, &def.name, &text);
            }
        }
        element
    }

    /// Materialise the template and compile the class style.
    ///
    /// Does nothing before the control is mounted. The template is parsed
    /// once per instance.
    pub fn render(&mut self) -> Result<(), ControlError> {
        let (Some(document), Some(element)) = (self.document.clone(), self.element) else {
            tracing::trace!("Render of {} before mount ignored", self.class.name());
            return Ok(());
        };
        if !self.mounted {
            return Ok(());
        }

        if !self.rendered {
            if let Some(template) = self.template() {
                let nodes = weft_html::parse_template(&mut document.borrow_mut(), element, template)?;
                tracing::trace!("Template produced {} nodes", nodes.len());
            }
            self.rendered = true;
        }

        let factory = if self.style.is_none() { self.class.style() } else { None };
        if let Some(factory) = factory {
            let style = DynamicStyle::with_options(&document, factory(), &self.options.style)?;
            if let Some(classes) = document.borrow_mut().class_list_mut(element) {
                classes.add(style.class_name());
            }
            self.style = Some(style);
        }

        self.emit("render", None);
        Ok(())
    }

    /// Most derived non-empty template
    fn template(&self) -> Option<&str> {
        self.descriptors
            .iter()
            .rev()
            .map(|d| d.template.as_str())
            .find(|t| !t.trim().is_empty())
    }

    /// Detach the element, dispose the style and drop every listener.
    /// Calling it again, or before mount, does nothing.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.emit("unmount", None);

        if let (Some(document), Some(element)) = (&self.document, self.element) {
            document.borrow_mut().remove(element);
        }
        if let Some(style) = self.style.take() {
            if let (Some(document), Some(element)) = (&self.document, self.element) {
                if let Some(classes) = document.borrow_mut().class_list_mut(element) {
                    classes.remove(style.class_name());
                }
            }
            style.dispose();
        }
        self.events.clear();
        self.mounted = false;
        tracing::debug!("Unmounted <{}>", self.tag_name());
    }

    /// Append a listener for `event_type`
    pub fn on(&mut self, event_type: &str, handler: impl Fn(&Event) + 'static) -> ListenerId {
        let handler: EventHandler = Rc::new(handler);
        self.events.on(event_type, handler)
    }

    /// Remove one listener, or all of the type when `listener` is None
    pub fn off(&mut self, event_type: &str, listener: Option<ListenerId>) -> usize {
        self.events.off(event_type, listener)
    }

    /// Notify this control's listeners in registration order. Returns the
    /// number notified.
    ///
    /// Events target the control's element but are not dispatched through
    /// the document, so nothing propagates to ancestor controls.
    pub fn emit(&self, event_type: &str, detail: Option<&str>) -> usize {
        let mut event = Event::new(event_type, self.element.unwrap_or(NodeId::NONE));
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.events.emit(&event)
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.events.listener_count(event_type)
    }

    pub fn style(&self) -> Option<&DynamicStyle> {
        self.style.as_ref()
    }

    pub fn style_mut(&mut self) -> Option<&mut DynamicStyle> {
        self.style.as_mut()
    }

    /// Install a member on this instance, replacing one of the same name
    pub fn install_member(&mut self, name: &str, member: InstalledMember) {
        self.members.insert(name.to_string(), member);
    }

    /// Whether `name` resolves to an instance member, a class accessor or a prop
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
            || self.class.find_accessor(name).is_some()
            || self.props.contains_key(name)
    }

    /// The accessor `name` currently resolves to: an instance accessor, then
    /// the nearest class accessor, then the declared prop itself
    pub fn existing_accessor(&self, name: &str) -> Option<Accessor> {
        if let Some(InstalledMember::Accessor(accessor)) = self.members.get(name) {
            return Some(accessor.clone());
        }
        if let Some(accessor) = self.class.find_accessor(name) {
            return Some(accessor);
        }
        self.prop_def(name).map(|_| prop_accessor(name))
    }

    /// Read a member through its getter
    pub fn get(&self, name: &str) -> Result<PropValue, ControlError> {
        if let Some(InstalledMember::Method(_)) = self.members.get(name) {
            return Err(ControlError::NotAnAccessor(name.to_string()));
        }
        if let Some(accessor) = self.existing_accessor(name) {
            let get = accessor
                .get
                .ok_or_else(|| ControlError::NoGetter(name.to_string()))?;
            return Ok(get(self));
        }
        self.props
            .get(name)
            .cloned()
            .ok_or_else(|| ControlError::UnknownMember(name.to_string()))
    }

    /// Write a member through its setter. Undeclared names become props.
    pub fn set(&mut self, name: &str, value: impl Into<PropValue>) -> Result<(), ControlError> {
        let value = value.into();
        if let Some(InstalledMember::Method(_)) = self.members.get(name) {
            return Err(ControlError::NotAnAccessor(name.to_string()));
        }
        match self.existing_accessor(name) {
            Some(accessor) => {
                let set = accessor
                    .set
                    .ok_or_else(|| ControlError::NoSetter(name.to_string()))?;
                set(self, value);
            }
            None => {
                self.set_prop(name, value);
            }
        }
        Ok(())
    }

    /// Call an installed method
    pub fn call(&mut self, name: &str, args: &[PropValue]) -> Result<PropValue, ControlError> {
        match self.members.get(name) {
            Some(InstalledMember::Method(method)) => {
                let method = Rc::clone(method);
                method(self, args)
            }
            Some(InstalledMember::Accessor(_)) => Err(ControlError::NotAMethod(name.to_string())),
            None if self.has_member(name) => Err(ControlError::NotAMethod(name.to_string())),
            None => Err(ControlError::UnknownMember(name.to_string())),
        }
    }
}

/// Accessor backed directly by the prop of the same name
fn prop_accessor(name: &str) -> Accessor {
    let get_name = name.to_string();
    let set_name = name.to_string();
    Accessor::new()
        .getter(move |control| control.prop(&get_name).cloned().unwrap_or_default())
        .setter(move |control, value| {
            control.set_prop(&set_name, value);
        })
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("class", &self.class.name())
            .field("props", &self.props)
            .field("element", &self.element)
            .field("mounted", &self.mounted)
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Register `class` as a custom element named `{prefix}{leaf id}` observing
/// every reflected prop. Returns the element name.
pub fn define_element(
    class: &Rc<ControlClass>,
    registry: &mut CustomElementRegistry,
    options: &ControlOptions,
) -> Result<String, ControlError> {
    let descriptors = get_descriptors(class)?;
    let leaf = descriptors.last().map_or("", |d| d.id.as_str());
    let name = format!("{}{}", options.class_prefix, leaf);

    let mut observed_attributes: Vec<String> = Vec::new();
    for def in descriptors.iter().flat_map(|d| d.props.iter()) {
        if def.kind.reflects() && !observed_attributes.contains(&def.name) {
            observed_attributes.push(def.name.clone());
        }
    }

    registry.define(
        &name,
        CustomElementOptions {
            class_name: class.name().to_string(),
            observed_attributes,
        },
    )?;
    Ok(name)
}
