//! Composition tests for weft-control
//!
//! Descriptor collection against the process-wide registry, prop merging,
//! behavior fusion and the mount/unmount lifecycle. Every test uses its own
//! descriptor ids because the global registry is shared.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft_control::{
    Accessor, Behavior, BehaviorError, Control, ControlClass, ControlError, Descriptor,
    DescriptorError, Mixin, PropType, PropValue, Props, Prototype, get_descriptors,
};
use weft_css::css_rule;
use weft_dom::new_document;

fn props(pairs: &[(&str, PropValue)]) -> Props {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ============================================================================
// DESCRIPTOR COLLECTION
// ============================================================================

#[test]
fn test_collect_counts_distinct_levels() {
    let a = ControlClass::define("A").descriptor(Descriptor::new("it-count-a")).build();
    let b = ControlClass::extend(&a, "B").build();
    let c = ControlClass::extend(&b, "C")
        .descriptor(Descriptor::new("it-count-c"))
        .build();
    let d = ControlClass::extend(&c, "D").build();

    let chain = get_descriptors(&d).unwrap();
    let ids: Vec<&str> = chain.iter().map(|x| x.id.as_str()).collect();
    assert_eq!(ids, vec!["it-count-a", "it-count-c"]);
}

#[test]
fn test_second_class_with_same_leaf_id_fails() {
    let first = ControlClass::define("FirstSlider")
        .descriptor(Descriptor::new("it-slider"))
        .build();
    let second = ControlClass::define("SecondSlider")
        .descriptor(Descriptor::new("it-slider"))
        .build();

    assert!(get_descriptors(&first).is_ok());
    assert!(get_descriptors(&first).is_ok());
    let err = get_descriptors(&second).unwrap_err();
    assert_eq!(
        err,
        DescriptorError::DuplicateControlId {
            id: "it-slider".to_string(),
            class: "SecondSlider".to_string(),
            claimed_by: "FirstSlider".to_string(),
        }
    );
    assert!(err.to_string().contains("FirstSlider"));
}

#[test]
fn test_missing_descriptor_fails_construction() {
    let bare = ControlClass::define("Bare").build();
    assert!(matches!(
        Control::new(&bare, Props::new()),
        Err(ControlError::Descriptor(DescriptorError::MissingDescriptor { class })) if class == "Bare"
    ));
}

// ============================================================================
// PROPS
// ============================================================================

#[test]
fn test_merged_props() {
    let base = ControlClass::define("Field")
        .descriptor(
            Descriptor::new("it-field")
                .prop("foo", PropType::String, "a")
                .prop("bar", PropType::Number, 1),
        )
        .build();
    let derived = ControlClass::extend(&base, "TextField")
        .descriptor(
            Descriptor::new("it-text-field")
                .prop("bar", PropType::Number, 2)
                .prop("baz", PropType::Boolean, true),
        )
        .build();

    let control = Control::new(&derived, props(&[("foo", "x".into())])).unwrap();
    assert_eq!(
        control.props(),
        &props(&[
            ("foo", "x".into()),
            ("bar", PropValue::Num(2.0)),
            ("baz", PropValue::Bool(true)),
        ])
    );
}

// ============================================================================
// LIFECYCLE
// ============================================================================

fn toggle_class(id: &str) -> Rc<ControlClass> {
    let base = ControlClass::define("Widget")
        .descriptor(Descriptor::new(&format!("{}-base", id)))
        .build();
    ControlClass::extend(&base, "Toggle")
        .descriptor(
            Descriptor::new(id)
                .prop("on", PropType::Boolean, false)
                .template("<i class=\"knob\"></i>"),
        )
        .style(|| css_rule("&", [("display", "inline-block")], [css_rule("i", [("width", "1em")], [])]))
        .build()
}

#[test]
fn test_element_classes_follow_chain() {
    let doc = new_document();
    let body = doc.borrow().body();
    let mut control = Control::new(&toggle_class("it-toggle"), Props::new()).unwrap();
    let element = control.mount(&doc, body).unwrap();

    let d = doc.borrow();
    let classes = d.class_list(element).unwrap();
    assert_eq!(d.tag_name(element), Some("weft-it-toggle"));
    assert!(classes.contains("weft-it-toggle-base"));
    assert!(classes.contains("weft-it-toggle"));
    assert!(d.find_by_tag(element, "i").is_some());
}

#[test]
fn test_lifecycle_events() {
    let doc = new_document();
    let body = doc.borrow().body();
    let mut control = Control::new(&toggle_class("it-events"), Props::new()).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));

    for name in ["mount", "render", "unmount"] {
        let log = Rc::clone(&log);
        control.on(name, move |event| log.borrow_mut().push(event.event_type.clone()));
    }
    control.mount(&doc, body).unwrap();
    control.unmount();
    control.unmount();

    assert_eq!(*log.borrow(), vec!["mount", "render", "unmount"]);
    assert_eq!(control.listener_count("mount"), 0);
}

#[test]
fn test_remount_renders_template_once() {
    let doc = new_document();
    let body = doc.borrow().body();
    let mut control = Control::new(&toggle_class("it-remount"), Props::new()).unwrap();

    let element = control.mount(&doc, body).unwrap();
    control.unmount();
    let again = control.mount(&doc, body).unwrap();

    assert_eq!(element, again);
    assert_eq!(doc.borrow().element_children(element).len(), 1);
    assert!(control.style().is_some());
}

#[test]
fn test_style_mutation_through_control() {
    let doc = new_document();
    let body = doc.borrow().body();
    let mut control = Control::new(&toggle_class("it-style"), Props::new()).unwrap();
    control.mount(&doc, body).unwrap();

    let style = control.style_mut().unwrap();
    assert!(style.is_css_property("display"));
    style.select_mut("& i").unwrap().push("width", "2em");
    assert_eq!(style.select("& i").unwrap().value_of("width").as_deref(), Some("2em"));
    style.select_mut("& i").unwrap().pop();
    assert_eq!(style.select("& i").unwrap().value_of("width").as_deref(), Some("1em"));
}

// ============================================================================
// BEHAVIORS
// ============================================================================

struct Counter {
    count: Cell<i32>,
}

impl Behavior for Counter {
    const NAME: &'static str = "Counter";

    fn create() -> Result<Self, BehaviorError> {
        Ok(Self { count: Cell::new(10) })
    }

    fn prototype() -> Prototype<Self> {
        Prototype::new("Counter")
            .getter("count", |b: &Counter| PropValue::from(b.count.get()))
            .setter("count", |b: &Counter, value| {
                b.count.set(value.as_f64().unwrap_or(0.0) as i32)
            })
            .method("reset", |control, _| {
                control.set("count", 0)?;
                Ok(PropValue::Null)
            })
    }
}

/// Same exposed accessor name as `Counter`, separate private state
struct Shadow {
    count: Cell<i32>,
}

impl Behavior for Shadow {
    const NAME: &'static str = "Shadow";

    fn create() -> Result<Self, BehaviorError> {
        Ok(Self { count: Cell::new(-1) })
    }

    fn prototype() -> Prototype<Self> {
        Prototype::new("Shadow")
            .method("shadow", |_, _| Ok(PropValue::from("shadow")))
            .getter("shadowCount", |b: &Shadow| PropValue::from(b.count.get()))
    }
}

#[test]
fn test_accessor_state_lives_in_behavior() {
    let class = ControlClass::define("Clicker")
        .descriptor(Descriptor::new("it-clicker"))
        .build();
    let mut control = Mixin::new(&class)
        .with::<Counter>()
        .with::<Shadow>()
        .construct(Props::new())
        .unwrap();

    assert_eq!(control.get("count").unwrap(), PropValue::Num(10.0));
    control.set("count", 3).unwrap();
    assert_eq!(control.get("count").unwrap(), PropValue::Num(3.0));
    assert!(control.prop("count").is_none());

    control.call("reset", &[]).unwrap();
    assert_eq!(control.get("count").unwrap(), PropValue::Num(0.0));
    assert_eq!(control.call("shadow", &[]).unwrap(), PropValue::from("shadow"));
    assert_eq!(control.get("shadowCount").unwrap(), PropValue::Num(-1.0));
}

#[test]
fn test_each_instance_gets_its_own_behavior() {
    let class = ControlClass::define("Tally")
        .descriptor(Descriptor::new("it-tally"))
        .build();
    let mixin = Mixin::new(&class).with::<Counter>();
    let mut a = mixin.construct(Props::new()).unwrap();
    let b = mixin.construct(Props::new()).unwrap();

    a.set("count", 99).unwrap();
    assert_eq!(a.get("count").unwrap(), PropValue::Num(99.0));
    assert_eq!(b.get("count").unwrap(), PropValue::Num(10.0));
}

struct Echo;

impl Behavior for Echo {
    const NAME: &'static str = "Echo";

    fn create() -> Result<Self, BehaviorError> {
        Ok(Self)
    }

    fn prototype() -> Prototype<Self> {
        Prototype::new("Echo").getter("title", |_: &Echo| PropValue::from("echo"))
    }
}

#[test]
fn test_getter_only_keeps_prop_setter() {
    let class = ControlClass::define("Titled")
        .descriptor(Descriptor::new("it-titled").prop("title", PropType::String, "t"))
        .build();
    let mut control = Mixin::new(&class).with::<Echo>().construct(Props::new()).unwrap();

    control.set("title", "new").unwrap();
    assert_eq!(control.prop("title"), Some(&PropValue::from("new")));
    assert_eq!(control.get("title").unwrap(), PropValue::from("echo"));
}

#[test]
fn test_getter_only_over_host_setter() {
    let stored = Rc::new(RefCell::new(PropValue::Null));
    let sink = Rc::clone(&stored);
    let class = ControlClass::define("Sink")
        .descriptor(Descriptor::new("it-sink"))
        .accessor(
            "title",
            Accessor::new().setter(move |_, value| *sink.borrow_mut() = value),
        )
        .build();
    let mut control = Mixin::new(&class).with::<Echo>().construct(Props::new()).unwrap();

    control.set("title", "kept").unwrap();
    assert_eq!(*stored.borrow(), PropValue::from("kept"));
    assert_eq!(control.get("title").unwrap(), PropValue::from("echo"));
}
