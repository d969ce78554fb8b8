//! Example: a button control with a pressable behavior

use std::cell::Cell;

use tracing_subscriber::EnvFilter;
use weft::control::{BehaviorError, Prototype};
use weft::{Behavior, Config, ControlClass, Descriptor, Mixin, PropType, PropValue, Props, css_rule};

struct Pressable {
    presses: Cell<u32>,
}

impl Behavior for Pressable {
    const NAME: &'static str = "Pressable";

    fn create() -> Result<Self, BehaviorError> {
        Ok(Self { presses: Cell::new(0) })
    }

    fn prototype() -> Prototype<Self> {
        Prototype::new("Pressable")
            .method("press", |control, _| {
                control.emit("press", None);
                Ok(PropValue::Null)
            })
            .getter("presses", |b: &Pressable| PropValue::Num(b.presses.get().into()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::default();
    tracing::info!("Weft {} example starting", weft::VERSION);
    let button = ControlClass::define("Button")
        .descriptor(
            Descriptor::new("button")
                .prop("label", PropType::String, "Press")
                .prop("pressed", PropType::Boolean, false)
                .template("<span class=\"label\">Press</span>"),
        )
        .style(|| {
            css_rule(
                "&",
                [("color", "black"), ("padding", "4px")],
                [css_rule("&.down", [("backgroundColor", "#444")], [])],
            )
        })
        .build();

    let mut control = Mixin::new(&button)
        .with::<Pressable>()
        .options(config.control_options())
        .construct(Props::from([("label".to_string(), PropValue::from("OK"))]))?;

    let document = weft::dom::new_document();
    let body = document.borrow().body();
    control.on("press", |event| tracing::info!("pressed {:?}", event.target));
    control.mount(&document, body)?;
    control.call("press", &[])?;

    if let Some(style) = control.style_mut() {
        style.select_mut("& &.down")?.push("backgroundColor", "#888");
        println!("{}", style.sheet().borrow().to_css());
        style.select_mut("& &.down")?.pop();
    }

    println!("Weft v{} mounted <{}>", weft::VERSION, control.tag_name());
    control.unmount();
    Ok(())
}
