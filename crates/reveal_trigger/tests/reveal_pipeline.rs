//! Generator and trigger sharing one headless document

use std::time::Duration;

use reveal_animation::{Animations, ClassNames, Length, TimingOptions, STYLE_ELEMENT_ID};
use reveal_core::headless::HeadlessHost;
use reveal_core::{Document, StyleHost};
use reveal_trigger::{ScrollTrigger, TriggerOptions};

#[test]
fn test_preset_classes_line_up_with_trigger() {
    let host = HeadlessHost::new();
    let animations = Animations::new(&host);
    let preset = animations.fade_in_up(Length::px(40.0), &TimingOptions::default().duration(0.4));

    let card = host
        .element("article")
        .class("card")
        .class(preset.clone())
        .append_to(host.body());

    let trigger = ScrollTrigger::new(host.clone(), TriggerOptions::new().with_delay_ms(100)).unwrap();
    trigger.register("article.card").unwrap();

    let css = host.style_text(STYLE_ELEMENT_ID).unwrap();
    let classes = animations.classes();
    assert!(css.contains(&format!(".{}.{} {{", classes.initial, preset)));
    assert!(host.has_class(&card, &classes.initial));

    host.enter(card);
    host.advance(Duration::from_millis(100));

    assert!(host.has_class(&card, &classes.animate));
    assert!(!host.has_class(&card, &classes.initial));
    assert!(host.has_class(&card, "fade-in-up"));
}

#[test]
fn test_custom_class_names_shared() {
    let host = HeadlessHost::new();
    let classes = ClassNames::new("reveal-pending", "reveal-done");
    Animations::new(&host)
        .with_classes(classes.clone())
        .apply_base_styles(&classes.initial, &classes.animate);

    let item = host.element("li").append_to(host.body());
    let trigger = ScrollTrigger::new(
        host.clone(),
        TriggerOptions::new()
            .with_initial_class(classes.initial.clone())
            .with_animation_class(classes.animate.clone()),
    )
    .unwrap();
    trigger.register(vec![item]).unwrap();

    let css = host.style_text(STYLE_ELEMENT_ID).unwrap();
    assert!(css.contains(".reveal-pending {"));
    assert!(css.contains(".reveal-done {"));

    host.enter(item);
    host.run_until_idle();
    assert_eq!(host.classes(item), vec!["reveal-done".to_string()]);
}
