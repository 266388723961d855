use super::*;
use crate::animation::probe::{self, Event, Probe};

#[test]
fn timing_defaults_to_one_second_linear() {
    let t = Timing::default();
    assert_eq!(t.duration(), 1.0);
    assert_eq!(t.ease(), Ease::Linear);
}

#[test]
fn non_positive_durations_are_floored() {
    let mut t = Timing::default();
    t.set_duration(0.0);
    assert_eq!(t.duration(), MIN_DURATION_SECS);
    t.set_duration(-3.0);
    assert_eq!(t.duration(), MIN_DURATION_SECS);
    t.set_duration(f64::NEG_INFINITY);
    assert_eq!(t.duration(), MIN_DURATION_SECS);
    t.set_duration(2.5);
    assert_eq!(t.duration(), 2.5);
}

#[test]
fn nan_duration_is_passed_through() {
    let mut t = Timing::default();
    t.set_duration(f64::NAN);
    assert!(t.duration().is_nan());
}

#[test]
fn interpolate_pins_endpoints() {
    let from = 0.1;
    let to = 0.3;
    assert_eq!(interpolate(&from, &to, 0.0, 0.0), 0.1);
    assert_eq!(interpolate(&from, &to, 1.0, 1.0), 0.3);
    assert_eq!(interpolate(&from, &to, 1.2, 1.0), 0.3);
    let mid = interpolate(&from, &to, 0.5, 0.5);
    assert!((mid - 0.2).abs() < 1e-12);
}

#[test]
fn vec2_lerp_is_componentwise() {
    let a = Vec2::new(0.0, 10.0);
    let b = Vec2::new(10.0, -10.0);
    assert_eq!(<Vec2 as Lerp>::lerp(&a, &b, 0.25), Vec2::new(2.5, 5.0));
}

#[test]
fn fluent_builders_configure_boxed_animations() {
    let log = probe::log();
    let anim = Probe::boxed("a", 1.0, &log)
        .with_duration(3.0)
        .with_easing("easeOut");
    assert_eq!(anim.duration(), 3.0);
    assert_eq!(anim.ease(), Ease::EaseOut);

    let anim = Probe::new("b", 1.0, &log).with_ease(Ease::Bounce).boxed();
    assert_eq!(anim.ease(), Ease::Bounce);
    assert_eq!(anim.label(), "probe");
}

#[test]
fn slot_finishes_exactly_once() {
    let log = probe::log();
    let mut slot = Slot::new(Probe::boxed("a", 1.0, &log));
    slot.finish();
    slot.finish();
    assert_eq!(probe::setups(&log, "a"), 1);
    assert_eq!(probe::cleanups(&log, "a"), 1);
    assert_eq!(
        log.borrow().as_slice(),
        &[Event::Setup("a"), Event::Tick("a", 1.0), Event::Cleanup("a")]
    );
}
