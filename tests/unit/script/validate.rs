use serde_json::json;

use super::*;
use crate::script::model::{OpDef, Vec2Def};

fn parse(v: serde_json::Value) -> SceneDef {
    serde_json::from_value(v).unwrap()
}

fn messages(v: serde_json::Value) -> Vec<String> {
    match validate_scene(&parse(v)) {
        Ok(()) => Vec::new(),
        Err(e) => e.errors.iter().map(ToString::to_string).collect(),
    }
}

fn example() -> serde_json::Value {
    json!({
        "canvas": {"width": 640, "height": 360},
        "fps": {"num": 30, "den": 1},
        "background": "#101218",
        "fonts": {"main": "fonts/Inter.ttf"},
        "nodes": [
            {"name": "box", "shape": {"kind": "rect", "width": 120, "height": 80},
             "position": [320, 180], "style": {"fill": "#3366ff"}},
            {"name": "title", "text": {"content": "Hello", "font": "main", "size": 48},
             "position": [200, 80]}
        ],
        "timeline": [
            {"play": [{"op": "move_by", "target": "box", "by": [100, 0], "duration": 1.5, "ease": "easeInOut"}]},
            {"wait": 0.5},
            {"play": [{"op": "sequence", "children": [
                {"op": "fade_out", "target": "title", "index": 0},
                {"op": "rotate_by", "target": "box", "by": 3.14159}]}]}
        ]
    })
}

#[test]
fn documented_example_parses_and_validates() {
    let def = parse(example());
    assert_eq!(def.nodes.len(), 2);
    assert_eq!(def.timeline.len(), 3);
    let StepDef::Play(first) = &def.timeline[0] else {
        panic!("expected a play step");
    };
    assert!(matches!(first[0].op, OpDef::MoveBy { by } if by == Vec2Def { x: 100.0, y: 0.0 }));
    assert_eq!(first[0].target.as_deref(), Some("box"));
    assert_eq!(first[0].duration, Some(1.5));
    assert!(matches!(def.timeline[1], StepDef::Wait(w) if w == 0.5));
    assert!(validate_scene(&def).is_ok());
}

#[test]
fn vec2_accepts_array_object_and_scalar() {
    let a: Vec2Def = serde_json::from_value(json!([1, 2])).unwrap();
    let b: Vec2Def = serde_json::from_value(json!({"x": 1.0, "y": 2.0})).unwrap();
    let c: Vec2Def = serde_json::from_value(json!(1.5)).unwrap();
    assert_eq!(a, Vec2Def { x: 1.0, y: 2.0 });
    assert_eq!(a, b);
    assert_eq!(c, Vec2Def { x: 1.5, y: 1.5 });
    assert!(serde_json::from_value::<Vec2Def>(json!("nope")).is_err());
}

#[test]
fn fps_defaults_when_omitted() {
    let def = parse(json!({"canvas": {"width": 4, "height": 4}}));
    assert_eq!((def.fps.num, def.fps.den), (30, 1));
    assert!(def.nodes.is_empty());
    assert!(validate_scene(&def).is_ok());
}

#[test]
fn zero_canvas_and_fps_are_rejected() {
    let errs = messages(json!({
        "canvas": {"width": 0, "height": 10},
        "fps": {"num": 0, "den": 1}
    }));
    assert_eq!(errs.len(), 2);
    assert!(errs[0].starts_with("$.canvas:"));
    assert!(errs[1].starts_with("$.fps:"));
}

#[test]
fn duplicate_names_are_found_inside_groups() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "nodes": [
            {"name": "a", "shape": {"kind": "circle", "radius": 1}},
            {"name": "g", "group": {"children": [
                {"name": "a", "shape": {"kind": "square", "size": 1}}
            ]}}
        ]
    }));
    assert_eq!(errs, vec!["$.nodes[1].group.children[0].name: duplicate node name 'a'"]);
}

#[test]
fn node_kind_must_be_unique() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "nodes": [
            {"name": "none"},
            {"name": "both", "shape": {"kind": "circle", "radius": 1}, "group": {"children": []}}
        ]
    }));
    assert_eq!(errs.len(), 2);
    assert!(errs[0].contains("'none' must set exactly one"));
    assert!(errs[1].contains("'both' must set exactly one"));
}

#[test]
fn unknown_font_key_is_reported_at_the_font() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "nodes": [{"name": "t", "text": {"content": "x", "font": "missing", "size": 12}}]
    }));
    assert_eq!(errs, vec!["$.nodes[0].text.font: unknown font key 'missing'"]);
}

#[test]
fn empty_text_content_is_reported() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "fonts": {"f": "f.ttf"},
        "nodes": [{"name": "t", "text": {"content": "", "font": "f", "size": 12}}]
    }));
    assert_eq!(errs, vec!["$.nodes[0].text.content: text content must be non-empty"]);
}

#[test]
fn timeline_references_are_checked() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "fonts": {"f": "f.ttf"},
        "nodes": [
            {"name": "box", "shape": {"kind": "square", "size": 2}},
            {"name": "hi", "text": {"content": "hi", "font": "f", "size": 12}}
        ],
        "timeline": [
            {"play": [
                {"op": "fade_in", "target": "ghost"},
                {"op": "fade_in", "target": "box", "index": 0},
                {"op": "fade_in", "target": "hi", "index": 2},
                {"op": "fade_in", "target": "hi", "index": 1},
                {"op": "fade_in"}
            ]}
        ]
    }));
    assert_eq!(
        errs,
        vec![
            "$.timeline[0].play[0].target: unknown node 'ghost'",
            "$.timeline[0].play[1].target: node 'box' has no children to index",
            "$.timeline[0].play[2].target: index 2 out of range for 'hi' with 2 children",
            "$.timeline[0].play[4]: fade_in requires a target",
        ]
    );
}

#[test]
fn empty_composites_and_steps_are_rejected() {
    let errs = messages(json!({
        "canvas": {"width": 8, "height": 8},
        "nodes": [{"name": "box", "shape": {"kind": "square", "size": 2}}],
        "timeline": [
            {"play": []},
            {"play": [{"op": "parallel", "children": [
                {"op": "sequence", "children": []},
                {"op": "move_to", "target": "box", "to": [1, 1]}
            ]}]},
            {"wait": -1.0}
        ]
    }));
    assert_eq!(
        errs,
        vec![
            "$.timeline[0].play: play needs at least one animation",
            "$.timeline[1].play[0].children[0]: sequence needs at least one child",
            "$.timeline[2].wait: wait must be finite and >= 0",
        ]
    );
}

#[test]
fn error_path_is_exposed() {
    let def = parse(json!({"canvas": {"width": 0, "height": 1}}));
    let errs = validate_scene(&def).unwrap_err();
    assert_eq!(errs.errors[0].path(), "$.canvas");
    assert_eq!(errs.to_string(), "$.canvas: canvas width/height must be > 0");
}
