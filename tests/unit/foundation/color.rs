use super::*;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c = parse_hex("#ff0000").unwrap();
    assert_eq!(c.rgba, Rgba8::opaque(255, 0, 0));
    assert!(!c.has_alpha);

    let c = parse_hex("#0000FF80").unwrap();
    assert_eq!(c.rgba, Rgba8::new(0, 0, 255, 128));
    assert!(c.has_alpha);
}

#[test]
fn rejects_non_hex_forms() {
    for s in ["red", "ff0000", "#fff", "#ff00001", "#gg0000", "#+f0000", "", "#ééé"] {
        assert!(parse_hex(s).is_none(), "{s} should not parse as hex");
    }
}

#[test]
fn paintable_colors_include_named_palette() {
    assert_eq!(Rgba8::parse("red"), Some(Rgba8::opaque(255, 0, 0)));
    assert_eq!(Rgba8::parse("  White "), Some(Rgba8::opaque(255, 255, 255)));
    assert_eq!(Rgba8::parse("#00ff00"), Some(Rgba8::opaque(0, 255, 0)));
    assert_eq!(Rgba8::parse("chartreuse-ish"), None);
}

#[test]
fn hex_encoding_matches_alpha_presence() {
    let c = Rgba8::new(1, 2, 255, 16);
    assert_eq!(c.to_hex(false), "#0102ff");
    assert_eq!(c.to_hex(true), "#0102ff10");
}

#[test]
fn lerp_rounds_per_channel() {
    let a = Rgba8::opaque(0, 0, 0);
    let b = Rgba8::new(255, 100, 1, 0);
    let mid = Rgba8::lerp(a, b, 0.5);
    assert_eq!(mid, Rgba8::new(128, 50, 1, 128));
    assert_eq!(Rgba8::lerp(a, b, 0.0), a);
    assert_eq!(Rgba8::lerp(a, b, 1.0), b);
}

#[test]
fn premultiply_scales_channels() {
    assert_eq!(Rgba8::new(255, 128, 0, 128).premultiplied(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::opaque(9, 8, 7).premultiplied(), [9, 8, 7, 255]);
}
