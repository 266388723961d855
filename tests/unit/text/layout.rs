use std::path::PathBuf;

use super::*;
use crate::animation::base::Animation;
use crate::animation::transforms::rotate_by;

/// A TrueType font from `KINEMA_TEST_FONT` or a common system location.
fn test_font() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("KINEMA_TEST_FONT") {
        return Some(PathBuf::from(p));
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn missing_font_file_is_a_validation_error() {
    let mut engine = TextLayoutEngine::new();
    let err = Text::build(&mut engine, "hi", Path::new("no/such/font.ttf"), 16.0).unwrap_err();
    assert!(matches!(err, KinemaError::Validation(_)));
}

#[test]
fn garbage_bytes_do_not_register() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register(b"not a font".to_vec()).is_err());
}

#[test]
fn text_is_one_node_per_character() {
    let Some(font) = test_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let text = Text::build(&mut engine, "Hi a", &font, 32.0).unwrap();
    assert_eq!(text.len(), 4);
    assert_eq!(engine.font_cache().len(), 1);

    let xs: Vec<f64> = (0..4)
        .map(|i| text.char_at(i).unwrap().borrow().transform.translate.x)
        .collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "advances must be positive: {xs:?}");
    // Centred on the group origin.
    assert!(xs[0] < 0.0);

    let h = text.char_at(0).unwrap();
    match &h.borrow().kind {
        NodeKind::Glyph(g) => {
            assert_eq!(g.ch, 'H');
            assert!(!g.glyphs.is_empty());
            assert!(g.advance > 0.0);
        }
        other => panic!("expected glyph, got {other:?}"),
    }
}

#[test]
fn characters_animate_independently() {
    let Some(font) = test_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let text = Text::build(&mut engine, "ab", &font, 24.0).unwrap();
    let b = text.char_at(1).unwrap();
    let mut spin = rotate_by(b.clone(), 1.0);
    spin.setup();
    spin.tick(1.0);
    assert_eq!(b.borrow().transform.rotation_rad, 1.0);
    assert_eq!(text.char_at(0).unwrap().borrow().transform.rotation_rad, 0.0);
}

#[test]
fn repeated_layout_hits_the_memo() {
    let Some(font) = test_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let entry = engine.load_font(&font).unwrap();
    let a = engine.layout_char(&entry, 'x', 20.0).unwrap();
    let b = engine.layout_char(&entry, 'x', 20.0).unwrap();
    assert_eq!(a, b);
    assert!(engine.layout_char(&entry, 'x', 0.0).is_err());
}

#[test]
fn evicted_font_is_restored_without_registering_again() {
    let Some(font) = test_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let dir = PathBuf::from("target/kinema_tests/font_reload");
    std::fs::create_dir_all(&dir).unwrap();
    let copy = dir.join("copy.ttf");
    std::fs::copy(&font, &copy).unwrap();

    let mut engine = TextLayoutEngine::with_font_cache(FontCache::with_capacity(1));
    let first = engine.load_font(&font).unwrap();
    engine.load_font(&copy).unwrap();
    assert!(!engine.font_cache().contains(&font));

    let again = engine.load_font(&font).unwrap();
    assert_eq!(engine.registered_fonts(), 2);
    assert!(Arc::ptr_eq(&first.bytes, &again.bytes));
    assert_eq!(first.family, again.family);
}

#[test]
fn layout_memo_is_bounded() {
    let Some(font) = test_font() else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new().with_layout_capacity(2);
    let entry = engine.load_font(&font).unwrap();
    for ch in "abcde".chars() {
        engine.layout_char(&entry, ch, 18.0).unwrap();
        assert!(engine.memoized_layouts() <= 2);
    }
    assert!(engine.memoized_layouts() >= 1);
}
