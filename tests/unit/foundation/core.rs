use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(30000, 1001).is_ok());
}

#[test]
fn secs_to_frames_rounds_up() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(0.1), 3);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
    assert_eq!(fps.secs_to_frames_ceil(-2.0), 0);
    assert_eq!(fps.secs_to_frames_ceil(f64::NAN), 0);
}

#[test]
fn float_noise_below_rounding_slack_adds_no_frame() {
    let fps = Fps::new(25, 1).unwrap();
    assert!(0.28 * 25.0 > 7.0);
    assert_eq!(fps.secs_to_frames_ceil(0.28), 7);
    assert_eq!(fps.secs_to_frames_ceil(1.12), 28);
    // just past the slack the partial frame counts again
    assert_eq!(fps.secs_to_frames_ceil(0.28 + 1e-6), 8);
    assert_eq!(fps.secs_to_frames_ceil(1e-12), 0);
}

#[test]
fn frames_to_secs_uses_rational_rate() {
    let fps = Fps::new(30000, 1001).unwrap();
    let secs = fps.frames_to_secs(30);
    assert!((secs - 1.001).abs() < 1e-12);
}

#[test]
fn canvas_bounds_are_validated() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(640, 360).unwrap();
    assert_eq!(c.center(), Vec2::new(320.0, 180.0));
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), kurbo::Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(
        t.to_affine(),
        kurbo::Affine::translate(Vec2::new(10.0, -2.5))
    );
}

#[test]
fn transform_rotates_about_anchor() {
    let t = Transform2D {
        rotation_rad: std::f64::consts::PI,
        anchor: Vec2::new(5.0, 0.0),
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(5.0, 0.0);
    assert!((p.x - 5.0).abs() < 1e-9);
    assert!(p.y.abs() < 1e-9);
}
