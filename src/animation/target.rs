use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::Vec2;

/// Mutable visual state an animation can read and write.
///
/// Animations only touch a target through these accessors and never own it. Setters are
/// called many times per second of playback, so they must be plain state writes: idempotent,
/// no I/O, no reaction to other properties.
///
/// Colours are exchanged as strings. `#RRGGBB` and `#RRGGBBAA` are interpolable; any other
/// value (a CSS name, an empty string) is carried verbatim and only ever snapped.
pub trait Animatable {
    /// Position in the parent's coordinate space.
    fn position(&self) -> Vec2;
    /// Set the position.
    fn set_position(&mut self, position: Vec2);

    /// Rotation in radians.
    fn rotation(&self) -> f64;
    /// Set the rotation in radians.
    fn set_rotation(&mut self, radians: f64);

    /// Non-uniform scale.
    fn scale(&self) -> Vec2;
    /// Set the non-uniform scale.
    fn set_scale(&mut self, scale: Vec2);

    /// Opacity in `[0, 1]`.
    fn opacity(&self) -> f64;
    /// Set the opacity.
    fn set_opacity(&mut self, opacity: f64);

    /// Fill colour, if any.
    fn fill_color(&self) -> Option<String>;
    /// Set or clear the fill colour.
    fn set_fill_color(&mut self, color: Option<String>);

    /// Stroke colour, if any.
    fn stroke_color(&self) -> Option<String>;
    /// Set or clear the stroke colour.
    fn set_stroke_color(&mut self, color: Option<String>);

    /// Stroke width.
    fn stroke_width(&self) -> f64;
    /// Set the stroke width. Negative widths are stored as given.
    fn set_stroke_width(&mut self, width: f64);
}

/// Shared, single-threaded handle to an animation target.
///
/// Scene nodes (`Rc<RefCell<Node>>`) coerce into this directly.
pub type Target = Rc<RefCell<dyn Animatable>>;
