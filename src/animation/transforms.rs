use std::fmt;
use std::marker::PhantomData;

use crate::animation::base::{Animation, Lerp, Timing, interpolate};
use crate::animation::ease::Ease;
use crate::animation::target::{Animatable, Target};
use crate::foundation::color::{HexColor, Rgba8, parse_hex};
use crate::foundation::core::Vec2;

/// A scalar or vector property of an [`Animatable`] that a [`Tween`] can drive.
pub trait Property {
    /// Interpolated value type.
    type Value: Lerp + Clone + fmt::Debug;

    /// Property name used in logs.
    const NAME: &'static str;

    /// Whether `cleanup` writes the goal again.
    const FINAL_WRITE: bool = false;

    /// Read the current value.
    fn read(target: &dyn Animatable) -> Self::Value;

    /// Write a value.
    fn write(target: &mut dyn Animatable, value: Self::Value);

    /// Bring a goal into the property's legal range.
    fn normalize(value: Self::Value) -> Self::Value {
        value
    }
}

/// A [`Property`] that also accepts goals relative to its setup-time value.
pub trait Relative: Property {
    /// Combine the captured value with a relative goal.
    fn offset(from: &Self::Value, by: &Self::Value) -> Self::Value;
}

/// Property selectors for [`Tween`].
pub mod prop {
    use super::*;

    /// Position; relative goals add.
    #[derive(Debug)]
    pub struct Position;

    /// Rotation in radians; relative goals add. No angle wrapping.
    #[derive(Debug)]
    pub struct Rotation;

    /// Non-uniform scale; relative goals multiply per axis.
    #[derive(Debug)]
    pub struct Scale;

    /// Opacity; goals are clamped to `[0, 1]` and written again on cleanup.
    #[derive(Debug)]
    pub struct Opacity;

    /// Stroke width; unclamped.
    #[derive(Debug)]
    pub struct StrokeWidth;

    impl Property for Position {
        type Value = Vec2;
        const NAME: &'static str = "position";

        fn read(target: &dyn Animatable) -> Vec2 {
            target.position()
        }

        fn write(target: &mut dyn Animatable, value: Vec2) {
            target.set_position(value);
        }
    }

    impl Relative for Position {
        fn offset(from: &Vec2, by: &Vec2) -> Vec2 {
            *from + *by
        }
    }

    impl Property for Rotation {
        type Value = f64;
        const NAME: &'static str = "rotation";

        fn read(target: &dyn Animatable) -> f64 {
            target.rotation()
        }

        fn write(target: &mut dyn Animatable, value: f64) {
            target.set_rotation(value);
        }
    }

    impl Relative for Rotation {
        fn offset(from: &f64, by: &f64) -> f64 {
            from + by
        }
    }

    impl Property for Scale {
        type Value = Vec2;
        const NAME: &'static str = "scale";

        fn read(target: &dyn Animatable) -> Vec2 {
            target.scale()
        }

        fn write(target: &mut dyn Animatable, value: Vec2) {
            target.set_scale(value);
        }
    }

    impl Relative for Scale {
        fn offset(from: &Vec2, by: &Vec2) -> Vec2 {
            Vec2::new(from.x * by.x, from.y * by.y)
        }
    }

    impl Property for Opacity {
        type Value = f64;
        const NAME: &'static str = "opacity";
        const FINAL_WRITE: bool = true;

        fn read(target: &dyn Animatable) -> f64 {
            target.opacity()
        }

        fn write(target: &mut dyn Animatable, value: f64) {
            target.set_opacity(value);
        }

        fn normalize(value: f64) -> f64 {
            value.clamp(0.0, 1.0)
        }
    }

    impl Property for StrokeWidth {
        type Value = f64;
        const NAME: &'static str = "stroke_width";

        fn read(target: &dyn Animatable) -> f64 {
            target.stroke_width()
        }

        fn write(target: &mut dyn Animatable, value: f64) {
            target.set_stroke_width(value);
        }
    }
}

enum Goal<V> {
    To(V),
    By { delta: V, apply: fn(&V, &V) -> V },
}

/// Leaf animation interpolating one [`Property`] of one target.
///
/// The "from" value is captured in [`Animation::setup`]; relative goals are resolved against it
/// at the same moment, so later writes by other animations do not move the goal.
pub struct Tween<P: Property> {
    target: Target,
    goal: Goal<P::Value>,
    timing: Timing,
    span: Option<(P::Value, P::Value)>,
    _prop: PhantomData<P>,
}

/// Absolute or relative position tween.
pub type Move = Tween<prop::Position>;
/// Absolute or relative rotation tween.
pub type Rotate = Tween<prop::Rotation>;
/// Absolute or relative scale tween.
pub type Scale = Tween<prop::Scale>;
/// Opacity tween.
pub type Opacity = Tween<prop::Opacity>;
/// Stroke width tween.
pub type StrokeWidth = Tween<prop::StrokeWidth>;

impl<P: Property> Tween<P> {
    /// Tween towards an absolute goal.
    pub fn to(target: Target, value: P::Value) -> Self {
        Self::with_goal(target, Goal::To(P::normalize(value)))
    }

    fn with_goal(target: Target, goal: Goal<P::Value>) -> Self {
        Self {
            target,
            goal,
            timing: Timing::default(),
            span: None,
            _prop: PhantomData,
        }
    }

    /// `(from, to)` once set up.
    pub fn span(&self) -> Option<&(P::Value, P::Value)> {
        self.span.as_ref()
    }
}

impl<P: Relative> Tween<P> {
    /// Tween by a goal relative to the value captured at setup.
    pub fn by(target: Target, delta: P::Value) -> Self {
        Self::with_goal(
            target,
            Goal::By {
                delta,
                apply: P::offset,
            },
        )
    }
}

impl<P: Property> fmt::Debug for Tween<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("property", &P::NAME)
            .field("timing", &self.timing)
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

impl<P: Property> Animation for Tween<P> {
    fn duration(&self) -> f64 {
        self.timing.duration()
    }

    fn set_duration(&mut self, secs: f64) {
        self.timing.set_duration(secs);
    }

    fn ease(&self) -> Ease {
        self.timing.ease()
    }

    fn set_ease(&mut self, ease: Ease) {
        self.timing.set_ease(ease);
    }

    fn setup(&mut self) {
        if self.span.is_some() {
            tracing::debug!(property = P::NAME, "tween already set up");
            return;
        }
        let from = P::read(&*self.target.borrow());
        let to = match &self.goal {
            Goal::To(v) => v.clone(),
            Goal::By { delta, apply } => P::normalize(apply(&from, delta)),
        };
        self.span = Some((from, to));
    }

    fn tick(&mut self, t: f64) {
        if self.span.is_none() {
            tracing::warn!(property = P::NAME, "tween ticked before setup");
            self.setup();
        }
        let Some((from, to)) = &self.span else {
            return;
        };
        let t = t.clamp(0.0, 1.0);
        let value = interpolate(from, to, t, self.timing.ease().apply(t));
        P::write(&mut *self.target.borrow_mut(), value);
    }

    fn cleanup(&mut self) {
        if !P::FINAL_WRITE {
            return;
        }
        if let Some((_, to)) = &self.span {
            P::write(&mut *self.target.borrow_mut(), to.clone());
        }
    }

    fn label(&self) -> &'static str {
        P::NAME
    }
}

/// A colour slot of an [`Animatable`].
pub trait ColorChannel {
    /// Channel name used in logs.
    const NAME: &'static str;

    /// Read the current colour.
    fn read(target: &dyn Animatable) -> Option<String>;

    /// Write a colour.
    fn write(target: &mut dyn Animatable, value: Option<String>);
}

/// Fill colour channel.
#[derive(Debug)]
pub struct FillColor;

/// Stroke colour channel.
#[derive(Debug)]
pub struct StrokeColor;

impl ColorChannel for FillColor {
    const NAME: &'static str = "fill_color";

    fn read(target: &dyn Animatable) -> Option<String> {
        target.fill_color()
    }

    fn write(target: &mut dyn Animatable, value: Option<String>) {
        target.set_fill_color(value);
    }
}

impl ColorChannel for StrokeColor {
    const NAME: &'static str = "stroke_color";

    fn read(target: &dyn Animatable) -> Option<String> {
        target.stroke_color()
    }

    fn write(target: &mut dyn Animatable, value: Option<String>) {
        target.set_stroke_color(value);
    }
}

#[derive(Debug)]
enum ColorPath {
    Lerp {
        from: Rgba8,
        to: Rgba8,
        with_alpha: bool,
    },
    // At least one endpoint is not hex: hold until completion, then write the goal.
    Snap,
}

#[derive(Debug)]
struct ColorSpan {
    original: Option<String>,
    path: ColorPath,
}

/// Leaf animation moving a colour channel towards a goal string.
///
/// Hex endpoints (`#RRGGBB`, `#RRGGBBAA`) interpolate per RGBA channel. Anything else snaps to
/// the goal at `t = 1`. At `t = 0` the captured string is written back verbatim and at `t = 1`
/// the goal string is written verbatim.
pub struct ColorTween<C: ColorChannel> {
    target: Target,
    to: String,
    timing: Timing,
    span: Option<ColorSpan>,
    _channel: PhantomData<C>,
}

/// Fill colour tween.
pub type FillColorTo = ColorTween<FillColor>;
/// Stroke colour tween.
pub type StrokeColorTo = ColorTween<StrokeColor>;

impl<C: ColorChannel> ColorTween<C> {
    /// Tween the channel towards `to`.
    pub fn new(target: Target, to: impl Into<String>) -> Self {
        Self {
            target,
            to: to.into(),
            timing: Timing::default(),
            span: None,
            _channel: PhantomData,
        }
    }

    /// Whether the endpoints captured at setup interpolate (`false` before setup).
    pub fn interpolates(&self) -> bool {
        matches!(
            self.span,
            Some(ColorSpan {
                path: ColorPath::Lerp { .. },
                ..
            })
        )
    }
}

impl<C: ColorChannel> fmt::Debug for ColorTween<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorTween")
            .field("channel", &C::NAME)
            .field("to", &self.to)
            .field("timing", &self.timing)
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

impl<C: ColorChannel> Animation for ColorTween<C> {
    fn duration(&self) -> f64 {
        self.timing.duration()
    }

    fn set_duration(&mut self, secs: f64) {
        self.timing.set_duration(secs);
    }

    fn ease(&self) -> Ease {
        self.timing.ease()
    }

    fn set_ease(&mut self, ease: Ease) {
        self.timing.set_ease(ease);
    }

    fn setup(&mut self) {
        if self.span.is_some() {
            tracing::debug!(channel = C::NAME, "colour tween already set up");
            return;
        }
        let original = C::read(&*self.target.borrow());
        let from = original.as_deref().and_then(parse_hex);
        let path = match (from, parse_hex(&self.to)) {
            (Some(HexColor { rgba: a, has_alpha: fa }), Some(HexColor { rgba: b, has_alpha: fb })) => {
                ColorPath::Lerp {
                    from: a,
                    to: b,
                    with_alpha: fa || fb,
                }
            }
            _ => {
                tracing::debug!(
                    channel = C::NAME,
                    from = ?original,
                    to = %self.to,
                    "colour endpoints not interpolable, snapping at completion"
                );
                ColorPath::Snap
            }
        };
        self.span = Some(ColorSpan { original, path });
    }

    fn tick(&mut self, t: f64) {
        if self.span.is_none() {
            tracing::warn!(channel = C::NAME, "colour tween ticked before setup");
            self.setup();
        }
        let Some(span) = &self.span else {
            return;
        };
        let t = t.clamp(0.0, 1.0);
        let value = if t <= 0.0 {
            span.original.clone()
        } else if t >= 1.0 {
            Some(self.to.clone())
        } else {
            match span.path {
                ColorPath::Lerp {
                    from,
                    to,
                    with_alpha,
                } => {
                    let eased = self.timing.ease().apply(t);
                    Some(Rgba8::lerp(from, to, eased).to_hex(with_alpha))
                }
                ColorPath::Snap => return,
            }
        };
        C::write(&mut *self.target.borrow_mut(), value);
    }

    fn label(&self) -> &'static str {
        C::NAME
    }
}

/// Move to an absolute position.
pub fn move_to(target: Target, to: Vec2) -> Move {
    Move::to(target, to)
}

/// Move by an offset from the position at setup.
pub fn move_by(target: Target, by: Vec2) -> Move {
    Move::by(target, by)
}

/// Rotate to an absolute angle in radians.
pub fn rotate_to(target: Target, radians: f64) -> Rotate {
    Rotate::to(target, radians)
}

/// Rotate by an angle in radians from the rotation at setup.
pub fn rotate_by(target: Target, radians: f64) -> Rotate {
    Rotate::by(target, radians)
}

/// Scale to an absolute per-axis factor.
pub fn scale_to(target: Target, to: Vec2) -> Scale {
    Scale::to(target, to)
}

/// Multiply the scale at setup by a per-axis factor.
pub fn scale_by(target: Target, factor: Vec2) -> Scale {
    Scale::by(target, factor)
}

/// Fade to an opacity, clamped to `[0, 1]`.
pub fn opacity_to(target: Target, opacity: f64) -> Opacity {
    Opacity::to(target, opacity)
}

/// Fade to fully opaque.
pub fn fade_in(target: Target) -> Opacity {
    Opacity::to(target, 1.0)
}

/// Fade to fully transparent.
pub fn fade_out(target: Target) -> Opacity {
    Opacity::to(target, 0.0)
}

/// Change the fill colour.
pub fn fill_color_to(target: Target, color: impl Into<String>) -> FillColorTo {
    FillColorTo::new(target, color)
}

/// Change the stroke colour.
pub fn stroke_color_to(target: Target, color: impl Into<String>) -> StrokeColorTo {
    StrokeColorTo::new(target, color)
}

/// Change the stroke width.
pub fn stroke_width_to(target: Target, width: f64) -> StrokeWidth {
    StrokeWidth::to(target, width)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transforms.rs"]
mod tests;
