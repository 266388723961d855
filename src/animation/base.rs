use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;

/// Smallest duration an animation will hold; non-positive requests are floored to this.
pub const MIN_DURATION_SECS: f64 = 1e-6;

/// Duration of a freshly constructed animation.
pub const DEFAULT_DURATION_SECS: f64 = 1.0;

/// A time-bounded change driven through the `setup` / `tick` / `cleanup` lifecycle.
///
/// Leaves (tweens) mutate one [`crate::Animatable`]; composites ([`crate::Sequence`],
/// [`crate::Parallel`]) schedule child animations and have no target of their own. Both honour
/// the same contract, so trees nest to any depth:
///
/// 1. `setup()` once, before the first tick. Leaves capture their "from" state here.
/// 2. `tick(t)` one or more times with non-decreasing `t`. Values outside `[0, 1]` are clamped.
/// 3. `cleanup()` once after the last tick, for exact terminal writes.
///
/// An animation is single-use: its captured state belongs to one playback.
pub trait Animation {
    /// Duration in seconds, always `> 0` for finite inputs.
    fn duration(&self) -> f64;

    /// Set the duration in seconds. Values `<= 0` are floored to [`MIN_DURATION_SECS`].
    fn set_duration(&mut self, secs: f64);

    /// Easing applied to normalized time.
    fn ease(&self) -> Ease;

    /// Select the easing applied to normalized time.
    fn set_ease(&mut self, ease: Ease);

    /// Select the easing by name; unknown names select [`Ease::Linear`].
    fn set_easing(&mut self, name: &str) {
        self.set_ease(Ease::from_name(name));
    }

    /// Capture starting state. Never mutates a target; repeated calls are ignored.
    fn setup(&mut self);

    /// Apply progress `t` (normalized to this animation's own duration).
    fn tick(&mut self, t: f64);

    /// Finalize after the last tick.
    fn cleanup(&mut self) {}

    /// Short name used in logs.
    fn label(&self) -> &'static str;
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn set_duration(&mut self, secs: f64) {
        (**self).set_duration(secs);
    }

    fn ease(&self) -> Ease {
        (**self).ease()
    }

    fn set_ease(&mut self, ease: Ease) {
        (**self).set_ease(ease);
    }

    fn setup(&mut self) {
        (**self).setup();
    }

    fn tick(&mut self, t: f64) {
        (**self).tick(t);
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}

/// Fluent configuration for any [`Animation`].
pub trait AnimationExt: Animation + Sized {
    /// Return `self` with its duration set (see [`Animation::set_duration`]).
    fn with_duration(mut self, secs: f64) -> Self {
        self.set_duration(secs);
        self
    }

    /// Return `self` with its easing set.
    fn with_ease(mut self, ease: Ease) -> Self {
        self.set_ease(ease);
        self
    }

    /// Return `self` with its easing selected by name.
    fn with_easing(mut self, name: &str) -> Self {
        self.set_easing(name);
        self
    }

    /// Erase the concrete type for use as a composite child.
    fn boxed(self) -> Box<dyn Animation>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<A: Animation> AnimationExt for A {}

/// Duration and easing shared by every animation kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    duration: f64,
    ease: Ease,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_SECS,
            ease: Ease::Linear,
        }
    }
}

impl Timing {
    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Set the duration, flooring non-positive values.
    pub fn set_duration(&mut self, secs: f64) {
        self.duration = floor_duration(secs);
    }

    /// Selected easing.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Select the easing.
    pub fn set_ease(&mut self, ease: Ease) {
        self.ease = ease;
    }
}

/// Floor non-positive durations; flag (but keep) NaN and infinities.
pub(crate) fn floor_duration(secs: f64) -> f64 {
    if secs <= 0.0 {
        return MIN_DURATION_SECS;
    }
    if !secs.is_finite() {
        tracing::warn!(secs, "non-finite animation duration is not validated");
    }
    secs
}

/// Interpolation contract for animated values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with factor `t` (may leave `[0, 1]` for overshooting easings).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Interpolate with exact endpoints: `t <= 0` yields `from`, `t >= 1` yields `to` bit-for-bit.
///
/// `t` is the raw normalized time; `eased` is what the easing made of it.
pub(crate) fn interpolate<T: Lerp + Clone>(from: &T, to: &T, t: f64, eased: f64) -> T {
    if t <= 0.0 {
        from.clone()
    } else if t >= 1.0 {
        to.clone()
    } else {
        T::lerp(from, to, eased)
    }
}

/// A composite's bookkeeping for one child.
pub(crate) struct Slot {
    pub(crate) anim: Box<dyn Animation>,
    pub(crate) set_up: bool,
    pub(crate) finished: bool,
}

impl Slot {
    pub(crate) fn new(anim: Box<dyn Animation>) -> Self {
        Self {
            anim,
            set_up: false,
            finished: false,
        }
    }

    pub(crate) fn ensure_setup(&mut self) {
        if !self.set_up {
            self.anim.setup();
            self.set_up = true;
        }
    }

    pub(crate) fn tick(&mut self, t: f64) {
        self.ensure_setup();
        self.anim.tick(t);
    }

    /// Drive the child to its terminal state and clean it up, at most once.
    pub(crate) fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.ensure_setup();
        self.anim.tick(1.0);
        self.anim.cleanup();
        self.finished = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/base.rs"]
mod tests;
