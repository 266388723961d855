use crate::animation::base::{Animation, Slot, floor_duration};
use crate::animation::ease::Ease;
use crate::foundation::error::{KinemaError, KinemaResult};

/// Children run concurrently from a common start.
///
/// Every child is set up, in declaration order, before any of them is ticked. A child shorter
/// than the group completes early, is cleaned up once, and then holds its final state.
///
/// Children that drive the same property of the same target are ticked in declaration order
/// within each frame, so the last declared one wins.
pub struct Parallel {
    slots: Vec<Slot>,
    total: f64,
    ease: Ease,
}

impl Parallel {
    /// Build a parallel group from at least one child.
    pub fn new(children: Vec<Box<dyn Animation>>) -> KinemaResult<Self> {
        if children.is_empty() {
            return Err(KinemaError::animation("parallel needs at least one child"));
        }
        let slots: Vec<Slot> = children.into_iter().map(Slot::new).collect();
        let total = longest(&slots);
        Ok(Self {
            slots,
            total,
            ease: Ease::Linear,
        })
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; construction rejects empty groups.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current duration of each child, in order.
    pub fn child_durations(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.anim.duration()).collect()
    }
}

fn longest(slots: &[Slot]) -> f64 {
    slots
        .iter()
        .map(|s| s.anim.duration())
        .fold(0.0, f64::max)
}

impl Animation for Parallel {
    fn duration(&self) -> f64 {
        self.total
    }

    fn set_duration(&mut self, secs: f64) {
        let requested = floor_duration(secs);
        let ratio = requested / longest(&self.slots);
        for slot in &mut self.slots {
            let d = slot.anim.duration();
            slot.anim.set_duration(d * ratio);
        }
        self.total = requested;
        tracing::debug!(
            total = self.total,
            children = self.slots.len(),
            "parallel rescaled"
        );
    }

    fn ease(&self) -> Ease {
        self.ease
    }

    fn set_ease(&mut self, ease: Ease) {
        self.ease = ease;
    }

    fn setup(&mut self) {
        for slot in &mut self.slots {
            slot.ensure_setup();
        }
    }

    fn tick(&mut self, t: f64) {
        let t = t.clamp(0.0, 1.0);
        let t_abs = self.ease.apply(t).clamp(0.0, 1.0) * self.total;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.finished {
                continue;
            }
            let local = if t >= 1.0 {
                1.0
            } else {
                (t_abs / slot.anim.duration()).min(1.0)
            };
            if local >= 1.0 {
                tracing::debug!(child = i, "parallel child completed");
                slot.finish();
            } else {
                slot.tick(local);
            }
        }
    }

    fn cleanup(&mut self) {
        for slot in &mut self.slots {
            slot.finish();
        }
    }

    fn label(&self) -> &'static str {
        "parallel"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/parallel.rs"]
mod tests;
