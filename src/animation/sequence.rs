use crate::animation::base::{Animation, Slot, floor_duration};
use crate::animation::ease::Ease;
use crate::foundation::error::{KinemaError, KinemaResult};

/// Children played back-to-back.
///
/// The sequence's own easing warps its whole timeline; each child additionally applies its own
/// easing to its local progress. A child is set up lazily when the timeline first reaches it, so
/// it captures whatever its predecessors left behind.
pub struct Sequence {
    slots: Vec<Slot>,
    // Absolute end time of each child, in seconds.
    ends: Vec<f64>,
    total: f64,
    cursor: usize,
    ease: Ease,
}

impl Sequence {
    /// Build a sequence from at least one child.
    pub fn new(children: Vec<Box<dyn Animation>>) -> KinemaResult<Self> {
        if children.is_empty() {
            return Err(KinemaError::animation("sequence needs at least one child"));
        }
        let mut out = Self {
            slots: children.into_iter().map(Slot::new).collect(),
            ends: Vec::new(),
            total: 0.0,
            cursor: 0,
            ease: Ease::Linear,
        };
        out.recompute_ends();
        Ok(out)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current duration of each child, in order.
    pub fn child_durations(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.anim.duration()).collect()
    }

    fn recompute_ends(&mut self) {
        let mut acc = 0.0;
        self.ends = self
            .slots
            .iter()
            .map(|s| {
                acc += s.anim.duration();
                acc
            })
            .collect();
        self.total = acc;
    }

    fn start_of(&self, i: usize) -> f64 {
        if i == 0 { 0.0 } else { self.ends[i - 1] }
    }
}

impl Animation for Sequence {
    fn duration(&self) -> f64 {
        self.total
    }

    fn set_duration(&mut self, secs: f64) {
        let requested = floor_duration(secs);
        let ratio = requested / self.total;
        for slot in &mut self.slots {
            let d = slot.anim.duration();
            slot.anim.set_duration(d * ratio);
        }
        self.recompute_ends();
        tracing::debug!(
            total = self.total,
            children = self.slots.len(),
            "sequence rescaled"
        );
    }

    fn ease(&self) -> Ease {
        self.ease
    }

    fn set_ease(&mut self, ease: Ease) {
        self.ease = ease;
    }

    fn setup(&mut self) {
        // Children capture their start state only when the timeline reaches them.
    }

    fn tick(&mut self, t: f64) {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            for slot in &mut self.slots {
                slot.finish();
            }
            self.cursor = self.slots.len();
            return;
        }

        let t_abs = self.ease.apply(t).clamp(0.0, 1.0) * self.total;
        while self.cursor < self.slots.len() && self.ends[self.cursor] <= t_abs {
            tracing::debug!(child = self.cursor, "sequence child completed");
            self.slots[self.cursor].finish();
            self.cursor += 1;
        }

        let i = self.cursor;
        if i >= self.slots.len() {
            return;
        }
        let start = self.start_of(i);
        let slot = &mut self.slots[i];
        let local = ((t_abs - start) / slot.anim.duration()).clamp(0.0, 1.0);
        slot.tick(local);
    }

    fn cleanup(&mut self) {
        for slot in &mut self.slots {
            slot.finish();
        }
        self.cursor = self.slots.len();
    }

    fn label(&self) -> &'static str {
        "sequence"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequence.rs"]
mod tests;
