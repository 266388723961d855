use crate::animation::base::Animation;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::RenderBackend;
use crate::scene::model::Scene;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Playback options.
pub struct PlayerOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Emit one more frame of the settled scene when the player finishes.
    pub final_frame: bool,
    /// Rasterize and push only this frame. Every other frame still advances the timeline.
    pub only_frame: Option<FrameIndex>,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            final_frame: true,
            only_frame: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated playback counters.
pub struct PlaybackStats {
    /// `play` and `wait` steps driven so far.
    pub steps: u64,
    /// Frames rendered and pushed to the sink. Frames skipped by
    /// [`PlayerOpts::only_frame`] are not counted.
    pub frames: u64,
}

/// Frame-quantized driver: maps frame indices to normalized animation time, rasterizes the
/// scene after every tick and hands frames to a sink.
///
/// Frame indices are continuous across `play` and `wait` steps. The sink is opened lazily on
/// the first frame and closed by [`Player::finish`].
pub struct Player<'a, B: RenderBackend, S: FrameSink> {
    scene: &'a Scene,
    backend: B,
    sink: S,
    opts: PlayerOpts,
    next_frame: u64,
    stats: PlaybackStats,
    started: bool,
    finished: bool,
}

impl<'a, B: RenderBackend, S: FrameSink> Player<'a, B, S> {
    pub fn new(scene: &'a Scene, backend: B, sink: S, opts: PlayerOpts) -> Self {
        Self {
            scene,
            backend,
            sink,
            opts,
            next_frame: 0,
            stats: PlaybackStats::default(),
            started: false,
            finished: false,
        }
    }

    pub fn opts(&self) -> PlayerOpts {
        self.opts
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    /// Index the next rendered frame will carry.
    pub fn next_frame(&self) -> FrameIndex {
        FrameIndex(self.next_frame)
    }

    /// Play `animations` concurrently.
    ///
    /// The step lasts as long as the longest animation. Every frame ticks each animation at its
    /// own normalized time, then renders. After the last frame each animation is ticked at 1 and
    /// cleaned up, so the scene is left at the exact terminal state.
    #[tracing::instrument(skip_all, fields(animations = animations.len()))]
    pub fn play(&mut self, animations: &mut [Box<dyn Animation>]) -> KinemaResult<()> {
        self.ensure_open()?;
        if animations.is_empty() {
            return Err(KinemaError::animation("play needs at least one animation"));
        }

        let duration = animations
            .iter()
            .map(|a| a.duration())
            .fold(0.0f64, f64::max);
        let fps = self.opts.fps;
        let frames = fps.secs_to_frames_ceil(duration);
        tracing::debug!(duration, frames, "play step");

        for anim in animations.iter_mut() {
            anim.setup();
        }
        for f in 0..frames {
            let elapsed = fps.frames_to_secs(f);
            for anim in animations.iter_mut() {
                anim.tick((elapsed / anim.duration()).clamp(0.0, 1.0));
            }
            self.emit()?;
        }
        for anim in animations.iter_mut() {
            anim.tick(1.0);
            anim.cleanup();
        }

        self.stats.steps += 1;
        Ok(())
    }

    /// Hold the current scene for `secs`.
    #[tracing::instrument(skip(self))]
    pub fn wait(&mut self, secs: f64) -> KinemaResult<()> {
        self.ensure_open()?;
        if !secs.is_finite() || secs < 0.0 {
            tracing::warn!(secs, "ignoring wait with invalid duration");
            return Ok(());
        }
        for _ in 0..self.opts.fps.secs_to_frames_ceil(secs) {
            self.emit()?;
        }
        self.stats.steps += 1;
        Ok(())
    }

    /// Emit the terminal frame (if enabled), close the sink and return the counters.
    ///
    /// Only the first call has any effect.
    pub fn finish(&mut self) -> KinemaResult<PlaybackStats> {
        if self.finished {
            return Ok(self.stats);
        }
        if self.opts.final_frame {
            self.emit()?;
        }
        if self.started {
            self.sink.end()?;
        }
        self.finished = true;
        tracing::debug!(
            steps = self.stats.steps,
            frames = self.stats.frames,
            "playback finished"
        );
        Ok(self.stats)
    }

    /// Finish and hand the backend and sink back.
    pub fn into_parts(mut self) -> KinemaResult<(B, S, PlaybackStats)> {
        let stats = self.finish()?;
        Ok((self.backend, self.sink, stats))
    }

    fn ensure_open(&self) -> KinemaResult<()> {
        if self.finished {
            return Err(KinemaError::animation("player already finished"));
        }
        Ok(())
    }

    fn emit(&mut self) -> KinemaResult<()> {
        if !self.started {
            self.sink.begin(SinkConfig {
                width: self.scene.canvas.width,
                height: self.scene.canvas.height,
                fps: self.opts.fps,
            })?;
            self.started = true;
        }
        let idx = FrameIndex(self.next_frame);
        self.next_frame += 1;
        if self.opts.only_frame.is_some_and(|only| only != idx) {
            return Ok(());
        }
        let frame = self.backend.render_scene(self.scene)?;
        self.sink.push_frame(idx, &frame)?;
        self.stats.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
