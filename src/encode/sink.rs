use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Consumer of rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values between
/// one `begin` and the matching `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> KinemaResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinemaResult<()>;
    fn end(&mut self) -> KinemaResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, cfg: SinkConfig) -> KinemaResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinemaResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> KinemaResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KinemaResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinemaResult<()> {
        check_order(self.frames.last().map(|(i, _)| *i), idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KinemaResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> KinemaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub(crate) fn check_order(last: Option<FrameIndex>, idx: FrameIndex) -> KinemaResult<()> {
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(KinemaError::encode(format!(
            "out-of-order frame index {} after {}",
            idx.0, last.0
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
