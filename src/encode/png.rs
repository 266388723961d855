use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::pixels::unpremultiply;
use crate::encode::sink::{FrameSink, SinkConfig, check_order};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::FrameRGBA;

/// Writes every frame as `dir/frame_NNNNNN.png` (straight alpha).
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_idx: None,
            written: Vec::new(),
        }
    }

    /// Paths written since the last `begin`, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(dir: &Path, idx: FrameIndex) -> PathBuf {
        dir.join(format!("frame_{:06}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> KinemaResult<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinemaResult<()> {
        if self.cfg.is_none() {
            return Err(KinemaError::encode("png sink not started"));
        }
        check_order(self.last_idx, idx)?;
        self.last_idx = Some(idx);

        let path = Self::frame_path(&self.dir, idx);
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> KinemaResult<()> {
        tracing::debug!(frames = self.written.len(), dir = %self.dir.display(), "png sequence written");
        self.cfg = None;
        Ok(())
    }
}

/// Save one frame as a PNG, converting premultiplied data to straight alpha.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> KinemaResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(KinemaError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    let straight;
    let data = if frame.premultiplied {
        straight = unpremultiply(&frame.data);
        straight.as_slice()
    } else {
        frame.data.as_slice()
    };
    image::save_buffer_with_format(
        path,
        data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
