use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::pixels::flatten_onto;
use crate::encode::sink::{FrameSink, SinkConfig, check_order, ensure_parent_dir};
use crate::foundation::color::Rgba8;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::FrameRGBA;

/// Where and how [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Colour under transparent pixels; H.264 has no alpha.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Overwriting, black background.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::opaque(0, 0, 0),
        }
    }
}

/// MP4 sink backed by a system `ffmpeg` reading raw RGBA frames on stdin.
///
/// Size and frame rate come from the [`SinkConfig`] handed to `begin`, like every other sink.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            opaque: Vec::new(),
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(skip(self), fields(out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> KinemaResult<()> {
        check_yuv420_size(cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(KinemaError::validation(format!(
                "'{}' exists and overwrite is off",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(KinemaError::encode("mp4 output needs `ffmpeg` on PATH"));
        }

        self.encoder = Some(Encoder::spawn(encoder_args(&self.opts, cfg))?);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinemaResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(KinemaError::encode("mp4 sink not started"));
        };
        check_order(self.last_idx, idx)?;
        self.last_idx = Some(idx);

        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(KinemaError::validation(format!(
                "frame is {}x{} but the mp4 stream is {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        flatten_onto(self.opts.background, frame, &mut self.opaque)?;
        encoder.write(&self.opaque)
    }

    fn end(&mut self) -> KinemaResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| KinemaError::encode("mp4 sink not started"))?;
        self.cfg = None;
        let frames = self.last_idx.map_or(0, |i| i.0 + 1);
        encoder.finish()?;
        tracing::debug!(frames, out = %self.opts.out_path.display(), "mp4 written");
        Ok(())
    }
}

/// `yuv420p` subsamples chroma 2x2, so both sides must be even.
fn check_yuv420_size(cfg: SinkConfig) -> KinemaResult<()> {
    if cfg.width == 0 || cfg.height == 0 {
        return Err(KinemaError::validation("mp4 frame size must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(KinemaError::validation(format!(
            "mp4 frame size must be even, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for a raw RGBA stdin stream encoded to H.264 `yuv420p`.
pub(crate) fn encoder_args(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> Vec<OsString> {
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    let mut args: Vec<OsString> = [
        overwrite,
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    // input options must precede `-i`
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(OsString::from),
    );
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// A running `ffmpeg` process. Stderr is drained on a thread so a chatty encoder cannot block.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> KinemaResult<Self> {
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KinemaError::encode(format!("spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(KinemaError::encode("ffmpeg pipes were not opened"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, rgba: &[u8]) -> KinemaResult<()> {
        self.stdin
            .write_all(rgba)
            .map_err(|e| KinemaError::encode(format!("write frame to ffmpeg: {e}")))
    }

    /// Close stdin, wait for exit and surface stderr on failure.
    fn finish(self) -> KinemaResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| KinemaError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| KinemaError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| KinemaError::encode(format!("read ffmpeg stderr: {e}")))?;

        if status.success() {
            return Ok(());
        }
        Err(KinemaError::encode(format!(
            "ffmpeg failed ({status}): {}",
            String::from_utf8_lossy(&log).trim()
        )))
    }
}

/// Whether `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
