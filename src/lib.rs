//! Kinema is a timeline-based 2D scene animation engine.
//!
//! Scenes are trees of vector shapes, groups and per-character text. Motion is described by
//! [`Animation`] trees: primitive tweens bound to one node, composed with [`Sequence`] and
//! [`Parallel`]. A [`Player`] drives those trees frame by frame, rasterizes the scene with
//! [`CpuBackend`] and hands the frames to a [`FrameSink`] (in memory, PNG sequence or MP4 via
//! `ffmpeg`).
//!
//! - Build a [`Scene`] in code, or load a JSON [`Script`]
//! - Play animations with a [`Player`]
//! - Collect frames through a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Animation contract, easing, primitive tweens and composites.
pub mod animation;
/// Frame sinks.
pub mod encode;
/// Frame-quantized playback driver.
pub mod playback;
/// Rendering backends.
pub mod render;
/// Scene graph and shape constructors.
pub mod scene;
/// JSON scene scripts.
pub mod script;
/// Font loading and per-character text layout.
pub mod text;

pub use crate::foundation::color::{HexColor, Rgba8, parse_hex};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Transform2D, Vec2,
};
pub use crate::foundation::error::{KinemaError, KinemaResult};

pub use crate::animation::base::{Animation, AnimationExt, Lerp, Timing};
pub use crate::animation::ease::Ease;
pub use crate::animation::parallel::Parallel;
pub use crate::animation::sequence::Sequence;
pub use crate::animation::target::{Animatable, Target};
pub use crate::animation::transforms::{
    FillColorTo, Move, Opacity, Rotate, Scale, StrokeColorTo, StrokeWidth, Tween, fade_in,
    fade_out, fill_color_to, move_by, move_to, opacity_to, rotate_by, rotate_to, scale_by,
    scale_to, stroke_color_to, stroke_width_to,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, ensure_parent_dir};
pub use crate::playback::player::{PlaybackStats, Player, PlayerOpts};
pub use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
pub use crate::render::cpu::CpuBackend;
pub use crate::scene::model::Scene;
pub use crate::scene::node::{Node, NodeKind, NodeRef, Style};
pub use crate::scene::shapes;
pub use crate::script::build::{Script, Step};
pub use crate::script::model::SceneDef;
pub use crate::script::validate::{ScriptError, ScriptErrors};
pub use crate::text::cache::{FONT_CACHE_CAPACITY_ENV, FontCache, FontEntry};
pub use crate::text::layout::{Text, TextLayoutEngine};
