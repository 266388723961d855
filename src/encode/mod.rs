pub mod ffmpeg;
pub(crate) mod pixels;
pub mod png;
pub mod sink;
