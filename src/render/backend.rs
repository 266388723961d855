use crate::foundation::error::KinemaResult;
use crate::scene::model::Scene;

/// A rendered frame as RGBA8 bytes, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// The four bytes of pixel `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Fallback options for a backend.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha clear colour used when the scene has no (paintable) background.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Rasterizes a whole scene into one frame.
pub trait RenderBackend {
    fn render_scene(&mut self, scene: &Scene) -> KinemaResult<FrameRGBA>;
}
