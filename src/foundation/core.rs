use crate::foundation::error::{KinemaError, KinemaResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Tolerance applied before rounding seconds up to whole frames, so that `0.1 s * 30 fps`
/// (which is `3.0000000000000004` in binary floating point) stays 3 frames.
const FRAME_ROUNDING_SLACK: f64 = 1e-9;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> KinemaResult<Self> {
        if den == 0 {
            return Err(KinemaError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(KinemaError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs`, rounded up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64() - FRAME_ROUNDING_SLACK).ceil().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> KinemaResult<Self> {
        if width == 0 || height == 0 {
            return Err(KinemaError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(KinemaError::validation(
                "canvas width/height must fit in 16 bits",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: Vec2,  // default (1,1)
    pub anchor: Vec2, // pivot in local space
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    pub fn to_affine(self) -> kurbo::Affine {
        let t_translate = kurbo::Affine::translate(self.translate);
        let t_anchor = kurbo::Affine::translate(self.anchor);
        let t_unanchor = kurbo::Affine::translate(-self.anchor);
        let t_rotate = kurbo::Affine::rotate(self.rotation_rad);
        let t_scale = kurbo::Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // Canonical order:
        // T(translate) * T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_translate * t_anchor * t_rotate * t_scale * t_unanchor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
