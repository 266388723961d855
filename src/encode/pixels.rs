//! RGBA8 conversions shared by the file sinks.

use crate::foundation::color::Rgba8;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::FrameRGBA;

/// Premultiplied to straight alpha. Fully transparent and opaque pixels are left untouched.
pub(crate) fn unpremultiply(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Composite `frame` over an opaque `background` into `dst`, which is resized to fit.
///
/// The background alpha is ignored; every output pixel has alpha 255.
pub(crate) fn flatten_onto(
    background: Rgba8,
    frame: &FrameRGBA,
    dst: &mut Vec<u8>,
) -> KinemaResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(KinemaError::validation(format!(
            "frame holds {} bytes, {}x{} rgba8 needs {expected}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    dst.resize(expected, 0);

    let bg = [background.r, background.g, background.b];
    for (out, px) in dst.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let alpha = px[3];
        if alpha == 255 {
            out.copy_from_slice(px);
            continue;
        }
        let uncovered = 255 - alpha;
        for c in 0..3 {
            let fg = if frame.premultiplied {
                px[c]
            } else {
                scale255(px[c], alpha)
            };
            out[c] = fg.saturating_add(scale255(bg[c], uncovered));
        }
        out[3] = 255;
    }
    Ok(())
}

/// `round(x * y / 255)` without a division.
fn scale255(x: u8, y: u8) -> u8 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pixels.rs"]
mod tests;
