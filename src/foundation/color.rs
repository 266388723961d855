/// Straight-alpha RGBA8 colour parsed from the `#RRGGBB` / `#RRGGBBAA` exchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A hex colour together with whether its source string carried an alpha byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor {
    pub rgba: Rgba8,
    pub has_alpha: bool,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a paintable colour: hex first, then the small CSS palette.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(hex) = parse_hex(s) {
            return Some(hex.rgba);
        }
        named(s)
    }

    pub fn to_hex(self, with_alpha: bool) -> String {
        if with_alpha {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    /// Per-channel interpolation in `[0, 255]`, rounded to nearest and clamped.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }

    pub fn premultiplied(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive). Anything else is `None`.
pub fn parse_hex(s: &str) -> Option<HexColor> {
    let digits = s.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match digits.len() {
        6 => Some(HexColor {
            rgba: Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?),
            has_alpha: false,
        }),
        8 => Some(HexColor {
            rgba: Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            has_alpha: true,
        }),
        _ => None,
    }
}

fn named(s: &str) -> Option<Rgba8> {
    let c = match s.trim().to_ascii_lowercase().as_str() {
        "black" => Rgba8::opaque(0, 0, 0),
        "white" => Rgba8::opaque(255, 255, 255),
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "lime" => Rgba8::opaque(0, 255, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "cyan" | "aqua" => Rgba8::opaque(0, 255, 255),
        "magenta" | "fuchsia" => Rgba8::opaque(255, 0, 255),
        "orange" => Rgba8::opaque(255, 165, 0),
        "purple" => Rgba8::opaque(128, 0, 128),
        "pink" => Rgba8::opaque(255, 192, 203),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "transparent" => Rgba8::new(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
