use crate::foundation::error::{LiveError, LiveResult};

pub use kurbo::{BezPath, Point, Size, Vec2};

/// Straight-alpha RGBA8 colour used by draw actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> LiveResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(LiveError::validation(format!(
                "colour '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| -> LiveResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| LiveError::validation(format!("colour '{s}' is not valid hex")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Whole-pixel dimensions for a logical picture size, rounded up.
pub fn pixel_size(size: Size) -> LiveResult<(u16, u16)> {
    fn dim(v: f64, what: &str) -> LiveResult<u16> {
        if !v.is_finite() || v <= 0.0 {
            return Err(LiveError::validation(format!(
                "picture {what} must be a positive finite number, got {v}"
            )));
        }
        let px = v.ceil();
        if px > f64::from(u16::MAX) {
            return Err(LiveError::validation(format!(
                "picture {what} {v} exceeds {}",
                u16::MAX
            )));
        }
        Ok(px as u16)
    }
    Ok((dim(size.width, "width")?, dim(size.height, "height")?))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
