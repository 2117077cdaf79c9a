use crate::{
    foundation::core::{Rgba8, Size},
    foundation::error::LiveResult,
    picture::action::{CircleStroke, Curve},
};

/// Drawing primitives a picture's action log is replayed onto.
///
/// Replay always starts with [`Rasterizer::begin`] on a blank canvas and ends with
/// [`Rasterizer::finish`]; primitives in between are applied in log order.
pub trait Rasterizer {
    type Raster;

    fn begin(&mut self, size: Size) -> LiveResult<()>;
    fn stroke_polyline(&mut self, curve: &Curve, color: Rgba8) -> LiveResult<()>;
    fn stroke_circle(&mut self, circle: &CircleStroke) -> LiveResult<()>;
    /// Clear everything under the stroke back to transparent.
    fn clear_polyline(&mut self, curve: &Curve) -> LiveResult<()>;
    fn finish(&mut self) -> LiveResult<Self::Raster>;
}

/// Premultiplied RGBA8 pixels of one materialized picture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite over an opaque straight-alpha background, yielding an opaque image.
    pub fn flatten_over(&self, bg_rgba: [u8; 4]) -> image::RgbaImage {
        let bg = Rgba8::new(bg_rgba[0], bg_rgba[1], bg_rgba[2], 255);
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(self.data.chunks_exact(4)) {
            let src = if self.premultiplied {
                [src[0], src[1], src[2], src[3]]
            } else {
                Rgba8::new(src[0], src[1], src[2], src[3]).to_premul()
            };
            let inv = 255 - u16::from(src[3]);
            let over = |s: u8, b: u8| -> u8 {
                (u16::from(s) + (u16::from(b) * inv + 127) / 255).min(255) as u8
            };
            dst.0 = [over(src[0], bg.r), over(src[1], bg.g), over(src[2], bg.b), 255];
        }
        out
    }
}

/// Settings shared by raster backends.
#[derive(Clone, Debug, Default)]
pub struct RasterSettings {
    /// Straight-alpha colour the canvas starts from; transparent when `None`.
    pub clear_rgba: Option<[u8; 4]>,
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
