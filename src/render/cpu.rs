use crate::{
    foundation::core::{BezPath, Rgba8, Size, pixel_size},
    foundation::error::{LiveError, LiveResult},
    picture::action::{CircleStroke, Curve},
    render::raster::{FrameRGBA, RasterSettings, Rasterizer},
};

/// `vello_cpu` rasterizer.
///
/// Every stroke is rendered onto its own transparent scratch pixmap and then
/// composited onto the canvas: source-over for pencil and circle strokes,
/// destination-out for erase strokes.
pub struct CpuRasterizer {
    settings: RasterSettings,
    canvas: Option<CpuCanvas>,
}

struct CpuCanvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

#[derive(Clone, Copy)]
enum Composite {
    SourceOver,
    DestinationOut,
}

impl CpuRasterizer {
    pub fn new(settings: RasterSettings) -> Self {
        Self {
            settings,
            canvas: None,
        }
    }

    fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba8, op: Composite) -> LiveResult<()> {
        let canvas = self
            .canvas
            .as_mut()
            .ok_or_else(|| LiveError::render("stroke issued before begin"))?;
        if !(width.is_finite() && width > 0.0) {
            return Ok(());
        }

        let mut ctx = vello_cpu::RenderContext::new(canvas.width, canvas.height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        ctx.stroke_path(&bezpath_to_cpu(path));
        ctx.flush();

        let mut scratch = vello_cpu::Pixmap::new(canvas.width, canvas.height);
        ctx.render_to_pixmap(&mut scratch);
        composite(
            canvas.pixmap.data_as_u8_slice_mut(),
            scratch.data_as_u8_slice(),
            op,
        );
        Ok(())
    }
}

impl Default for CpuRasterizer {
    fn default() -> Self {
        Self::new(RasterSettings::default())
    }
}

impl Rasterizer for CpuRasterizer {
    type Raster = FrameRGBA;

    fn begin(&mut self, size: Size) -> LiveResult<()> {
        let (width, height) = pixel_size(size)?;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let clear = self
            .settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8::new(r, g, b, a).to_premul())
            .unwrap_or([0, 0, 0, 0]);
        clear_pixmap(&mut pixmap, clear);
        self.canvas = Some(CpuCanvas {
            width,
            height,
            pixmap,
        });
        Ok(())
    }

    fn stroke_polyline(&mut self, curve: &Curve, color: Rgba8) -> LiveResult<()> {
        match curve.to_path() {
            Some(path) => self.stroke(&path, curve.width, color, Composite::SourceOver),
            None => Ok(()),
        }
    }

    fn stroke_circle(&mut self, circle: &CircleStroke) -> LiveResult<()> {
        self.stroke(
            &circle.to_path(),
            circle.width,
            circle.color,
            Composite::SourceOver,
        )
    }

    fn clear_polyline(&mut self, curve: &Curve) -> LiveResult<()> {
        match curve.to_path() {
            Some(path) => self.stroke(&path, curve.width, Rgba8::BLACK, Composite::DestinationOut),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> LiveResult<FrameRGBA> {
        let canvas = self
            .canvas
            .take()
            .ok_or_else(|| LiveError::render("finish called before begin"))?;
        Ok(FrameRGBA {
            width: u32::from(canvas.width),
            height: u32::from(canvas.height),
            data: canvas.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn composite(dst: &mut [u8], src: &[u8], op: Composite) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        match op {
            Composite::SourceOver => {
                for c in 0..4 {
                    let v = u16::from(s[c]) + (u16::from(d[c]) * inv + 127) / 255;
                    d[c] = v.min(255) as u8;
                }
            }
            Composite::DestinationOut => {
                for c in d.iter_mut() {
                    *c = ((u16::from(*c) * inv + 127) / 255) as u8;
                }
            }
        }
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let p = |pt: kurbo::Point| vello_cpu::kurbo::Point::new(pt.x, pt.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(a) => out.move_to(p(a)),
            PathEl::LineTo(a) => out.line_to(p(a)),
            PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
            PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
