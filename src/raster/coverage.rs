//! Anti-aliased path coverage, rasterized by `vello_cpu`.
//!
//! Shapes are filled or stroked in opaque white into a pixmap sized to their device
//! bounding box; the alpha channel of that pixmap is the coverage mask the canvas
//! composites through.

use kurbo::{Affine, BezPath, PathEl, Rect, Shape};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Stroke parameters in user space. Butt caps pair with miter joins, round caps
/// with round joins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Round,
        }
    }

    fn to_cpu(self) -> vello_cpu::kurbo::Stroke {
        use vello_cpu::kurbo::{Cap, Join, Stroke};

        let (cap, join) = match self.cap {
            LineCap::Butt => (Cap::Butt, Join::Miter),
            LineCap::Round => (Cap::Round, Join::Round),
        };
        Stroke::new(self.width).with_caps(cap).with_join(join)
    }

    // Miter joins at the default limit reach at most 4 half-widths out.
    fn reach(self) -> f64 {
        match self.cap {
            LineCap::Butt => self.width * 2.0,
            LineCap::Round => self.width * 0.5,
        }
    }
}

/// Coverage in `[0, 1]` for the device-space box `[x0, x0 + w) x [y0, y0 + h)`.
#[derive(Clone, Debug)]
pub(crate) struct Mask {
    pub x0: usize,
    pub y0: usize,
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl Mask {
    pub fn full(width: usize, height: usize, value: f32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            w: width,
            h: height,
            data: vec![value; width * height],
        }
    }

    /// Coverage at device pixel `(x, y)`, zero outside the box.
    pub fn at(&self, x: usize, y: usize) -> f32 {
        if x < self.x0 || y < self.y0 || x >= self.x0 + self.w || y >= self.y0 + self.h {
            return 0.0;
        }
        self.data[(y - self.y0) * self.w + (x - self.x0)]
    }
}

/// Coverage of `path` filled under `transform`, clipped to a `width x height` surface.
/// Returns `None` when nothing would be covered.
pub(crate) fn fill_mask(
    path: &BezPath,
    transform: Affine,
    rule: FillRule,
    width: usize,
    height: usize,
) -> Option<Mask> {
    let bounds = device_bounds(path, transform, 0.0)?;
    render_mask(path, bounds, transform, (width, height), |ctx, cpu_path| {
        ctx.set_fill_rule(match rule {
            FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
            FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
        });
        ctx.fill_path(cpu_path);
    })
}

/// Coverage of `path` stroked in user space with `style`, then transformed.
pub(crate) fn stroke_mask(
    path: &BezPath,
    transform: Affine,
    style: StrokeStyle,
    width: usize,
    height: usize,
) -> Option<Mask> {
    if !(style.width > 0.0 && style.width.is_finite()) {
        return None;
    }
    let bounds = device_bounds(path, transform, style.reach())?;
    render_mask(path, bounds, transform, (width, height), |ctx, cpu_path| {
        ctx.set_stroke(style.to_cpu());
        ctx.stroke_path(cpu_path);
    })
}

fn device_bounds(path: &BezPath, transform: Affine, pad: f64) -> Option<Rect> {
    if path.elements().is_empty() || !transform.as_coeffs().iter().all(|c| c.is_finite()) {
        return None;
    }
    let user = path.bounding_box().inflate(pad, pad);
    let device = transform.transform_rect_bbox(user);
    let finite = [device.x0, device.y0, device.x1, device.y1]
        .iter()
        .all(|v| v.is_finite());
    finite.then_some(device)
}

fn render_mask(
    path: &BezPath,
    bounds: Rect,
    transform: Affine,
    (width, height): (usize, usize),
    draw: impl FnOnce(&mut vello_cpu::RenderContext, &vello_cpu::kurbo::BezPath),
) -> Option<Mask> {
    let x0 = bounds.x0.floor().max(0.0) as usize;
    let y0 = bounds.y0.floor().max(0.0) as usize;
    let x1 = (bounds.x1.ceil().max(0.0) as usize).min(width);
    let y1 = (bounds.y1.ceil().max(0.0) as usize).min(height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    let (w, h) = (x1 - x0, y1 - y0);
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        tracing::warn!(w, h, "coverage region exceeds u16, skipping draw");
        return None;
    };

    let local = Affine::translate((-(x0 as f64), -(y0 as f64))) * transform;
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(affine_to_cpu(local));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    draw(&mut ctx, &bezpath_to_cpu(path));
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    let bytes = pixmap.data_as_u8_slice();
    let data: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|px| f32::from(px[3]) / 255.0)
        .collect();
    if data.iter().all(|&v| v <= 0.0) {
        return None;
    }
    Some(Mask {
        x0,
        y0,
        w,
        h,
        data,
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::Point;

    let pt = |p: kurbo::Point| Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/coverage.rs"]
mod tests;
