use std::sync::Arc;

use kurbo::{Affine, BezPath, Point, Rect, Shape};

use crate::foundation::error::MakeoverResult;
use crate::raster::blend::CompositeOp;
use crate::raster::coverage::{self, FillRule, Mask, StrokeStyle};
use crate::raster::filter::{self, Filter};
use crate::raster::paint::Paint;
use crate::raster::pixmap::Pixmap;

#[derive(Clone, Debug)]
struct DrawState {
    transform: Affine,
    global_alpha: f64,
    op: CompositeOp,
    filter: Filter,
    clip: Option<Arc<Mask>>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            op: CompositeOp::SourceOver,
            filter: Filter::none(),
            clip: None,
        }
    }
}

/// One recorded draw call, kept when tracing is enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    pub op: CompositeOp,
    pub global_alpha: f64,
    pub paint: String,
}

#[derive(Clone, Copy)]
struct Region {
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
}

/// Immediate-mode 2D surface over a premultiplied RGBA8 [`Pixmap`].
///
/// Mirrors the subset of the HTML canvas model the makeup layers rely on: a
/// save/restore state stack (transform, global alpha, composite operator, filter,
/// clip), path fills with solid or gradient paint, strokes, and image drawing.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixmap: Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
    trace: Option<Vec<DrawRecord>>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> MakeoverResult<Self> {
        Ok(Self::from_pixmap(Pixmap::new(width, height)?))
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            state: DrawState::default(),
            stack: Vec::new(),
            trace: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// True when either dimension is zero; every draw call is then a no-op.
    pub fn is_degenerate(&self) -> bool {
        self.pixmap.is_empty()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn snapshot(&self) -> Pixmap {
        self.pixmap.clone()
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Reallocates to `width x height` if the size differs, resetting pixels and state.
    /// Returns whether a resize happened.
    pub fn resize(&mut self, width: u32, height: u32) -> MakeoverResult<bool> {
        if self.width() == width && self.height() == height {
            return Ok(false);
        }
        self.pixmap = Pixmap::new(width, height)?;
        self.state = DrawState::default();
        self.stack.clear();
        Ok(true)
    }

    /// Clears every pixel to transparent, ignoring transform and clip.
    pub fn clear(&mut self) {
        self.pixmap.fill_transparent();
    }

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pops the last saved state; unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    pub fn reset_transform(&mut self) {
        self.state.transform = Affine::IDENTITY;
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform * Affine::translate((x, y));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.state.transform = self.state.transform * Affine::rotate(radians);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform * Affine::scale_non_uniform(sx, sy);
    }

    pub fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    /// Out-of-range or non-finite values are ignored, as a canvas does.
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn composite_op(&self) -> CompositeOp {
        self.state.op
    }

    pub fn set_composite_op(&mut self, op: CompositeOp) {
        self.state.op = op;
    }

    pub fn filter(&self) -> &Filter {
        &self.state.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.state.filter = filter;
    }

    /// Starts recording draw calls, dropping anything recorded before.
    pub fn enable_trace(&mut self) {
        self.trace = Some(Vec::new());
    }

    pub fn take_trace(&mut self) -> Vec<DrawRecord> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Intersects the current clip with `path` under the current transform.
    pub fn clip_path(&mut self, path: &BezPath, rule: FillRule) {
        let (w, h) = self.dims();
        if w == 0 || h == 0 {
            return;
        }
        let shape = coverage::fill_mask(path, self.state.transform, rule, w, h);
        let mut next = Mask::full(w, h, 0.0);
        if let Some(shape) = shape {
            for y in shape.y0..shape.y0 + shape.h {
                for x in shape.x0..shape.x0 + shape.w {
                    let prev = self.state.clip.as_ref().map_or(1.0, |c| c.at(x, y));
                    next.data[y * w + x] = shape.at(x, y) * prev;
                }
            }
        }
        self.state.clip = Some(Arc::new(next));
    }

    pub fn clip_rect(&mut self, rect: Rect) {
        self.clip_path(&rect.to_path(0.1), FillRule::NonZero);
    }

    pub fn fill_path(&mut self, path: &BezPath, paint: &Paint, rule: FillRule) {
        self.record(paint);
        let (w, h) = self.dims();
        let mask = coverage::fill_mask(path, self.state.transform, rule, w, h);
        self.paint_mask(mask, paint);
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_path(&rect.to_path(0.1), paint, FillRule::NonZero);
    }

    /// Fills `shape` (circle, ellipse, ...) flattened at a sub-pixel tolerance.
    pub fn fill_shape(&mut self, shape: &impl Shape, paint: &Paint) {
        self.fill_path(&shape.to_path(0.05), paint, FillRule::NonZero);
    }

    pub fn stroke_path(&mut self, path: &BezPath, paint: &Paint, style: StrokeStyle) {
        self.record(paint);
        let (w, h) = self.dims();
        let mask = coverage::stroke_mask(path, self.state.transform, style, w, h);
        self.paint_mask(mask, paint);
    }

    /// Draws `image` scaled into `dest` (user space) with bilinear sampling.
    pub fn draw_pixmap(&mut self, image: &Pixmap, dest: Rect) {
        if image.is_empty() || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.push(DrawRecord {
                op: self.state.op,
                global_alpha: self.state.global_alpha,
                paint: format!("image({}x{})", image.width(), image.height()),
            });
        }
        let (w, h) = self.dims();
        let Some(inv) = self.inverse() else {
            return;
        };
        let Some(mask) =
            coverage::fill_mask(&dest.to_path(0.1), self.state.transform, FillRule::NonZero, w, h)
        else {
            return;
        };
        let sx = f64::from(image.width()) / dest.width();
        let sy = f64::from(image.height()) / dest.height();
        let source = |x: usize, y: usize| -> [f32; 4] {
            let cov = mask.at(x, y);
            if cov <= 0.0 {
                return [0.0; 4];
            }
            let u = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let px = image.sample_bilinear((u.x - dest.x0) * sx, (u.y - dest.y0) * sy);
            scale4(px, cov)
        };
        self.composite(&mask, &source);
    }

    fn paint_mask(&mut self, mask: Option<Mask>, paint: &Paint) {
        let Some(mask) = mask else {
            if self.state.op.is_unbounded() {
                self.composite(&Mask::full(0, 0, 0.0), &|_: usize, _: usize| [0.0f32; 4]);
            }
            return;
        };
        let Some(inv) = self.inverse() else {
            return;
        };
        let solid = match paint {
            Paint::Solid(c) => Some(c.premul()),
            _ => None,
        };
        let source = |x: usize, y: usize| -> [f32; 4] {
            let cov = mask.at(x, y);
            if cov <= 0.0 {
                return [0.0; 4];
            }
            let px = match solid {
                Some(px) => px,
                None => paint.sample(inv * Point::new(x as f64 + 0.5, y as f64 + 0.5)),
            };
            scale4(px, cov)
        };
        self.composite(&mask, &source);
    }

    // Routes through an offscreen blur layer when the filter asks for one.
    fn composite(&mut self, mask: &Mask, source: &dyn Fn(usize, usize) -> [f32; 4]) {
        let sigma = self.state.filter.blur_sigma();
        let radius = filter::blur_radius(sigma);
        if radius == 0 || mask.w == 0 {
            let region = Region {
                x0: mask.x0,
                y0: mask.y0,
                w: mask.w,
                h: mask.h,
            };
            self.blit(region, source);
            return;
        }

        let (w, h) = self.dims();
        let pad = radius as usize;
        let x0 = mask.x0.saturating_sub(pad);
        let y0 = mask.y0.saturating_sub(pad);
        let x1 = (mask.x0 + mask.w + pad).min(w);
        let y1 = (mask.y0 + mask.h + pad).min(h);
        let (lw, lh) = (x1 - x0, y1 - y0);
        let mut layer = vec![0u8; lw * lh * 4];
        for y in 0..lh {
            for x in 0..lw {
                let px = source(x0 + x, y0 + y);
                let i = (y * lw + x) * 4;
                for c in 0..4 {
                    layer[i + c] = to_u8(px[c]);
                }
            }
        }
        let blurred = match filter::blur_rgba8_premul(&layer, lw as u32, lh as u32, radius, sigma)
        {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(%err, "blur failed, drawing unblurred");
                layer
            }
        };
        let region = Region {
            x0,
            y0,
            w: lw,
            h: lh,
        };
        let layer_source = |x: usize, y: usize| -> [f32; 4] {
            let i = ((y - y0) * lw + (x - x0)) * 4;
            [
                f32::from(blurred[i]) / 255.0,
                f32::from(blurred[i + 1]) / 255.0,
                f32::from(blurred[i + 2]) / 255.0,
                f32::from(blurred[i + 3]) / 255.0,
            ]
        };
        self.blit(region, &layer_source);
    }

    fn blit(&mut self, region: Region, source: &dyn Fn(usize, usize) -> [f32; 4]) {
        let (w, h) = self.dims();
        let op = self.state.op;
        let alpha = self.state.global_alpha as f32;
        let filter = &self.state.filter;
        let color_filter = filter.has_color_ops();
        let clip = self.state.clip.clone();

        let region = if op.is_unbounded() {
            Region { x0: 0, y0: 0, w, h }
        } else {
            region
        };
        let in_region = |x: usize, y: usize| {
            x >= region.x0 && y >= region.y0 && x < region.x0 + region.w && y < region.y0 + region.h
        };
        let data = self.pixmap.data_mut();
        for y in region.y0..(region.y0 + region.h).min(h) {
            for x in region.x0..(region.x0 + region.w).min(w) {
                let clip_cov = clip.as_ref().map_or(1.0, |c| c.at(x, y));
                if clip_cov <= 0.0 {
                    continue;
                }
                let mut src = if in_region(x, y) { source(x, y) } else { [0.0; 4] };
                if src[3] <= 0.0 && !op.is_unbounded() {
                    continue;
                }
                if color_filter {
                    src = filter.apply_color(src);
                }
                let src = scale4(src, alpha);
                let i = (y * w + x) * 4;
                let dst = [
                    f32::from(data[i]) / 255.0,
                    f32::from(data[i + 1]) / 255.0,
                    f32::from(data[i + 2]) / 255.0,
                    f32::from(data[i + 3]) / 255.0,
                ];
                let mut out = op.apply(src, dst);
                if clip_cov < 1.0 {
                    for c in 0..4 {
                        out[c] = dst[c] + (out[c] - dst[c]) * clip_cov;
                    }
                }
                let a = to_u8(out[3]);
                data[i + 3] = a;
                for c in 0..3 {
                    data[i + c] = to_u8(out[c]).min(a);
                }
            }
        }
    }

    fn record(&mut self, paint: &Paint) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(DrawRecord {
                op: self.state.op,
                global_alpha: self.state.global_alpha,
                paint: paint.to_string(),
            });
        }
    }

    fn inverse(&self) -> Option<Affine> {
        let t = self.state.transform;
        (t.determinant().abs() > 1e-12).then(|| t.inverse())
    }

    fn dims(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }
}

fn scale4(px: [f32; 4], k: f32) -> [f32; 4] {
    [px[0] * k, px[1] * k, px[2] * k, px[3] * k]
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
