//! Lipstick in four finishes: normal, matte, glossy and glitter.

use std::f64::consts::TAU;

use kurbo::{BezPath, Circle, Point, Vec2};

use crate::face::geometry::{centroid, polyline_path};
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{HexColor, Rgba};
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::coverage::{FillRule, StrokeStyle};
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const LIPS_OUTER: [usize; 21] = [
    61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291, 375, 321, 405, 314, 17, 84, 181, 91, 146, 61,
];
const LIPS_INNER: [usize; 21] = [
    78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95, 78,
];
const UPPER_LIP: [usize; 9] = [61, 185, 40, 39, 37, 0, 267, 269, 270];
const LOWER_LIP: [usize; 10] = [291, 375, 321, 405, 314, 17, 84, 181, 91, 146];
const UPPER_SHIMMER: [usize; 14] = [74, 42, 73, 41, 72, 38, 11, 12, 302, 268, 303, 271, 304, 272];
const LOWER_SHIMMER: [usize; 14] = [
    319, 320, 403, 404, 316, 315, 15, 16, 86, 85, 179, 180, 89, 90,
];
const UPPER_HIGHLIGHTS: [usize; 3] = [73, 11, 303];
const LOWER_HIGHLIGHTS: [usize; 3] = [180, 16, 404];

const HIGHLIGHT_OPACITY: f64 = 0.05;

pub const PATTERNS: [&str; 4] = ["normal", "matte", "glossy", "glitter"];

#[derive(Clone, Copy, Debug, Default)]
pub struct Lips;

/// Pixel-space lip geometry shared by every finish.
struct LipShape {
    region: BezPath,
    outer: Vec<Point>,
    upper_center: Point,
    lower_center: Point,
}

impl LipShape {
    fn new(face: &LandmarkSet, w: f64, h: f64) -> MakeoverResult<Self> {
        let outer = face.px_many(&LIPS_OUTER, w, h)?;
        let inner = face.px_many(&LIPS_INNER, w, h)?;
        let mut region = polyline_path(&outer, true);
        region.extend(polyline_path(&inner, true));
        Ok(Self {
            upper_center: centroid(&outer[..10]),
            lower_center: centroid(&outer[10..]),
            region,
            outer,
        })
    }

    fn fill(&self, canvas: &mut Canvas, paint: &Paint) {
        canvas.fill_path(&self.region, paint, FillRule::EvenOdd);
    }
}

impl MakeupLayer for Lips {
    fn kind(&self) -> MakeupType {
        MakeupType::Lips
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0xFF, 0x00, 0x00),
            pattern: "normal".to_string(),
            intensity: 0.85,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &PATTERNS
    }

    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Lips) else {
            return Ok(());
        };
        let shape = LipShape::new(face, w, h)?;

        canvas.save();
        let result = match style.pattern.as_str() {
            "matte" => {
                matte(canvas, &shape, style, cx);
                Ok(())
            }
            "glossy" => glossy(canvas, &shape, face, style, w, h),
            "glitter" => {
                tinted_base(canvas, &shape, style);
                glitter(canvas, face, cx.clock_ms, w, h)?;
                highlight(canvas, &shape, style);
                Ok(())
            }
            _ => {
                tinted_base(canvas, &shape, style);
                highlight(canvas, &shape, style);
                Ok(())
            }
        };
        canvas.restore();
        result
    }
}

// Color at full transparency, then a darker multiply pass for depth.
fn tinted_base(canvas: &mut Canvas, shape: &LipShape, style: &Style) {
    let t = style.intensity;
    canvas.set_global_alpha(t);
    shape.fill(canvas, &Paint::from(style.color.with_alpha(t)));

    canvas.set_composite_op(CompositeOp::Multiply);
    canvas.set_global_alpha(t * 0.4);
    shape.fill(canvas, &Paint::from(style.color.with_alpha(t * 0.7)));
}

// Faint soft-light pass of the lipstick color over the whole region.
fn highlight(canvas: &mut Canvas, shape: &LipShape, style: &Style) {
    canvas.set_composite_op(CompositeOp::SoftLight);
    canvas.set_global_alpha(HIGHLIGHT_OPACITY);
    shape.fill(canvas, &Paint::from(style.color.with_alpha(style.intensity)));
}

// Base tint, then multiply, color-burn and soft-light passes of the same color
// flatten the finish; powder speckle sits between them.
fn matte(canvas: &mut Canvas, shape: &LipShape, style: &Style, cx: &mut LayerContext<'_>) {
    let tint = Paint::from(style.color.with_alpha(style.intensity));

    canvas.set_composite_op(CompositeOp::SourceOver);
    canvas.set_global_alpha(0.6);
    shape.fill(canvas, &tint);

    canvas.set_composite_op(CompositeOp::Multiply);
    canvas.set_global_alpha(0.3);
    shape.fill(canvas, &tint);

    powder(canvas, shape, cx);

    canvas.set_composite_op(CompositeOp::ColorBurn);
    canvas.set_global_alpha(0.2);
    shape.fill(canvas, &tint);

    canvas.set_composite_op(CompositeOp::SoftLight);
    canvas.set_global_alpha(0.3);
    shape.fill(canvas, &tint);
}

// Dense gray speckle over the lip bounds: one 0.2px dot per 200 px^2.
fn powder(canvas: &mut Canvas, shape: &LipShape, cx: &mut LayerContext<'_>) {
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for p in &shape.outer {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    let (bw, bh) = (x1 - x0, y1 - y0);
    let count = ((bw * bh) / 200.0).floor().max(0.0) as usize;

    canvas.set_composite_op(CompositeOp::SoftLight);
    canvas.set_global_alpha(0.5);
    let dot = Paint::from(Rgba::new(128, 128, 128, 0.2));
    for _ in 0..count {
        let x = x0 + cx.rng.next_f64() * bw;
        let y = y0 + cx.rng.next_f64() * bh;
        canvas.fill_shape(&Circle::new((x, y), 0.2), &dot);
    }
}

fn glossy(
    canvas: &mut Canvas,
    shape: &LipShape,
    face: &LandmarkSet,
    style: &Style,
    w: f64,
    h: f64,
) -> MakeoverResult<()> {
    shape.fill(canvas, &Paint::from(style.color.with_alpha(0.35)));

    let upper = polyline_path(&face.px_many(&UPPER_LIP, w, h)?, false);
    let lower = polyline_path(&face.px_many(&LOWER_LIP, w, h)?, false);
    let (uc, lc) = (shape.upper_center, shape.lower_center);

    canvas.set_composite_op(CompositeOp::SoftLight);
    canvas.set_global_alpha(0.6);
    let liquid_upper = Paint::linear(uc - Vec2::new(0.0, 10.0), uc + Vec2::new(0.0, 5.0))
        .with_stop(0.0, Rgba::white(0.2))
        .with_stop(0.5, Rgba::white(0.4))
        .with_stop(1.0, Rgba::white(0.1));
    let liquid_lower = Paint::linear(lc - Vec2::new(0.0, 5.0), lc + Vec2::new(0.0, 10.0))
        .with_stop(0.0, Rgba::white(0.1))
        .with_stop(0.5, Rgba::white(0.4))
        .with_stop(1.0, Rgba::white(0.2));
    canvas.fill_path(&upper, &liquid_upper, FillRule::NonZero);
    canvas.fill_path(&lower, &liquid_lower, FillRule::NonZero);

    canvas.set_composite_op(CompositeOp::Overlay);
    canvas.set_global_alpha(0.7);
    canvas.fill_path(&upper, &gloss(uc, 0.8, 0.4), FillRule::NonZero);
    canvas.fill_path(&lower, &gloss(lc, 0.6, 0.3), FillRule::NonZero);

    canvas.set_composite_op(CompositeOp::Lighter);
    canvas.set_global_alpha(0.4);
    for indices in [&UPPER_HIGHLIGHTS, &LOWER_HIGHLIGHTS] {
        for (i, p) in face.px_many(indices, w, h)?.into_iter().enumerate() {
            let (radius, intensity) = if i == 0 { (2.5, 0.6) } else { (2.0, 0.5) };
            let spot = Paint::radial_centered(p, 0.0, radius)
                .with_stop(0.0, Rgba::white(intensity))
                .with_stop(0.5, Rgba::white(intensity * 0.5))
                .with_stop(1.0, Rgba::white(0.0));
            canvas.fill_shape(&Circle::new(p, radius), &spot);
        }
    }
    Ok(())
}

fn gloss(center: Point, core: f64, mid: f64) -> Paint {
    Paint::radial_centered(center, 0.0, 30.0)
        .with_stop(0.0, Rgba::white(core))
        .with_stop(0.4, Rgba::white(mid))
        .with_stop(1.0, Rgba::white(0.0))
}

/// Blink intensity in `[0, 1]` of the `index`-th shimmer point at `now_ms`.
pub(crate) fn glitter_intensity(index: usize, now_ms: f64) -> f64 {
    let offset = index as f64 * 237.0;
    let blink = 0.7 + (index % 5) as f64 * 0.3;
    ((now_ms + offset) * blink * 0.001).sin() * 0.5 + 0.5
}

fn glitter(canvas: &mut Canvas, face: &LandmarkSet, now_ms: f64, w: f64, h: f64) -> MakeoverResult<()> {
    canvas.set_global_alpha(0.85);
    canvas.set_composite_op(CompositeOp::Screen);

    let points = UPPER_SHIMMER.iter().chain(LOWER_SHIMMER.iter());
    for (i, &idx) in points.enumerate() {
        let p = face.px(idx, w, h)?;
        let intensity = glitter_intensity(i, now_ms);
        if intensity > 0.3 {
            let size = 0.6 + (i % 3) as f64 * 0.4;
            glitter_point(canvas, p, intensity, size);
        }
    }
    Ok(())
}

fn glitter_point(canvas: &mut Canvas, p: Point, intensity: f64, size: f64) {
    let base = 0.8 * size;
    let core = Paint::radial_centered(p, 0.0, base)
        .with_stop(0.0, Rgba::new(255, 215, 0, intensity))
        .with_stop(0.5, Rgba::new(218, 165, 32, intensity * 0.7))
        .with_stop(1.0, Rgba::new(255, 215, 0, 0.0));
    canvas.fill_shape(&Circle::new(p, base), &core);

    let glow_r = base * 0.6;
    let glow = Paint::radial_centered(p, 0.0, glow_r)
        .with_stop(0.0, Rgba::white(intensity * 0.9))
        .with_stop(1.0, Rgba::white(0.0));
    canvas.fill_shape(&Circle::new(p, glow_r), &glow);

    let len = base * 1.2;
    for k in 0..4 {
        let angle = TAU * f64::from(k) / 4.0;
        let end = p + Vec2::new(angle.cos(), angle.sin()) * len;
        let ray = Paint::linear(p, end)
            .with_stop(0.0, Rgba::new(255, 215, 0, intensity * 0.8))
            .with_stop(1.0, Rgba::new(255, 215, 0, 0.0));
        let mut path = BezPath::new();
        path.move_to(p);
        path.line_to(end);
        canvas.stroke_path(&path, &ray, StrokeStyle::new(base * 0.2));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/makeup/lips.rs"]
mod tests;
