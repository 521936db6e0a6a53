//! Full-face foundation wash with eye and mouth cut-outs.

use std::ops::RangeInclusive;

use kurbo::{BezPath, Point, Rect, Vec2};

use crate::face::geometry::{midpoint_cubic_chain, polyline_path};
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{HexColor, Rgba};
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::coverage::FillRule;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const FACE_CONTOUR: [usize; 37] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109, 102,
];
const FOREHEAD: [usize; 11] = [21, 54, 103, 67, 109, 10, 338, 297, 332, 284, 389];

const RIGHT_EYE: [usize; 16] = [
    362, 398, 384, 385, 386, 387, 388, 466, 263, 249, 390, 373, 374, 380, 381, 382,
];
const LEFT_EYE: [usize; 16] = [
    33, 246, 161, 160, 159, 158, 157, 173, 133, 155, 154, 153, 145, 144, 163, 7,
];
const LIPS: [usize; 20] = [
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185,
];

/// Forehead lift as a fraction of surface height.
const FOREHEAD_LIFT: f64 = 0.06;

#[derive(Clone, Copy, Debug, Default)]
pub struct Foundation;

impl MakeupLayer for Foundation {
    fn kind(&self) -> MakeupType {
        MakeupType::Foundation
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0xFF, 0xD5, 0xAA),
            pattern: "normal".to_string(),
            intensity: 0.3,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["normal"]
    }

    fn intensity_range(&self) -> RangeInclusive<f64> {
        0.0..=0.5
    }

    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        _cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Foundation) else {
            return Ok(());
        };
        let contour = face.px_many(&FACE_CONTOUR, w, h)?;
        let forehead = face.px_many(&FOREHEAD, w, h)?;
        let region = face_region(&contour, &forehead, h * FOREHEAD_LIFT);
        let center = Point::new(w / 2.0, h / 2.0);

        canvas.save();
        canvas.set_global_alpha(style.intensity);
        let wash = Paint::radial_centered(center, 0.0, h / 2.0)
            .with_stop(0.0, style.color.with_alpha(0.4))
            .with_stop(0.7, style.color.with_alpha(0.2))
            .with_stop(1.0, style.color.with_alpha(0.0));
        canvas.fill_path(&region, &wash, FillRule::NonZero);

        canvas.set_composite_op(CompositeOp::DestinationOut);
        let cut = Paint::from(Rgba::black(1.0));
        for indices in [&RIGHT_EYE[..], &LEFT_EYE[..], &LIPS[..]] {
            let hole = polyline_path(&face.px_many(indices, w, h)?, true);
            canvas.fill_path(&hole, &cut, FillRule::NonZero);
        }

        canvas.set_composite_op(CompositeOp::Overlay);
        let glow = Paint::radial_centered(center, 0.0, h / 2.0)
            .with_stop(0.0, Rgba::white(0.1))
            .with_stop(0.5, Rgba::white(0.05))
            .with_stop(1.0, Rgba::white(0.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, w, h), &glow);
        canvas.restore();
        Ok(())
    }
}

/// Face outline with the forehead arc raised by `lift` pixels.
pub(crate) fn face_region(contour: &[Point], forehead: &[Point], lift: f64) -> BezPath {
    let mut path = BezPath::new();
    let (Some(&first), Some(&last), Some(&start)) =
        (forehead.first(), forehead.last(), contour.first())
    else {
        return path;
    };
    let up = Vec2::new(0.0, lift);
    let raised: Vec<Point> = forehead.iter().map(|p| *p - up).collect();

    path.move_to(first - up);
    midpoint_cubic_chain(&mut path, &raised);
    path.curve_to(last - up * 0.5, last, start);
    for p in &contour[1..] {
        path.line_to(*p);
    }
    path.curve_to(first, first - up * 0.5, first - up);
    path.close_path();
    path
}
