//! Soft radial eyeshadow over the lid and crease.

use kurbo::{BezPath, Point, Vec2};

use crate::face::geometry::{centroid, max_radius, polyline_path};
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::coverage::FillRule;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const LEFT_EYE: [usize; 20] = [
    243, 133, 173, 157, 158, 159, 160, 161, 246, 33, 130, 226, 247, 30, 29, 27, 28, 56, 190, 243,
];
const RIGHT_EYE: [usize; 19] = [
    463, 398, 384, 385, 386, 387, 388, 466, 263, 359, 446, 467, 260, 259, 257, 258, 286, 414, 463,
];

/// Lift applied to the filled outline so the color sits on the lid rather than the lash line.
const LIFT_PX: f64 = 6.0;

/// Alpha falloff as `(offset, fraction of intensity)`.
const FALLOFF: [(f64, f64); 6] = [
    (0.0, 1.0),
    (0.3, 0.8),
    (0.5, 0.6),
    (0.7, 0.3),
    (0.9, 0.1),
    (1.0, 0.0),
];

#[derive(Clone, Copy, Debug, Default)]
pub struct Eyeshadow;

/// Gradient anchor measured on the eye contour; only the filled outline is lifted.
struct LidShape {
    path: BezPath,
    center: Point,
    radius: f64,
}

impl LidShape {
    fn new(points: &[Point]) -> Self {
        let center = centroid(points);
        let radius = max_radius(points, center) * 1.2;
        let lifted: Vec<Point> = points
            .iter()
            .map(|&p| p - Vec2::new(0.0, LIFT_PX))
            .collect();
        Self {
            path: polyline_path(&lifted, true),
            center,
            radius,
        }
    }
}

impl MakeupLayer for Eyeshadow {
    fn kind(&self) -> MakeupType {
        MakeupType::Eyeshadow
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0x8A, 0x2B, 0xE2),
            pattern: "normal".to_string(),
            intensity: 0.5,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["normal"]
    }

    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        _cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Eyeshadow) else {
            return Ok(());
        };
        // The lid outline is measured two pixels short of the surface height.
        let height = h - 2.0;

        canvas.save();
        for indices in [&LEFT_EYE[..], &RIGHT_EYE[..]] {
            let LidShape {
                path,
                center,
                radius,
            } = LidShape::new(&face.px_many(indices, w, height)?);

            let mut paint = Paint::radial(
                center - Vec2::new(0.0, radius * 0.1),
                0.0,
                center,
                radius * 1.5,
            );
            for (offset, k) in FALLOFF {
                paint.add_stop(offset, style.color.with_alpha(style.intensity * k));
            }

            canvas.set_global_alpha(style.intensity);
            canvas.set_composite_op(CompositeOp::SoftLight);
            // Two passes deepen the soft-light tint.
            canvas.fill_path(&path, &paint, FillRule::NonZero);
            canvas.fill_path(&path, &paint, FillRule::NonZero);
        }
        canvas.restore();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/makeup/eyeshadow.rs"]
mod tests;
