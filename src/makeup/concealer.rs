//! Under-eye concealer, tuned per rendering engine.
//!
//! Engines whose blur filter is unreliable (Safari) get a wide multiply wash with
//! an extra edge-erase pass instead of the blurred soft-light passes.

use std::ops::RangeInclusive;

use kurbo::{BezPath, Point};

use crate::face::geometry::{centroid, max_radius, tensioned_spline};
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{HexColor, Rgba};
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::coverage::FillRule;
use crate::raster::filter::Filter;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const RIGHT_UNDER_EYE: [usize; 20] = [
    143, 35, 226, 25, 110, 24, 23, 22, 26, 112, 243, 244, 245, 128, 121, 120, 119, 118, 117, 111,
];
const LEFT_UNDER_EYE: [usize; 22] = [
    372, 265, 446, 359, 255, 339, 254, 253, 252, 256, 341, 464, 465, 351, 412, 357, 350, 349, 348,
    347, 346, 340,
];

const SAFARI_WASH: [(f64, f64); 9] = [
    (0.0, 1.0),
    (0.1, 0.95),
    (0.2, 0.9),
    (0.3, 0.8),
    (0.4, 0.6),
    (0.5, 0.4),
    (0.7, 0.2),
    (0.8, 0.1),
    (0.9, 0.05),
];
const SAFARI_FEATHER: [(f64, f64); 7] = [
    (0.0, 0.0),
    (0.2, 0.01),
    (0.4, 0.02),
    (0.6, 0.03),
    (0.8, 0.04),
    (0.9, 0.05),
    (1.0, 0.1),
];
const BLURRED_FEATHER: [(f64, f64); 5] = [(0.0, 0.0), (0.3, 0.05), (0.5, 0.1), (0.7, 0.25), (1.0, 0.4)];

#[derive(Clone, Copy, Debug, Default)]
pub struct Concealer;

impl MakeupLayer for Concealer {
    fn kind(&self) -> MakeupType {
        MakeupType::Concealer
    }

    fn default_style(&self, profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0xF2, 0xCF, 0x97),
            pattern: "normal".to_string(),
            intensity: profile.default_concealer_opacity(),
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
        cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Concealer) else {
            return Ok(());
        };
        let settings = cx.profile.concealer();

        canvas.save();
        for indices in [&LEFT_UNDER_EYE[..], &RIGHT_UNDER_EYE[..]] {
            let points = face.px_many(indices, w, h)?;
            let area = UnderEye {
                path: tensioned_spline(&points, w),
                center: centroid(&points),
                radius: max_radius(&points, centroid(&points)),
            };

            canvas.set_filter(Filter::blur(settings.blur_px));
            canvas.set_composite_op(settings.blend);
            if cx.profile.is_safari() {
                area.safari_wash(canvas, style);
            } else {
                area.blurred_wash(canvas, style);
            }
            area.feather(canvas, cx.profile.is_safari());

            canvas.set_filter(Filter::none());
            canvas.set_composite_op(CompositeOp::SourceOver);
            canvas.set_global_alpha(1.0);
        }
        canvas.restore();
        Ok(())
    }
}

struct UnderEye {
    path: BezPath,
    center: Point,
    radius: f64,
}

impl UnderEye {
    fn fill(&self, canvas: &mut Canvas, paint: &Paint) {
        canvas.fill_path(&self.path, paint, FillRule::NonZero);
    }

    fn safari_wash(&self, canvas: &mut Canvas, style: &Style) {
        let r = self.radius;
        let a = (style.intensity * 0.7).min(0.2);
        let mut wash = Paint::radial_centered(self.center, r * 0.1, r * 3.2);
        for (offset, k) in SAFARI_WASH {
            wash.add_stop(offset, style.color.with_alpha(a * k));
        }
        wash.add_stop(1.0, Rgba::black(0.0));
        canvas.set_composite_op(CompositeOp::Multiply);
        self.fill(canvas, &wash);

        let edge = Paint::radial_centered(self.center, r * 0.1, r * 3.5)
            .with_stop(0.0, Rgba::black(0.0))
            .with_stop(0.5, Rgba::black(0.02))
            .with_stop(1.0, Rgba::black(0.1));
        canvas.set_composite_op(CompositeOp::DestinationOut);
        canvas.set_global_alpha(0.8);
        self.fill(canvas, &edge);
        canvas.set_global_alpha(1.0);
    }

    fn blurred_wash(&self, canvas: &mut Canvas, style: &Style) {
        let r = self.radius;
        let a = (style.intensity * 1.2).min(0.35);
        let wash = Paint::radial_centered(self.center, 0.0, r * 1.8)
            .with_stop(0.0, style.color.with_alpha(a))
            .with_stop(0.3, style.color.with_alpha(a * 0.8))
            .with_stop(0.6, style.color.with_alpha(a * 0.5))
            .with_stop(0.8, style.color.with_alpha(a * 0.2))
            .with_stop(1.0, style.color.with_alpha(0.0));
        canvas.set_composite_op(CompositeOp::SoftLight);
        self.fill(canvas, &wash);

        canvas.set_filter(Filter::blur((r * 0.1).max(8.0) as f32));
        canvas.set_global_alpha(0.3);
        self.fill(canvas, &wash);
        canvas.set_filter(Filter::none());
        canvas.set_global_alpha(1.0);
    }

    // Erases a little toward the rim so the patch fades into the skin.
    fn feather(&self, canvas: &mut Canvas, safari: bool) {
        let r = self.radius;
        let (stops, alpha): (&[(f64, f64)], f64) = if safari {
            (&SAFARI_FEATHER, 0.6)
        } else {
            (&BLURRED_FEATHER, 0.8)
        };
        let mut paint = Paint::radial_centered(self.center, r * 0.4, r * 2.2);
        for &(offset, a) in stops {
            paint.add_stop(offset, Rgba::black(a));
        }
        canvas.set_composite_op(CompositeOp::DestinationOut);
        canvas.set_global_alpha(alpha);
        self.fill(canvas, &paint);
    }
}
