//! Waterline pencil: a round stroke around each eye opening.

use std::ops::RangeInclusive;

use crate::face::geometry::polyline_path;
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::canvas::Canvas;
use crate::raster::coverage::StrokeStyle;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const LEFT_EYE: [usize; 17] = [
    33, 246, 161, 160, 159, 158, 157, 173, 133, 155, 154, 153, 145, 144, 163, 7, 33,
];
const RIGHT_EYE: [usize; 17] = [
    362, 398, 384, 385, 386, 387, 388, 466, 263, 249, 390, 373, 374, 380, 381, 382, 362,
];

const OPACITY: f64 = 0.8;

#[derive(Clone, Copy, Debug, Default)]
pub struct Eyepencil;

impl MakeupLayer for Eyepencil {
    fn kind(&self) -> MakeupType {
        MakeupType::Eyepencil
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0, 0, 0),
            pattern: "normal".to_string(),
            intensity: 1.5,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["normal"]
    }

    /// Stroke width in pixels.
    fn intensity_range(&self) -> RangeInclusive<f64> {
        0.0..=5.0
    }

    fn transparency_scale(&self) -> f64 {
        5.0
    }

    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        _cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Eyepencil) else {
            return Ok(());
        };
        if style.intensity <= 0.0 {
            return Ok(());
        }
        let paint = Paint::from(style.color.opaque());

        canvas.save();
        canvas.set_global_alpha(OPACITY);
        for indices in [&LEFT_EYE, &RIGHT_EYE] {
            let path = polyline_path(&face.px_many(indices, w, h)?, false);
            canvas.stroke_path(&path, &paint, StrokeStyle::round(style.intensity));
        }
        canvas.restore();
        Ok(())
    }
}
