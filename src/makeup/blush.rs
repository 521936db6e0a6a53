//! Cheek blush: three stacked, tilted elliptical washes per cheek.

use std::f64::consts::PI;

use kurbo::{Ellipse, Point};

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::MakeoverResult;
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::canvas::Canvas;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

const LEFT_CHEEK: usize = 117;
const RIGHT_CHEEK: usize = 346;

const SCALES: [f64; 3] = [1.2, 1.0, 0.8];

#[derive(Clone, Copy, Debug, Default)]
pub struct Blush;

impl MakeupLayer for Blush {
    fn kind(&self) -> MakeupType {
        MakeupType::Blush
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0xFF, 0x6B, 0x6B),
            pattern: "normal".to_string(),
            intensity: 0.4,
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
        let Some((w, h)) = surface_size(canvas, MakeupType::Blush) else {
            return Ok(());
        };
        let base = w.min(h);
        let cheeks = [
            (face.px(LEFT_CHEEK, w, h)?, 1.0, -PI / 6.0),
            (face.px(RIGHT_CHEEK, w, h)?, -1.0, PI / 6.0),
        ];

        canvas.save();
        canvas.set_global_alpha(style.intensity);
        for (cheek, side, tilt) in cheeks {
            let center = Point::new(cheek.x + side * 0.02 * base, cheek.y + 0.04 * base);
            for scale in SCALES {
                let rx = 0.06 * base * scale;
                let ry = 0.08 * base * scale;
                let paint = Paint::radial_centered(center, 0.0, ry)
                    .with_stop(0.0, style.color.with_alpha(style.intensity * 0.3))
                    .with_stop(0.3, style.color.with_alpha(style.intensity * 0.2))
                    .with_stop(1.0, style.color.with_alpha(0.0));
                canvas.fill_shape(&Ellipse::new(center, (rx, ry), tilt), &paint);
            }
        }
        canvas.restore();
        Ok(())
    }
}
