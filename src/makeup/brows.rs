//! Brow sprites stretched along each brow line.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use kurbo::Rect;

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::MakeoverResult;
use crate::makeup::sprites::{SpriteSpan, tint};
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::canvas::Canvas;
use crate::raster::pixmap::Pixmap;
use crate::render::profile::EngineProfile;

const RIGHT_BROW: [usize; 5] = [336, 296, 334, 293, 300];
const LEFT_BROW: [usize; 5] = [107, 66, 105, 63, 70];
const LEFT_EYE_CORNERS: [usize; 2] = [33, 133];
const RIGHT_EYE_CORNERS: [usize; 2] = [362, 263];

const DEFAULT_THICKNESS: f64 = 0.8;
/// Sprite height relative to the distance between eye centers.
const HEIGHT_RATIO: f64 = 0.15;

#[derive(Clone, Copy, Debug, Default)]
pub struct Brows;

impl MakeupLayer for Brows {
    fn kind(&self) -> MakeupType {
        MakeupType::Brows
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0x4A, 0x2C, 0x2A),
            pattern: "normal".to_string(),
            intensity: 0.5,
            thickness: DEFAULT_THICKNESS,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["normal"]
    }

    fn thickness_range(&self) -> Option<RangeInclusive<f64>> {
        Some(0.1..=1.0)
    }

    fn uses_sprites(&self) -> bool {
        true
    }

    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()> {
        let Some((w, h)) = surface_size(canvas, MakeupType::Brows) else {
            return Ok(());
        };
        let Some(pair) = cx.sprites.request(MakeupType::Brows, &style.pattern) else {
            return Ok(());
        };
        let brow_height = eye_distance(face, w)? * HEIGHT_RATIO;

        canvas.save();
        canvas.set_global_alpha(style.intensity * style.thickness);
        for (indices, image, left) in [
            (&RIGHT_BROW, &pair.right, false),
            (&LEFT_BROW, &pair.left, true),
        ] {
            let span = SpriteSpan {
                start: face.px(indices[0], w, h)?,
                end: face.px(indices[indices.len() - 1], w, h)?,
            };
            draw_brow(canvas, image, span, brow_height, style.color, left)?;
        }
        canvas.restore();
        Ok(())
    }
}

/// Distance between eye centers. Both axes are scaled by the surface width.
pub(crate) fn eye_distance(face: &LandmarkSet, width: f64) -> MakeoverResult<f64> {
    let center = |corners: &[usize; 2]| -> MakeoverResult<(f64, f64)> {
        let a = face.px(corners[0], 1.0, 1.0)?;
        let b = face.px(corners[1], 1.0, 1.0)?;
        Ok(((a.x + b.x) / 2.0, (a.y + b.y) / 2.0))
    };
    let (lx, ly) = center(&LEFT_EYE_CORNERS)?;
    let (rx, ry) = center(&RIGHT_EYE_CORNERS)?;
    Ok(((rx - lx) * width).hypot((ry - ly) * width))
}

fn draw_brow(
    canvas: &mut Canvas,
    image: &Pixmap,
    span: SpriteSpan,
    brow_height: f64,
    color: HexColor,
    left: bool,
) -> MakeoverResult<()> {
    let tinted = tint(
        image,
        SpriteSpan::ceil_px(span.length()),
        SpriteSpan::ceil_px(brow_height),
        color,
    )?;
    let (tw, th) = (f64::from(tinted.width()), f64::from(tinted.height()));

    canvas.save();
    if left {
        canvas.translate(span.end.x, span.end.y);
        canvas.rotate(span.angle() + PI);
    } else {
        canvas.translate(span.start.x, span.start.y);
        canvas.rotate(span.angle());
    }
    canvas.draw_pixmap(&tinted, Rect::new(0.0, -th / 2.0, tw, th / 2.0));
    canvas.restore();
    Ok(())
}
