//! Eyeliner sprites along the upper lash line, "normal" or "lashed".

use std::ops::RangeInclusive;

use kurbo::{Point, Rect};

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::MakeoverResult;
use crate::makeup::sprites::{SpriteSpan, tint};
use crate::makeup::{LayerContext, MakeupLayer, MakeupType, Style, surface_size};
use crate::raster::canvas::Canvas;
use crate::raster::pixmap::Pixmap;
use crate::render::profile::EngineProfile;

const LEFT_LINE: [usize; 9] = [133, 173, 157, 158, 159, 160, 161, 246, 33];
const RIGHT_LINE: [usize; 9] = [463, 398, 384, 385, 386, 387, 388, 466, 263];

#[derive(Clone, Copy, Debug, Default)]
pub struct Eyeliner;

/// Placement that differs between the two sprite styles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LinerFit {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Target sprite height as a fraction of the surface height.
    pub height_ratio: f64,
}

impl LinerFit {
    pub fn for_style(style: &str) -> Self {
        if style == "lashed" {
            // Sits higher so the drawn lashes clear the lid.
            Self {
                offset_x: 12.0,
                offset_y: -18.0,
                height_ratio: 0.04,
            }
        } else {
            Self {
                offset_x: 10.0,
                offset_y: -15.0,
                height_ratio: 0.03,
            }
        }
    }
}

impl MakeupLayer for Eyeliner {
    fn kind(&self) -> MakeupType {
        MakeupType::Eyeliner
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0, 0, 0),
            pattern: "normal".to_string(),
            intensity: 0.8,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["normal", "lashed"]
    }

    fn intensity_range(&self) -> RangeInclusive<f64> {
        0.1..=1.0
    }

    fn transparency_scale(&self) -> f64 {
        3.0
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
        let Some((w, h)) = surface_size(canvas, MakeupType::Eyeliner) else {
            return Ok(());
        };
        let Some(pair) = cx.sprites.request(MakeupType::Eyeliner, &style.pattern) else {
            return Ok(());
        };
        let fit = LinerFit::for_style(&style.pattern);

        canvas.save();
        canvas.set_global_alpha(style.intensity);
        for (indices, image, left) in [
            (&LEFT_LINE, &pair.left, true),
            (&RIGHT_LINE, &pair.right, false),
        ] {
            let side = if left { -1.0 } else { 1.0 };
            let first = face.px(indices[0], w, h)?;
            let last = face.px(indices[indices.len() - 1], w, h)?;
            let span = SpriteSpan {
                start: Point::new(first.x + side * fit.offset_x, first.y + fit.offset_y),
                end: Point::new(last.x + side * 20.0, last.y - 5.0),
            };
            draw_liner(canvas, image, span, h * fit.height_ratio, style.color, left)?;
        }
        canvas.restore();
        Ok(())
    }
}

// Fits the sprite inside `length x target_height`, keeping its aspect ratio.
fn draw_liner(
    canvas: &mut Canvas,
    image: &Pixmap,
    span: SpriteSpan,
    target_height: f64,
    color: HexColor,
    left: bool,
) -> MakeoverResult<()> {
    let len = span.length();
    if len <= 0.0 {
        return Ok(());
    }
    let tinted = tint(image, image.width(), image.height(), color)?;
    let (iw, ih) = (f64::from(tinted.width()), f64::from(tinted.height()));
    let s = (len / iw).min(target_height / ih);

    canvas.save();
    canvas.translate(span.start.x, span.start.y);
    canvas.rotate(span.angle());
    if left {
        canvas.scale(-1.0, -1.0);
    }
    let x = if left { -iw * s } else { 0.0 };
    let y = -(ih * s) / 2.0;
    canvas.draw_pixmap(&tinted, Rect::new(x, y, x + iw * s, y + ih * s));
    canvas.restore();
    Ok(())
}
