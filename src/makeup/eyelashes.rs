//! Lash sprites laid along the upper lid.

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

const LEFT_LID: [usize; 8] = [173, 157, 158, 159, 160, 161, 246, 33];
const RIGHT_LID: [usize; 8] = [398, 384, 385, 386, 387, 388, 466, 263];

#[derive(Clone, Copy, Debug, Default)]
pub struct Eyelashes;

impl MakeupLayer for Eyelashes {
    fn kind(&self) -> MakeupType {
        MakeupType::Eyelashes
    }

    fn default_style(&self, _profile: &EngineProfile) -> Style {
        Style {
            color: HexColor::rgb(0, 0, 0),
            pattern: "long-lash".to_string(),
            intensity: 0.8,
            thickness: 1.0,
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        &["long-lash", "volume-boost"]
    }

    fn intensity_range(&self) -> RangeInclusive<f64> {
        0.1..=1.0
    }

    fn transparency_scale(&self) -> f64 {
        2.0
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
        let Some((w, h)) = surface_size(canvas, MakeupType::Eyelashes) else {
            return Ok(());
        };
        let Some(pair) = cx.sprites.request(MakeupType::Eyelashes, &style.pattern) else {
            return Ok(());
        };

        canvas.save();
        canvas.set_global_alpha(style.intensity);
        for (indices, image, left) in [
            (&LEFT_LID, &pair.left, true),
            (&RIGHT_LID, &pair.right, false),
        ] {
            let first = face.px(indices[0], w, h)?;
            let last = face.px(indices[indices.len() - 1], w, h)?;
            let reach = if left { -25.0 } else { 25.0 };
            let span = SpriteSpan {
                start: Point::new(first.x, first.y - 2.0),
                end: Point::new(last.x + reach, last.y - 7.0),
            };
            draw_lashes(canvas, image, span, style.color, left)?;
        }
        canvas.restore();
        Ok(())
    }
}

fn draw_lashes(
    canvas: &mut Canvas,
    image: &Pixmap,
    span: SpriteSpan,
    color: HexColor,
    left: bool,
) -> MakeoverResult<()> {
    let len = span.length();
    if len <= 0.0 {
        return Ok(());
    }
    let tinted = tint(image, SpriteSpan::ceil_px(len), image.height(), color)?;
    let (tw, th) = (f64::from(tinted.width()), f64::from(tinted.height()));

    canvas.save();
    canvas.translate(span.start.x, span.start.y);
    canvas.rotate(span.angle());
    if left {
        canvas.scale(-1.0, -1.0);
    }
    let x = if left { -tw } else { 0.0 };
    let y = -th / 2.0 - 5.0;
    canvas.draw_pixmap(&tinted, Rect::new(x, y, x + tw, y + th));
    canvas.restore();
    Ok(())
}
