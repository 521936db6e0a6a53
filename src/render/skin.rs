//! Skin smoothing: a soft-light glow centered on the frame plus a faint warm
//! `color` wash.

use kurbo::{Point, Rect};

use crate::foundation::core::Rgba;
use crate::raster::blend::CompositeOp;
use crate::raster::canvas::Canvas;
use crate::raster::paint::Paint;
use crate::render::profile::EngineProfile;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinSmoothing {
    glow: [Rgba; 3],
    wash: Rgba,
}

impl SkinSmoothing {
    pub fn for_profile(profile: &EngineProfile) -> Self {
        if profile.is_safari() {
            Self {
                glow: [
                    Rgba::new(255, 255, 255, 0.15),
                    Rgba::new(255, 253, 250, 0.1),
                    Rgba::new(255, 253, 250, 0.0),
                ],
                wash: Rgba::new(255, 243, 235, 0.03),
            }
        } else {
            Self {
                glow: [
                    Rgba::new(255, 255, 255, 0.25),
                    Rgba::new(255, 253, 250, 0.15),
                    Rgba::new(255, 253, 250, 0.0),
                ],
                wash: Rgba::new(255, 248, 242, 0.04),
            }
        }
    }

    /// Composites over the whole surface and leaves the operator at source-over.
    pub fn apply(&self, canvas: &mut Canvas) {
        if canvas.is_degenerate() {
            return;
        }
        let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
        let full = Rect::new(0.0, 0.0, w, h);

        canvas.set_composite_op(CompositeOp::SoftLight);
        let glow = Paint::radial_centered(Point::new(w / 2.0, h / 2.0), h * 0.2, h * 0.7)
            .with_stop(0.0, self.glow[0])
            .with_stop(0.5, self.glow[1])
            .with_stop(1.0, self.glow[2]);
        canvas.fill_rect(full, &glow);

        canvas.set_composite_op(CompositeOp::Color);
        canvas.fill_rect(full, &Paint::from(self.wash));

        canvas.set_composite_op(CompositeOp::SourceOver);
    }
}
