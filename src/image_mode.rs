//! Still-image try-on.
//!
//! Detection runs once per loaded image; the render loop then recomposites the image
//! and the current selection on every tick so style changes made elsewhere show up
//! without a dirty flag.

use kurbo::Rect;

use crate::face::detector::LandmarkDetector;
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::{MakeoverError, MakeoverResult};
use crate::makeup::MakeupType;
use crate::raster::canvas::Canvas;
use crate::raster::pixmap::Pixmap;
use crate::render::RenderContext;

/// Largest rectangle with the image's aspect ratio centered in the container.
pub fn letterbox(image_w: u32, image_h: u32, container_w: u32, container_h: u32) -> Rect {
    let (iw, ih) = (f64::from(image_w), f64::from(image_h));
    let (cw, ch) = (f64::from(container_w), f64::from(container_h));
    if iw <= 0.0 || ih <= 0.0 || cw <= 0.0 || ch <= 0.0 {
        return Rect::ZERO;
    }
    let image_ratio = iw / ih;
    let (w, h) = if cw / ch > image_ratio {
        (ch * image_ratio, ch)
    } else {
        (cw, cw / image_ratio)
    };
    let x = (cw - w) / 2.0;
    let y = (ch - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Owns the output surface in image mode.
#[derive(Debug)]
pub struct ImageModeManager {
    canvas: Canvas,
    container: (u32, u32),
    image: Option<Pixmap>,
    landmarks: Option<LandmarkSet>,
    selection: Option<MakeupType>,
    processing: bool,
    looping: bool,
}

impl ImageModeManager {
    /// Takes over `canvas`, sized to the container. The render loop starts enabled.
    pub fn new(mut canvas: Canvas, container_w: u32, container_h: u32) -> MakeoverResult<Self> {
        canvas.resize(container_w, container_h)?;
        canvas.clear();
        Ok(Self {
            canvas,
            container: (container_w, container_h),
            image: None,
            landmarks: None,
            selection: None,
            processing: false,
            looping: true,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn container(&self) -> (u32, u32) {
        self.container
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_face(&self) -> bool {
        self.landmarks.is_some()
    }

    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.landmarks.as_ref()
    }

    /// Makeup type shown on the image, if any.
    pub fn selection(&self) -> Option<MakeupType> {
        self.selection
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Marks a load as in flight. Until it finishes, [`update_makeup`] is ignored
    /// and the previous landmarks are dropped.
    ///
    /// [`update_makeup`]: Self::update_makeup
    pub fn begin_load(&mut self) {
        self.processing = true;
        self.landmarks = None;
    }

    /// Draws `image` letterboxed into the container, runs `detector` on the result
    /// and, when a face is found, composites the current selection. Returns `false`
    /// when no face was detected or anything went wrong; never fails.
    #[tracing::instrument(skip_all, fields(w = image.width(), h = image.height()))]
    pub fn finish_load(
        &mut self,
        image: Pixmap,
        detector: &mut dyn LandmarkDetector,
        cx: &mut RenderContext<'_>,
    ) -> bool {
        let found = self.place_and_detect(image, detector);
        self.processing = false;
        match found {
            Ok(true) => {
                self.compose(cx);
                true
            }
            Ok(false) => {
                tracing::warn!("no face detected in the image");
                false
            }
            Err(err) => {
                tracing::error!(%err, "image processing failed");
                false
            }
        }
    }

    /// [`begin_load`](Self::begin_load) followed by [`finish_load`](Self::finish_load).
    pub fn load_image(
        &mut self,
        image: Pixmap,
        detector: &mut dyn LandmarkDetector,
        cx: &mut RenderContext<'_>,
    ) -> bool {
        self.begin_load();
        self.finish_load(image, detector, cx)
    }

    fn place_and_detect(
        &mut self,
        image: Pixmap,
        detector: &mut dyn LandmarkDetector,
    ) -> MakeoverResult<bool> {
        if image.is_empty() {
            return Err(MakeoverError::validation("image has no pixels"));
        }
        let (cw, ch) = self.container;
        self.canvas.resize(cw, ch)?;
        self.canvas.clear();
        self.canvas
            .draw_pixmap(&image, letterbox(image.width(), image.height(), cw, ch));
        self.image = Some(image);

        let landmarks = detector.detect(&self.canvas.snapshot())?;
        let found = landmarks.is_some();
        self.landmarks = landmarks;
        Ok(found)
    }

    /// Stores the selection and redraws. `None` keeps the previous pattern or
    /// transparency. Ignored while a load is in flight.
    pub fn update_makeup(
        &mut self,
        kind: MakeupType,
        color: HexColor,
        pattern: Option<&str>,
        transparency: Option<f64>,
        cx: &mut RenderContext<'_>,
    ) -> bool {
        if self.processing {
            tracing::debug!(%kind, "makeup update ignored during image load");
            return false;
        }
        self.selection = Some(kind);
        cx.studio.set_color(kind, color);
        if let Some(pattern) = pattern {
            cx.studio.set_pattern(kind, pattern);
        }
        if let Some(value) = transparency {
            cx.studio.set_transparency(kind, value);
        }
        self.compose(cx);
        true
    }

    /// Redraws the image and the current makeup, honoring the split view. Returns
    /// whether anything was drawn.
    pub fn compose(&mut self, cx: &mut RenderContext<'_>) -> bool {
        let (Some(image), Some(face)) = (self.image.as_ref(), self.landmarks.as_ref()) else {
            return false;
        };
        let (cw, ch) = self.container;
        let canvas = &mut self.canvas;
        canvas.clear();
        canvas.draw_pixmap(image, letterbox(image.width(), image.height(), cw, ch));

        let Some(kind) = self.selection else {
            return true;
        };
        if cx.comparing() {
            let clip = cx
                .comparison
                .and_then(|c| c.clip_region(f64::from(cw), f64::from(ch)));
            if let Some(clip) = clip {
                canvas.save();
                canvas.clip_rect(clip);
                cx.studio.apply_makeup(face, canvas, kind, cx.features);
                canvas.restore();
            }
        } else {
            cx.studio.apply_makeup(face, canvas, kind, cx.features);
        }
        true
    }

    /// One animation-frame step of the render loop.
    pub fn tick(&mut self, cx: &mut RenderContext<'_>) -> bool {
        if !self.looping {
            return false;
        }
        cx.studio.poll_sprites();
        self.compose(cx)
    }

    pub fn start_render_loop(&mut self) {
        self.looping = true;
    }

    pub fn stop_render_loop(&mut self) {
        self.looping = false;
    }

    /// Shows the bare image again and forgets the selection.
    pub fn reset_image(&mut self) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        let (cw, ch) = self.container;
        self.canvas.clear();
        self.canvas
            .draw_pixmap(image, letterbox(image.width(), image.height(), cw, ch));
        self.selection = None;
    }

    /// Current surface as PNG.
    pub fn png_bytes(&self) -> MakeoverResult<Vec<u8>> {
        self.canvas.pixmap().encode_png()
    }

    /// Stops the loop and drops the image and landmarks.
    pub fn destroy(&mut self) {
        self.stop_render_loop();
        self.image = None;
        self.landmarks = None;
        self.canvas.clear();
    }
}

#[cfg(test)]
#[path = "../tests/unit/image_mode.rs"]
mod tests;
