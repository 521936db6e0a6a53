//! Camera-mode frame pipeline.
//!
//! [`RenderManager`] composites one frame (base image, skin smoothing, makeup,
//! split view). [`CameraPipeline`] pumps frames through the landmark detector, the
//! renderer and the light monitor.

use kurbo::Rect;

use crate::face::detector::LandmarkDetector;
use crate::face::landmarks::LandmarkSet;
use crate::foundation::error::MakeoverResult;
use crate::makeup::MakeupType;
use crate::raster::canvas::Canvas;
use crate::raster::filter::Filter;
use crate::raster::pixmap::Pixmap;
use crate::render::RenderContext;
use crate::render::light::{LightEvent, LightMonitor};
use crate::render::skin::SkinSmoothing;

/// Owns the output surface in camera mode.
#[derive(Debug)]
pub struct RenderManager {
    canvas: Canvas,
}

impl RenderManager {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Hands the surface to the next owner.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Renders one frame. Without landmarks the surface is only cleared. Any
    /// failure is logged and reported as `false`; the frame loop keeps going.
    #[tracing::instrument(skip_all, fields(kind = %kind))]
    pub fn render(
        &mut self,
        frame: &Pixmap,
        face: Option<&LandmarkSet>,
        kind: MakeupType,
        cx: &mut RenderContext<'_>,
    ) -> bool {
        match self.try_render(frame, face, kind, cx) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%err, "render failed");
                false
            }
        }
    }

    /// Shows the raw frame, used while no face is in view.
    pub fn show_frame(&mut self, frame: &Pixmap) -> bool {
        let result = self.prepare(frame).map(|full| {
            self.canvas.draw_pixmap(frame, full);
        });
        if let Err(err) = &result {
            tracing::error!(%err, "frame passthrough failed");
        }
        result.is_ok()
    }

    // Matches the surface to the frame and clears it.
    fn prepare(&mut self, frame: &Pixmap) -> MakeoverResult<Rect> {
        self.canvas.resize(frame.width(), frame.height())?;
        self.canvas.clear();
        Ok(Rect::new(
            0.0,
            0.0,
            f64::from(frame.width()),
            f64::from(frame.height()),
        ))
    }

    fn try_render(
        &mut self,
        frame: &Pixmap,
        face: Option<&LandmarkSet>,
        kind: MakeupType,
        cx: &mut RenderContext<'_>,
    ) -> MakeoverResult<()> {
        let full = self.prepare(frame)?;
        let Some(face) = face else {
            return Ok(());
        };
        let profile = cx.studio.profile().clone();
        let skin = SkinSmoothing::for_profile(&profile);
        let canvas = &mut self.canvas;

        canvas.save();
        if !cx.comparing() {
            canvas.set_filter(profile.base_filter());
            canvas.draw_pixmap(frame, full);
            canvas.set_filter(Filter::none());
            skin.apply(canvas);
            cx.studio.apply_makeup(face, canvas, kind, cx.features);
        } else {
            // Untouched "before" everywhere, then the made-up side inside the clip.
            canvas.set_filter(Filter::none());
            canvas.draw_pixmap(frame, full);
            let clip = cx
                .comparison
                .and_then(|c| c.clip_region(full.width(), full.height()));
            if let Some(clip) = clip {
                canvas.save();
                canvas.clip_rect(clip);
                canvas.set_filter(profile.base_filter());
                canvas.draw_pixmap(frame, full);
                canvas.set_filter(Filter::none());
                skin.apply(canvas);
                cx.studio.apply_makeup(face, canvas, kind, cx.features);
                canvas.restore();
            }
        }
        canvas.restore();
        Ok(())
    }
}

/// What happened to one camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOutcome {
    pub face_detected: bool,
    pub rendered: bool,
    pub light: Option<LightEvent>,
}

/// Detector, renderer and light monitor for the live camera mode.
pub struct CameraPipeline {
    detector: Box<dyn LandmarkDetector>,
    renderer: RenderManager,
    light: LightMonitor,
    last_face: bool,
}

impl std::fmt::Debug for CameraPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraPipeline")
            .field("renderer", &self.renderer)
            .field("light", &self.light)
            .field("last_face", &self.last_face)
            .finish()
    }
}

impl CameraPipeline {
    pub fn new(detector: Box<dyn LandmarkDetector>, canvas: Canvas) -> Self {
        Self {
            detector,
            renderer: RenderManager::new(canvas),
            light: LightMonitor::new(),
            last_face: false,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        self.renderer.canvas()
    }

    pub fn light(&self) -> &LightMonitor {
        &self.light
    }

    /// Whether the last processed frame contained a face.
    pub fn face_visible(&self) -> bool {
        self.last_face
    }

    /// Runs one frame: detect, render (or show the raw frame when no face is
    /// found), then feed the light monitor.
    pub fn process(
        &mut self,
        frame: &Pixmap,
        kind: MakeupType,
        now_ms: f64,
        cx: &mut RenderContext<'_>,
    ) -> FrameOutcome {
        let face = match self.detector.detect(frame) {
            Ok(face) => face,
            Err(err) => {
                tracing::warn!(%err, "landmark detection failed");
                None
            }
        };
        if face.is_none() && self.last_face {
            tracing::debug!("face lost");
        }
        self.last_face = face.is_some();

        cx.studio.set_clock_ms(now_ms);
        cx.studio.poll_sprites();
        let rendered = match &face {
            Some(face) => self.renderer.render(frame, Some(face), kind, cx),
            None => self.renderer.show_frame(frame),
        };
        let light = self.light.observe(frame, now_ms);
        FrameOutcome {
            face_detected: face.is_some(),
            rendered,
            light,
        }
    }

    /// Stops the detector and returns the surface for the next mode.
    pub fn shutdown(mut self) -> Canvas {
        self.detector.stop();
        self.renderer.into_canvas()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrator.rs"]
mod tests;
