//! Top-level try-on session: entitlements, style selection and the camera/image
//! mode switch.
//!
//! Exactly one mode owns the output canvas at a time. Switching tears the old mode
//! down (detector stopped, render loop halted) before the canvas moves to the new
//! one.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::comparison::{ComparisonController, ContainerBounds};
use crate::dispatch::MakeupStudio;
use crate::entitlements::{EntitlementPayload, FeatureManager};
use crate::face::detector::LandmarkDetector;
use crate::foundation::core::HexColor;
use crate::foundation::error::{MakeoverError, MakeoverResult};
use crate::image_mode::ImageModeManager;
use crate::makeup::MakeupType;
use crate::makeup::sprites::{FsSpriteLoader, MemorySpriteLoader, SpriteCache, SpriteLoader};
use crate::raster::canvas::Canvas;
use crate::raster::pixmap::Pixmap;
use crate::render::RenderContext;
use crate::render::orchestrator::{CameraPipeline, FrameOutcome};
use crate::render::profile::EngineProfile;

/// Builds a fresh detector each time a camera starts or an image is loaded.
pub type DetectorFactory = Box<dyn FnMut() -> Box<dyn LandmarkDetector> + Send>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Camera,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Initializing,
    Loading,
    Ready,
    Error,
    Paused,
    Cleanup,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::Loading => "loading",
            SessionStatus::Ready => "ready",
            SessionStatus::Error => "error",
            SessionStatus::Paused => "paused",
            SessionStatus::Cleanup => "cleanup",
        };
        f.write_str(s)
    }
}

/// Session configuration, usually read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub user_agent: String,
    /// Sprite directory; the built-in procedural sprites are used when unset.
    pub assets_dir: Option<PathBuf>,
    /// Load sprites on the calling thread instead of in the background.
    pub blocking_sprites: bool,
    pub mode: SessionMode,
    pub initial_type: String,
    pub initial_color: String,
    pub initial_transparency: Option<f64>,
    pub container_width: u32,
    pub container_height: u32,
    pub seed: u64,
    pub entitlements: Option<EntitlementPayload>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            assets_dir: None,
            blocking_sprites: false,
            mode: SessionMode::Camera,
            initial_type: MakeupType::Lips.name().to_string(),
            initial_color: "#FF0000".to_string(),
            initial_transparency: None,
            container_width: 640,
            container_height: 480,
            seed: 0,
            entitlements: None,
        }
    }
}

impl SessionOptions {
    pub fn from_path(path: impl AsRef<Path>) -> MakeoverResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MakeoverError::validation(format!("open session options '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| MakeoverError::validation(format!("parse session options JSON: {e}")))
    }
}

enum ModeState {
    Camera(CameraPipeline),
    Image(ImageModeManager),
}

/// Snapshot of session state for diagnostics.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TechnicalInfo {
    pub status: SessionStatus,
    pub mode: SessionMode,
    pub current_type: MakeupType,
    pub enabled_features: Vec<MakeupType>,
    pub user_agent: String,
    pub resolution: Option<(u32, u32)>,
}

pub struct MakeupSession {
    status: SessionStatus,
    mode: SessionMode,
    state: Option<ModeState>,
    studio: MakeupStudio,
    features: FeatureManager,
    comparison: ComparisonController,
    detectors: DetectorFactory,
    user_agent: String,
    container: (u32, u32),
    current_type: MakeupType,
    current_color: HexColor,
    pattern: Option<String>,
    transparency: Option<f64>,
}

impl fmt::Debug for MakeupSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MakeupSession")
            .field("status", &self.status)
            .field("mode", &self.mode)
            .field("current_type", &self.current_type)
            .field("current_color", &self.current_color)
            .field("pattern", &self.pattern)
            .field("transparency", &self.transparency)
            .finish_non_exhaustive()
    }
}

impl MakeupSession {
    /// Builds the session and starts the configured mode.
    #[tracing::instrument(skip_all, fields(mode = ?options.mode))]
    pub fn new(options: SessionOptions, detectors: DetectorFactory) -> MakeoverResult<Self> {
        let features = FeatureManager::new(options.entitlements.clone());
        let profile = EngineProfile::from_user_agent(&options.user_agent);
        let loader: Arc<dyn SpriteLoader> = match &options.assets_dir {
            Some(dir) => Arc::new(FsSpriteLoader::new(dir)),
            None => Arc::new(MemorySpriteLoader::builtin()?),
        };
        let sprites = if options.blocking_sprites {
            SpriteCache::blocking(loader)
        } else {
            SpriteCache::new(loader)
        };
        let studio = MakeupStudio::new(profile, sprites).with_seed(options.seed);
        let current_color = options.initial_color.parse::<HexColor>()?;
        if let Some(t) = options.initial_transparency
            && !(0.0..=1.0).contains(&t)
        {
            return Err(MakeoverError::validation(format!(
                "initial transparency {t} outside [0, 1]"
            )));
        }

        // Falls back to the first enabled type when the requested one is unknown or
        // not licensed.
        let requested = options.initial_type.parse::<MakeupType>().ok();
        let current_type = match requested {
            Some(kind) if features.is_enabled(kind) => kind,
            _ => {
                let fallback = features
                    .enabled_features()
                    .first()
                    .copied()
                    .unwrap_or(MakeupType::Lips);
                tracing::warn!(
                    requested = %options.initial_type,
                    %fallback,
                    "initial makeup type not enabled"
                );
                fallback
            }
        };
        let (cw, ch) = (options.container_width, options.container_height);

        let mut session = Self {
            status: SessionStatus::Initializing,
            mode: options.mode,
            state: None,
            studio,
            features,
            comparison: ComparisonController::new(ContainerBounds {
                left: 0.0,
                width: f64::from(cw),
            }),
            detectors,
            user_agent: options.user_agent,
            container: (cw, ch),
            current_type,
            current_color,
            pattern: None,
            transparency: options.initial_transparency,
        };
        session
            .init()
            .inspect_err(|err| tracing::error!(%err, "session start failed"))?;
        Ok(session)
    }

    fn init(&mut self) -> MakeoverResult<()> {
        self.status = SessionStatus::Loading;
        let result = self.start_up();
        self.status = match result {
            Ok(()) => SessionStatus::Ready,
            Err(_) => SessionStatus::Error,
        };
        result
    }

    fn start_up(&mut self) -> MakeoverResult<()> {
        let kind = self.current_type;
        if let Some(first) = self.features.allowed_patterns(kind).first() {
            self.pattern = Some(first.clone());
            self.studio.set_pattern(kind, first);
        }
        self.studio.set_color(kind, self.current_color);
        if let Some(t) = self.transparency {
            self.studio.set_transparency(kind, t);
        }
        let (cw, ch) = self.container;
        let canvas = Canvas::new(cw, ch)?;
        self.state = Some(self.enter(self.mode, canvas)?);
        Ok(())
    }

    fn enter(&mut self, mode: SessionMode, canvas: Canvas) -> MakeoverResult<ModeState> {
        Ok(match mode {
            SessionMode::Camera => ModeState::Camera(CameraPipeline::new((self.detectors)(), canvas)),
            SessionMode::Image => {
                let (cw, ch) = self.container;
                ModeState::Image(ImageModeManager::new(canvas, cw, ch)?)
            }
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn current_type(&self) -> MakeupType {
        self.current_type
    }

    pub fn current_color(&self) -> HexColor {
        self.current_color
    }

    pub fn current_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn features(&self) -> &FeatureManager {
        &self.features
    }

    pub fn studio(&self) -> &MakeupStudio {
        &self.studio
    }

    pub fn comparison(&self) -> &ComparisonController {
        &self.comparison
    }

    pub fn comparison_mut(&mut self) -> &mut ComparisonController {
        &mut self.comparison
    }

    /// The output surface, whichever mode owns it.
    pub fn canvas(&self) -> Option<&Canvas> {
        match self.state.as_ref()? {
            ModeState::Camera(pipeline) => Some(pipeline.canvas()),
            ModeState::Image(mgr) => Some(mgr.canvas()),
        }
    }

    pub fn image_mode(&self) -> Option<&ImageModeManager> {
        match self.state.as_ref()? {
            ModeState::Image(mgr) => Some(mgr),
            ModeState::Camera(_) => None,
        }
    }

    pub fn low_light_warning(&self) -> bool {
        match self.state.as_ref() {
            Some(ModeState::Camera(pipeline)) => pipeline.light().is_warning(),
            _ => false,
        }
    }

    pub fn technical_info(&self) -> TechnicalInfo {
        TechnicalInfo {
            status: self.status,
            mode: self.mode,
            current_type: self.current_type,
            enabled_features: self.features.enabled_features(),
            user_agent: self.user_agent.clone(),
            resolution: self.canvas().map(|c| (c.width(), c.height())),
        }
    }

    /// Moves the canvas to `mode`. A no-op when already there.
    #[tracing::instrument(skip(self), fields(from = ?self.mode))]
    pub fn switch_mode(&mut self, mode: SessionMode) -> MakeoverResult<()> {
        if mode == self.mode && self.state.is_some() {
            return Ok(());
        }
        self.status = SessionStatus::Paused;
        let canvas = match self.state.take() {
            Some(ModeState::Camera(pipeline)) => pipeline.shutdown(),
            Some(ModeState::Image(mut mgr)) => {
                mgr.destroy();
                mgr.into_canvas()
            }
            None => Canvas::new(self.container.0, self.container.1)?,
        };
        match self.enter(mode, canvas) {
            Ok(state) => {
                self.state = Some(state);
                self.mode = mode;
                self.status = SessionStatus::Ready;
                tracing::debug!(?mode, "mode switched");
                Ok(())
            }
            Err(err) => {
                self.status = SessionStatus::Error;
                Err(err)
            }
        }
    }

    /// Camera pump: detector, render, light check. `None` outside camera mode or
    /// while the session is not ready.
    pub fn process_frame(&mut self, frame: &Pixmap, now_ms: f64) -> Option<FrameOutcome> {
        if self.status != SessionStatus::Ready {
            return None;
        }
        let Some(ModeState::Camera(pipeline)) = self.state.as_mut() else {
            return None;
        };
        self.comparison.tick(now_ms);
        let mut cx = RenderContext {
            studio: &mut self.studio,
            features: &self.features,
            comparison: Some(&self.comparison),
        };
        Some(pipeline.process(frame, self.current_type, now_ms, &mut cx))
    }

    /// Loads a still image in image mode and applies the current selection when a
    /// face is found. `Ok(false)` means no face.
    pub fn load_image(&mut self, image: Pixmap) -> MakeoverResult<bool> {
        let Some(ModeState::Image(mgr)) = self.state.as_mut() else {
            return Err(MakeoverError::validation("load_image requires image mode"));
        };
        let mut detector = (self.detectors)();
        let mut cx = RenderContext {
            studio: &mut self.studio,
            features: &self.features,
            comparison: Some(&self.comparison),
        };
        let found = mgr.load_image(image, detector.as_mut(), &mut cx);
        detector.stop();
        if found {
            mgr.update_makeup(
                self.current_type,
                self.current_color,
                self.pattern.as_deref(),
                self.transparency,
                &mut cx,
            );
        }
        Ok(found)
    }

    /// Decodes PNG/JPEG bytes and loads them like [`load_image`](Self::load_image).
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> MakeoverResult<bool> {
        let image = Pixmap::decode(bytes)?;
        self.load_image(image)
    }

    /// One image-mode render loop step.
    pub fn tick_image(&mut self, now_ms: f64) -> bool {
        let Some(ModeState::Image(mgr)) = self.state.as_mut() else {
            return false;
        };
        self.comparison.tick(now_ms);
        let mut cx = RenderContext {
            studio: &mut self.studio,
            features: &self.features,
            comparison: Some(&self.comparison),
        };
        mgr.tick(&mut cx)
    }

    /// Selects `kind` and resets its pattern to the first allowed one. Rejected when
    /// the type is not enabled.
    pub fn change_makeup_type(&mut self, kind: MakeupType) -> bool {
        if !self.features.is_enabled(kind) {
            tracing::warn!(%kind, "makeup type not enabled for this session");
            return false;
        }
        self.current_type = kind;
        let first = self.features.allowed_patterns(kind).into_iter().next();
        self.pattern = first.clone();
        self.push_selection(first.as_deref(), None);
        true
    }

    pub fn change_makeup_color(&mut self, color: HexColor) -> bool {
        self.current_color = color;
        self.push_selection(None, None);
        true
    }

    /// Accepts only patterns the entitlements allow for the current type.
    pub fn set_makeup_pattern(&mut self, pattern: &str) -> bool {
        let kind = self.current_type;
        if !self.features.allowed_patterns(kind).iter().any(|p| p == pattern) {
            tracing::warn!(%kind, pattern, "pattern not allowed");
            return false;
        }
        self.pattern = Some(pattern.to_string());
        self.push_selection(Some(pattern), None);
        true
    }

    /// Rejects values outside `[0, 1]`; the per-layer remap happens downstream.
    pub fn set_makeup_transparency(&mut self, value: f64) -> bool {
        if !(0.0..=1.0).contains(&value) {
            tracing::warn!(value, "transparency must be within [0, 1]");
            return false;
        }
        self.transparency = Some(value);
        self.push_selection(None, Some(value));
        true
    }

    // Camera mode writes straight into the studio; image mode routes through the
    // manager so its redraw happens at once.
    fn push_selection(&mut self, pattern: Option<&str>, transparency: Option<f64>) {
        let kind = self.current_type;
        match self.state.as_mut() {
            Some(ModeState::Image(mgr)) => {
                let mut cx = RenderContext {
                    studio: &mut self.studio,
                    features: &self.features,
                    comparison: Some(&self.comparison),
                };
                mgr.update_makeup(kind, self.current_color, pattern, transparency, &mut cx);
            }
            _ => {
                self.studio.set_color(kind, self.current_color);
                if let Some(pattern) = pattern {
                    self.studio.set_pattern(kind, pattern);
                }
                if let Some(value) = transparency {
                    self.studio.set_transparency(kind, value);
                }
            }
        }
    }

    /// Releases the active mode. The session stays in `cleanup` afterwards.
    pub fn shutdown(&mut self) {
        self.status = SessionStatus::Cleanup;
        match self.state.take() {
            Some(ModeState::Camera(pipeline)) => {
                pipeline.shutdown();
            }
            Some(ModeState::Image(mut mgr)) => mgr.destroy(),
            None => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
