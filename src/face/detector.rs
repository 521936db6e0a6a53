use std::path::Path;

use anyhow::Context;

use crate::face::landmarks::LandmarkSet;
use crate::foundation::error::MakeoverResult;
use crate::raster::pixmap::Pixmap;

/// Face-landmark source consumed by the camera and still-image pipelines.
///
/// `Ok(None)` means "no face" and is an expected outcome, not an error.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &Pixmap) -> MakeoverResult<Option<LandmarkSet>>;

    /// Stops delivering results; called when the owning pipeline is torn down.
    fn stop(&mut self) {}
}

/// Detector returning a fixed answer, for offline rendering and fixtures.
#[derive(Clone, Debug, Default)]
pub struct StaticDetector {
    landmarks: Option<LandmarkSet>,
    calls: usize,
    stopped: bool,
}

impl StaticDetector {
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self {
            landmarks: Some(landmarks),
            ..Self::default()
        }
    }

    /// A detector that never finds a face.
    pub fn no_face() -> Self {
        Self::default()
    }

    /// Loads a JSON array of `{x, y[, z]}` points.
    pub fn from_json_file(path: &Path) -> MakeoverResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read landmarks from {}", path.display()))?;
        Ok(Self::new(LandmarkSet::from_json(&text)?))
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl LandmarkDetector for StaticDetector {
    fn detect(&mut self, _frame: &Pixmap) -> MakeoverResult<Option<LandmarkSet>> {
        self.calls += 1;
        if self.stopped {
            return Ok(None);
        }
        Ok(self.landmarks.clone())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
