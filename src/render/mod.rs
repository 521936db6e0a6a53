//! Frame compositing: engine tuning, skin smoothing, the camera pipeline and the
//! ambient-light check.

use crate::comparison::ComparisonController;
use crate::dispatch::MakeupStudio;
use crate::entitlements::FeatureManager;

pub mod light;
pub mod orchestrator;
pub mod profile;
pub mod skin;

/// Shared state a render pass reads: styles and sprites (through the studio),
/// entitlements and the split view.
pub struct RenderContext<'a> {
    pub studio: &'a mut MakeupStudio,
    pub features: &'a FeatureManager,
    pub comparison: Option<&'a ComparisonController>,
}

impl RenderContext<'_> {
    /// True when the split view is on.
    pub fn comparing(&self) -> bool {
        self.comparison.is_some_and(ComparisonController::is_active)
    }
}
