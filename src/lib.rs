#![forbid(unsafe_code)]
//! Face makeup try-on engine.
//!
//! Landmarks from an external face tracker drive ten cosmetic layers drawn onto an
//! in-crate raster canvas, either frame by frame from a camera or once per still
//! image. [`MakeupSession`] is the usual entry point; [`MakeupStudio`] is the
//! lower-level dispatch facade.

pub mod comparison;
pub mod dispatch;
pub mod entitlements;
pub mod face;
pub mod foundation;
pub mod image_mode;
pub mod makeup;
pub mod raster;
pub mod render;
pub mod session;
pub mod texture;

pub use comparison::{ComparisonController, ContainerBounds};
pub use dispatch::MakeupStudio;
pub use entitlements::{EntitlementPayload, FeatureManager};
pub use face::detector::{LandmarkDetector, StaticDetector};
pub use face::landmarks::{Landmark, LandmarkSet};
pub use foundation::core::{HexColor, Rgba};
pub use foundation::error::{MakeoverError, MakeoverResult};
pub use foundation::math::FrameRng;
pub use image_mode::ImageModeManager;
pub use makeup::{MakeupLayer, MakeupType, Style};
pub use raster::canvas::Canvas;
pub use raster::pixmap::Pixmap;
pub use render::RenderContext;
pub use render::orchestrator::{CameraPipeline, FrameOutcome, RenderManager};
pub use render::profile::EngineProfile;
pub use session::{DetectorFactory, MakeupSession, SessionMode, SessionOptions, SessionStatus};
