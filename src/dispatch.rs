//! The makeup facade: style mutation by type and the gated `apply_makeup` entry.

use std::sync::Arc;

use crate::entitlements::FeatureManager;
use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::math::FrameRng;
use crate::makeup::sprites::{SpriteCache, SpriteLoader};
use crate::makeup::{LayerContext, MakeupType, Style, StyleRegistry};
use crate::raster::canvas::Canvas;
use crate::render::profile::EngineProfile;

/// Owns everything a layer reads while drawing: styles, sprites, the engine
/// profile and the per-frame randomness.
#[derive(Debug)]
pub struct MakeupStudio {
    styles: StyleRegistry,
    sprites: SpriteCache,
    profile: EngineProfile,
    seed: u64,
    frame: u64,
    clock_ms: f64,
}

impl MakeupStudio {
    pub fn new(profile: EngineProfile, sprites: SpriteCache) -> Self {
        Self {
            styles: StyleRegistry::new(&profile),
            sprites,
            profile,
            seed: 0,
            frame: 0,
            clock_ms: 0.0,
        }
    }

    /// Studio whose sprites load in the background from `loader`.
    pub fn with_loader(profile: EngineProfile, loader: Arc<dyn SpriteLoader>) -> Self {
        Self::new(profile, SpriteCache::new(loader))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn style(&self, kind: MakeupType) -> &Style {
        self.styles.get(kind)
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    /// Wall clock handed to time-based effects on the next draw.
    pub fn set_clock_ms(&mut self, ms: f64) {
        if ms.is_finite() {
            self.clock_ms = ms;
        }
    }

    pub fn set_color(&mut self, kind: MakeupType, color: HexColor) {
        self.styles.set_color(kind, color);
    }

    /// Stores the pattern if the layer knows it and warms the sprite cache for
    /// sprite-driven layers. Unknown patterns change nothing and load nothing.
    pub fn set_pattern(&mut self, kind: MakeupType, pattern: &str) -> bool {
        if !self.styles.set_pattern(kind, pattern) {
            return false;
        }
        if kind.layer().uses_sprites() {
            self.sprites.prefetch(kind, pattern);
        }
        true
    }

    pub fn set_transparency(&mut self, kind: MakeupType, value: f64) -> bool {
        self.styles.set_transparency(kind, value)
    }

    /// Brow weight in `[0.1, 1]`; other layers reject it.
    pub fn set_thickness(&mut self, kind: MakeupType, value: f64) -> bool {
        self.styles.set_thickness(kind, value)
    }

    /// String-keyed variant of [`set_color`](Self::set_color). Unknown types and
    /// malformed colors are ignored.
    pub fn set_color_named(&mut self, kind: &str, color: &str) -> bool {
        let Ok(kind) = kind.parse::<MakeupType>() else {
            return false;
        };
        match HexColor::parse(color) {
            Ok(c) => {
                self.set_color(kind, c);
                true
            }
            Err(err) => {
                tracing::warn!(%kind, %err, "color ignored");
                false
            }
        }
    }

    pub fn set_pattern_named(&mut self, kind: &str, pattern: &str) -> bool {
        kind.parse::<MakeupType>()
            .is_ok_and(|kind| self.set_pattern(kind, pattern))
    }

    pub fn set_transparency_named(&mut self, kind: &str, value: f64) -> bool {
        kind.parse::<MakeupType>()
            .is_ok_and(|kind| self.set_transparency(kind, value))
    }

    pub fn set_thickness_named(&mut self, kind: &str, value: f64) -> bool {
        kind.parse::<MakeupType>()
            .is_ok_and(|kind| self.set_thickness(kind, value))
    }

    /// Collects finished sprite loads. True when at least one became usable, which
    /// callers treat as a cue to redraw.
    pub fn poll_sprites(&mut self) -> bool {
        !self.sprites.poll().is_empty()
    }

    /// Draws `kind` if `features` enables it. A disabled type touches nothing.
    /// Layer failures are logged and dropped.
    pub fn apply_makeup(
        &mut self,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        kind: MakeupType,
        features: &FeatureManager,
    ) {
        if !features.is_enabled(kind) {
            return;
        }
        self.frame = self.frame.wrapping_add(1);
        let style = self.styles.get(kind).clone();
        let mut cx = LayerContext {
            sprites: &mut self.sprites,
            profile: &self.profile,
            clock_ms: self.clock_ms,
            rng: FrameRng::new(self.seed).fork(self.frame),
        };
        if let Err(err) = kind.layer().apply(&style, face, canvas, &mut cx) {
            tracing::warn!(%kind, %err, "makeup layer failed");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/dispatch.rs"]
mod tests;
