//! Cosmetic layers and the per-type style state they read.
//!
//! Each of the ten [`MakeupType`]s is a unit struct implementing [`MakeupLayer`]; the
//! mutable look for every type lives in one [`StyleRegistry`] owned by the caller and
//! passed into `apply`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::HexColor;
use crate::foundation::error::{MakeoverError, MakeoverResult};
use crate::foundation::math::FrameRng;
use crate::raster::canvas::Canvas;
use crate::render::profile::EngineProfile;

pub mod blush;
pub mod brows;
pub mod concealer;
pub mod eyelashes;
pub mod eyeliner;
pub mod eyepencil;
pub mod eyeshadow;
pub mod foundation;
pub mod lens;
pub mod lips;
pub mod sprites;

use sprites::SpriteCache;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MakeupType {
    Lips,
    Eyeshadow,
    Eyepencil,
    Eyelashes,
    Blush,
    Foundation,
    Brows,
    Concealer,
    Eyeliner,
    Lens,
}

impl MakeupType {
    pub const ALL: [MakeupType; 10] = [
        MakeupType::Lips,
        MakeupType::Eyeshadow,
        MakeupType::Eyepencil,
        MakeupType::Eyelashes,
        MakeupType::Blush,
        MakeupType::Foundation,
        MakeupType::Brows,
        MakeupType::Concealer,
        MakeupType::Eyeliner,
        MakeupType::Lens,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MakeupType::Lips => "lips",
            MakeupType::Eyeshadow => "eyeshadow",
            MakeupType::Eyepencil => "eyepencil",
            MakeupType::Eyelashes => "eyelashes",
            MakeupType::Blush => "blush",
            MakeupType::Foundation => "foundation",
            MakeupType::Brows => "brows",
            MakeupType::Concealer => "concealer",
            MakeupType::Eyeliner => "eyeliner",
            MakeupType::Lens => "lens",
        }
    }

    /// The drawing implementation for this type.
    pub fn layer(self) -> &'static dyn MakeupLayer {
        match self {
            MakeupType::Lips => &lips::Lips,
            MakeupType::Eyeshadow => &eyeshadow::Eyeshadow,
            MakeupType::Eyepencil => &eyepencil::Eyepencil,
            MakeupType::Eyelashes => &eyelashes::Eyelashes,
            MakeupType::Blush => &blush::Blush,
            MakeupType::Foundation => &foundation::Foundation,
            MakeupType::Brows => &brows::Brows,
            MakeupType::Concealer => &concealer::Concealer,
            MakeupType::Eyeliner => &eyeliner::Eyeliner,
            MakeupType::Lens => &lens::Lens,
        }
    }
}

impl fmt::Display for MakeupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MakeupType {
    type Err = MakeoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MakeupType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| MakeoverError::validation(format!("unknown makeup type '{s}'")))
    }
}

/// Current look for one makeup type.
///
/// `intensity` is the layer's main knob: opacity for most layers, stroke or sprite
/// thickness for eyepencil, eyelashes and eyeliner.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub color: HexColor,
    pub pattern: String,
    pub intensity: f64,
    /// Secondary weight multiplied into the layer alpha. Only layers with a
    /// [`thickness_range`](MakeupLayer::thickness_range) read it.
    #[serde(default = "full_weight")]
    pub thickness: f64,
}

fn full_weight() -> f64 {
    1.0
}

/// Per-frame services handed to a layer.
pub struct LayerContext<'a> {
    pub sprites: &'a mut SpriteCache,
    pub profile: &'a EngineProfile,
    /// Wall-clock milliseconds, drives time-based effects such as glitter blink.
    pub clock_ms: f64,
    pub rng: FrameRng,
}

/// One cosmetic layer: its style contract plus the drawing routine.
pub trait MakeupLayer: Send + Sync {
    fn kind(&self) -> MakeupType;

    fn default_style(&self, profile: &EngineProfile) -> Style;

    /// Accepted pattern or style names; the first is the default.
    fn patterns(&self) -> &'static [&'static str];

    fn intensity_range(&self) -> RangeInclusive<f64> {
        0.0..=1.0
    }

    /// Factor applied to the universal transparency knob before clamping.
    fn transparency_scale(&self) -> f64 {
        1.0
    }

    /// Accepted thickness values, `None` when the layer has no thickness knob.
    fn thickness_range(&self) -> Option<RangeInclusive<f64>> {
        None
    }

    /// Whether the layer draws from a left/right sprite pair.
    fn uses_sprites(&self) -> bool {
        false
    }

    /// Draws the layer. Degenerate surfaces and pending sprites are silent no-ops.
    fn apply(
        &self,
        style: &Style,
        face: &LandmarkSet,
        canvas: &mut Canvas,
        cx: &mut LayerContext<'_>,
    ) -> MakeoverResult<()>;
}

/// Style state for all ten types, created from each layer's defaults.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
    styles: BTreeMap<MakeupType, Style>,
}

impl StyleRegistry {
    pub fn new(profile: &EngineProfile) -> Self {
        let styles = MakeupType::ALL
            .into_iter()
            .map(|t| (t, t.layer().default_style(profile)))
            .collect();
        Self { styles }
    }

    pub fn get(&self, kind: MakeupType) -> &Style {
        // Every type is inserted at construction.
        &self.styles[&kind]
    }

    pub fn set_color(&mut self, kind: MakeupType, color: HexColor) {
        if let Some(style) = self.styles.get_mut(&kind) {
            style.color = color;
        }
    }

    /// Stores `pattern` if the layer knows it. Unknown names leave the style untouched.
    pub fn set_pattern(&mut self, kind: MakeupType, pattern: &str) -> bool {
        if !kind.layer().patterns().contains(&pattern) {
            tracing::warn!(%kind, pattern, "unknown pattern ignored");
            return false;
        }
        if let Some(style) = self.styles.get_mut(&kind) {
            style.pattern = pattern.to_string();
        }
        true
    }

    /// Clamps into the layer's range; non-finite input is ignored.
    pub fn set_intensity(&mut self, kind: MakeupType, value: f64) -> bool {
        if !value.is_finite() {
            tracing::warn!(%kind, value, "non-finite intensity ignored");
            return false;
        }
        let range = kind.layer().intensity_range();
        if let Some(style) = self.styles.get_mut(&kind) {
            style.intensity = value.clamp(*range.start(), *range.end());
        }
        true
    }

    /// Clamps into the layer's thickness range. Layers without one and non-finite
    /// input are ignored.
    pub fn set_thickness(&mut self, kind: MakeupType, value: f64) -> bool {
        let Some(range) = kind.layer().thickness_range() else {
            tracing::warn!(%kind, "layer has no thickness setting");
            return false;
        };
        if !value.is_finite() {
            tracing::warn!(%kind, value, "non-finite thickness ignored");
            return false;
        }
        if let Some(style) = self.styles.get_mut(&kind) {
            style.thickness = value.clamp(*range.start(), *range.end());
        }
        true
    }

    /// Applies the universal transparency knob after the layer's remap.
    pub fn set_transparency(&mut self, kind: MakeupType, value: f64) -> bool {
        self.set_intensity(kind, value * kind.layer().transparency_scale())
    }
}

/// Bails out of `apply` on a zero-sized surface.
pub(crate) fn surface_size(canvas: &Canvas, kind: MakeupType) -> Option<(f64, f64)> {
    if canvas.is_degenerate() {
        tracing::warn!(%kind, "invalid canvas dimensions");
        return None;
    }
    Some((f64::from(canvas.width()), f64::from(canvas.height())))
}

#[cfg(test)]
#[path = "../../tests/unit/makeup/mod.rs"]
mod tests;
