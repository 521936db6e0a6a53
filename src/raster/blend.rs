use std::fmt;
use std::str::FromStr;

use crate::foundation::error::MakeoverError;

/// Canvas compositing operator: Porter-Duff or separable/non-separable blend.
///
/// Names match the canvas `globalCompositeOperation` keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    #[default]
    SourceOver,
    SourceIn,
    DestinationOut,
    Lighter,
    Multiply,
    Screen,
    Overlay,
    SoftLight,
    ColorBurn,
    Color,
}

impl CompositeOp {
    pub const ALL: [CompositeOp; 10] = [
        Self::SourceOver,
        Self::SourceIn,
        Self::DestinationOut,
        Self::Lighter,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::SoftLight,
        Self::ColorBurn,
        Self::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceIn => "source-in",
            Self::DestinationOut => "destination-out",
            Self::Lighter => "lighter",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::SoftLight => "soft-light",
            Self::ColorBurn => "color-burn",
            Self::Color => "color",
        }
    }

    /// Unbounded operators also rewrite destination pixels the source does not cover.
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::SourceIn)
    }

    /// Composites premultiplied `src` onto premultiplied `dst`, channels in `[0, 1]`.
    ///
    /// Shape coverage and global alpha must already be folded into `src`.
    pub fn apply(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let sa = src[3];
        let da = dst[3];
        match self {
            Self::SourceOver => {
                let inv = 1.0 - sa;
                [
                    src[0] + dst[0] * inv,
                    src[1] + dst[1] * inv,
                    src[2] + dst[2] * inv,
                    sa + da * inv,
                ]
            }
            Self::SourceIn => [src[0] * da, src[1] * da, src[2] * da, sa * da],
            Self::DestinationOut => {
                let inv = 1.0 - sa;
                [dst[0] * inv, dst[1] * inv, dst[2] * inv, da * inv]
            }
            Self::Lighter => [
                (src[0] + dst[0]).min(1.0),
                (src[1] + dst[1]).min(1.0),
                (src[2] + dst[2]).min(1.0),
                (sa + da).min(1.0),
            ],
            Self::Color => blend_non_separable(src, dst),
            _ => {
                let f: fn(f32, f32) -> f32 = match self {
                    Self::Multiply => |cb, cs| cb * cs,
                    Self::Screen => |cb, cs| cb + cs - cb * cs,
                    Self::Overlay => overlay,
                    Self::SoftLight => soft_light,
                    _ => color_burn,
                };
                blend_separable(src, dst, f)
            }
        }
    }
}

impl fmt::Display for CompositeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompositeOp {
    type Err = MakeoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| MakeoverError::validation(format!("unknown composite op `{s}`")))
    }
}

// Cr = (1 - Da)·Sc + (1 - Sa)·Dc + Sa·Da·B(cb, cs) with cb, cs unpremultiplied.
fn blend_separable(src: [f32; 4], dst: [f32; 4], b: fn(f32, f32) -> f32) -> [f32; 4] {
    let sa = src[3];
    let da = dst[3];
    if sa <= 0.0 {
        return dst;
    }
    let sada = sa * da;
    let mut out = [0.0f32; 4];
    for c in 0..3 {
        let cs = src[c] / sa;
        let cb = if da > 0.0 { dst[c] / da } else { 0.0 };
        let mixed = b(cb.clamp(0.0, 1.0), cs.clamp(0.0, 1.0));
        out[c] = (src[c] * (1.0 - da) + dst[c] * (1.0 - sa) + sada * mixed).clamp(0.0, 1.0);
    }
    out[3] = (sa + da - sada).clamp(0.0, 1.0);
    out
}

fn overlay(cb: f32, cs: f32) -> f32 {
    if cb <= 0.5 {
        cs * 2.0 * cb
    } else {
        let d = 2.0 * cb - 1.0;
        cs + d - cs * d
    }
}

fn soft_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
    } else {
        let d = if cb <= 0.25 {
            ((16.0 * cb - 12.0) * cb + 4.0) * cb
        } else {
            cb.sqrt()
        };
        cb + (2.0 * cs - 1.0) * (d - cb)
    }
}

fn color_burn(cb: f32, cs: f32) -> f32 {
    if cb >= 1.0 {
        1.0
    } else if cs <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - cb) / cs).min(1.0)
    }
}

// `color`: hue and saturation of the source, luminosity of the backdrop.
fn blend_non_separable(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let sa = src[3];
    let da = dst[3];
    if sa <= 0.0 {
        return dst;
    }
    let cs = [src[0] / sa, src[1] / sa, src[2] / sa];
    let cb = if da > 0.0 {
        [dst[0] / da, dst[1] / da, dst[2] / da]
    } else {
        [0.0; 3]
    };
    let mixed = set_lum(cs, lum(cb));
    let sada = sa * da;
    let mut out = [0.0f32; 4];
    for c in 0..3 {
        out[c] = (src[c] * (1.0 - da) + dst[c] * (1.0 - sa) + sada * mixed[c]).clamp(0.0, 1.0);
    }
    out[3] = (sa + da - sada).clamp(0.0, 1.0);
    out
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > f32::EPSILON {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 && x - l > f32::EPSILON {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
