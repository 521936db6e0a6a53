use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MakeoverError, MakeoverResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// An opaque `#RRGGBB` color as supplied by a caller.
///
/// The RGB triple is stored verbatim; nothing downstream rounds or re-derives it, so a
/// color set as `#AABBCC` is emitted as exactly that triple in every fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn parse(s: &str) -> MakeoverResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MakeoverError::validation(format!("invalid hex color `{s}`")));
        }
        let channel = |i: usize, len: usize| -> MakeoverResult<u8> {
            u8::from_str_radix(&hex[i..i + len], 16)
                .map_err(|_| MakeoverError::validation(format!("invalid hex color `{s}`")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let r = channel(0, 1)?;
                let g = channel(1, 1)?;
                let b = channel(2, 1)?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(MakeoverError::validation(format!(
                "hex color `{s}` must have 3 or 6 digits"
            ))),
        }
    }

    /// This color with a straight alpha in `[0, 1]`.
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = MakeoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = MakeoverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

/// 8-bit RGB with straight (non-premultiplied) alpha, as used by paint stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 },
        }
    }

    pub fn white(a: f64) -> Self {
        Self::new(255, 255, 255, a)
    }

    pub fn black(a: f64) -> Self {
        Self::new(0, 0, 0, a)
    }

    pub fn hex(self) -> HexColor {
        HexColor::rgb(self.r, self.g, self.b)
    }

    /// Premultiplied float channels in `[0, 1]`.
    pub(crate) fn premul(self) -> [f32; 4] {
        let a = self.a as f32;
        [
            f32::from(self.r) / 255.0 * a,
            f32::from(self.g) / 255.0 * a,
            f32::from(self.b) / 255.0 * a,
            a,
        ]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
