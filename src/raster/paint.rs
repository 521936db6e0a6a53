use std::fmt;

use smallvec::SmallVec;

use crate::foundation::core::{Point, Rgba};

/// One gradient stop; `offset` is clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

pub type Stops = SmallVec<[ColorStop; 8]>;

/// Fill or stroke source, defined in user space at the time it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        start: Point,
        end: Point,
        stops: Stops,
    },
    /// Two-circle radial gradient with canvas semantics.
    Radial {
        c0: Point,
        r0: f64,
        c1: Point,
        r1: f64,
        stops: Stops,
    },
}

impl Paint {
    pub fn linear(start: Point, end: Point) -> Self {
        Self::Linear {
            start,
            end,
            stops: Stops::new(),
        }
    }

    pub fn radial(c0: Point, r0: f64, c1: Point, r1: f64) -> Self {
        Self::Radial {
            c0,
            r0: r0.max(0.0),
            c1,
            r1: r1.max(0.0),
            stops: Stops::new(),
        }
    }

    /// Concentric radial gradient from `inner` to `outer` radius.
    pub fn radial_centered(center: Point, inner: f64, outer: f64) -> Self {
        Self::radial(center, inner, center, outer)
    }

    /// Adds a stop, keeping stops ordered by offset (insertion order breaks ties).
    pub fn with_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.add_stop(offset, color);
        self
    }

    pub fn add_stop(&mut self, offset: f64, color: Rgba) {
        let stops = match self {
            Self::Solid(_) => return,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        };
        let offset = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let at = stops
            .iter()
            .position(|s| s.offset > offset)
            .unwrap_or(stops.len());
        stops.insert(at, ColorStop { offset, color });
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }

    /// Premultiplied color at user-space point `p`, channels in `[0, 1]`.
    pub fn sample(&self, p: Point) -> [f32; 4] {
        match self {
            Self::Solid(c) => c.premul(),
            Self::Linear { start, end, stops } => {
                let d = *end - *start;
                let len2 = d.hypot2();
                if len2 <= f64::EPSILON {
                    return [0.0; 4];
                }
                let t = (p - *start).dot(d) / len2;
                color_at(stops, t)
            }
            Self::Radial {
                c0,
                r0,
                c1,
                r1,
                stops,
            } => match radial_t(*c0, *r0, *c1, *r1, p) {
                Some(t) => color_at(stops, t),
                None => [0.0; 4],
            },
        }
    }
}

impl From<Rgba> for Paint {
    fn from(value: Rgba) -> Self {
        Self::Solid(value)
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, stops) = match self {
            Self::Solid(c) => return write!(f, "{c}"),
            Self::Linear { stops, .. } => ("linear-gradient", stops),
            Self::Radial { stops, .. } => ("radial-gradient", stops),
        };
        write!(f, "{kind}(")?;
        for (i, s) in stops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", s.color, s.offset)?;
        }
        f.write_str(")")
    }
}

// Largest t with r(t) >= 0 such that p lies on circle(t).
fn radial_t(c0: Point, r0: f64, c1: Point, r1: f64, p: Point) -> Option<f64> {
    let cd = c1 - c0;
    let pd = p - c0;
    let dr = r1 - r0;
    let a = cd.hypot2() - dr * dr;
    let b = pd.dot(cd) + r0 * dr;
    let c = pd.hypot2() - r0 * r0;
    let valid = |t: f64| r0 + t * dr >= 0.0;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = c / (2.0 * b);
        return valid(t).then_some(t);
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t1 = (b + sq) / a;
    let t2 = (b - sq) / a;
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
    if valid(hi) {
        Some(hi)
    } else if valid(lo) {
        Some(lo)
    } else {
        None
    }
}

fn color_at(stops: &[ColorStop], t: f64) -> [f32; 4] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return first.color.premul();
    }
    if t >= last.offset {
        return last.color.premul();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.offset && t < b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return mix(a.color, b.color, k as f32);
        }
    }
    last.color.premul()
}

fn mix(a: Rgba, b: Rgba, k: f32) -> [f32; 4] {
    let ch = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * k) / 255.0;
    let alpha = a.a as f32 + (b.a as f32 - a.a as f32) * k;
    [
        ch(a.r, b.r) * alpha,
        ch(a.g, b.g) * alpha,
        ch(a.b, b.b) * alpha,
        alpha,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/raster/paint.rs"]
mod tests;
