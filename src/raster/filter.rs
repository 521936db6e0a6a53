use std::fmt;

use smallvec::SmallVec;

use crate::foundation::error::{MakeoverError, MakeoverResult};

/// One CSS-style filter function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    /// Gaussian blur; the value is the standard deviation in device pixels.
    Blur(f32),
}

/// Ordered filter chain applied to everything drawn while it is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    ops: SmallVec<[FilterOp; 3]>,
}

impl Filter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn brightness_contrast(brightness: f32, contrast: f32) -> Self {
        Self::none()
            .then(FilterOp::Brightness(brightness))
            .then(FilterOp::Contrast(contrast))
    }

    pub fn blur(sigma: f32) -> Self {
        Self::none().then(FilterOp::Blur(sigma))
    }

    pub fn then(mut self, op: FilterOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn is_none(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// Total blur sigma (blurs compose as the root of summed variances).
    pub fn blur_sigma(&self) -> f32 {
        self.ops
            .iter()
            .filter_map(|op| match op {
                FilterOp::Blur(s) if *s > 0.0 => Some(s * s),
                _ => None,
            })
            .sum::<f32>()
            .sqrt()
    }

    pub fn has_color_ops(&self) -> bool {
        self.ops
            .iter()
            .any(|op| !matches!(op, FilterOp::Blur(_)))
    }

    /// Applies the brightness/contrast chain to one premultiplied pixel.
    pub(crate) fn apply_color(&self, px: [f32; 4]) -> [f32; 4] {
        let a = px[3];
        if a <= 0.0 || !self.has_color_ops() {
            return px;
        }
        let mut c = [px[0] / a, px[1] / a, px[2] / a];
        for op in &self.ops {
            match *op {
                FilterOp::Brightness(b) => {
                    for v in &mut c {
                        *v *= b;
                    }
                }
                FilterOp::Contrast(k) => {
                    for v in &mut c {
                        *v = (*v - 0.5) * k + 0.5;
                    }
                }
                FilterOp::Blur(_) => {}
            }
            for v in &mut c {
                *v = v.clamp(0.0, 1.0);
            }
        }
        [c[0] * a, c[1] * a, c[2] * a, a]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                FilterOp::Brightness(v) => write!(f, "brightness({v})")?,
                FilterOp::Contrast(v) => write!(f, "contrast({v})")?,
                FilterOp::Blur(v) => write!(f, "blur({v}px)")?,
            }
        }
        Ok(())
    }
}

/// Separable Gaussian blur over a premultiplied RGBA8 buffer with q16 weights.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> MakeoverResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MakeoverError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(MakeoverError::render(
            "blur expects src matching width*height*4",
        ));
    }
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Kernel radius covering three standard deviations.
pub(crate) fn blur_radius(sigma: f32) -> u32 {
    if sigma.is_finite() && sigma > 0.0 {
        (sigma * 3.0).ceil() as u32
    } else {
        0
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> MakeoverResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MakeoverError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

// Out-of-range taps read transparent black, matching an unbounded offscreen layer.
fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i32 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/raster/filter.rs"]
mod tests;
