use std::collections::HashMap;

use crate::foundation::core::HexColor;
use crate::raster::pixmap::Pixmap;

/// Lightens (positive) or darkens (negative) every channel by `percent` of full scale.
pub fn shade(color: HexColor, percent: f64) -> HexColor {
    let amt = (2.55 * percent).round() as i32;
    let ch = |c: u8| (i32::from(c) + amt).clamp(0, 255) as u8;
    HexColor::rgb(ch(color.r), ch(color.g), ch(color.b))
}

/// Channel-wise interpolation `a + t * (b - a)`, rounded to 8 bits.
pub fn lerp_rgb(t: f64, a: HexColor, b: HexColor) -> HexColor {
    let ch = |x: u8, y: u8| {
        (f64::from(x) + t * (f64::from(y) - f64::from(x)))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    HexColor::rgb(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b))
}

/// Fallback swatch when nothing usable can be sampled.
pub const NEUTRAL_GRAY: HexColor = HexColor::rgb(0x80, 0x80, 0x80);

const WHITE_THRESHOLD: u8 = 220;
const BLACK_THRESHOLD: u8 = 50;
const MIN_SATURATION: f64 = 0.15;
const TARGET_SAMPLES: usize = 1000;

/// Picks the dominant saturated color of a product swatch image.
///
/// Roughly [`TARGET_SAMPLES`] pixels are sampled. Transparent, near-white, near-black
/// and unsaturated pixels are skipped; the rest are weighted by saturation and bucketed
/// to the nearest 10 per channel. The mean of the fullest bucket wins. When every
/// sample is filtered out, the mean of all opaque pixels is used instead.
pub fn dominant_color(image: &Pixmap) -> HexColor {
    let total = image.width() as usize * image.height() as usize;
    if total == 0 {
        return NEUTRAL_GRAY;
    }
    let step = (total / TARGET_SAMPLES).max(1);
    let w = image.width() as usize;

    let mut buckets: HashMap<(i32, i32, i32), (u64, [u64; 3])> = HashMap::new();
    let mut order: Vec<(i32, i32, i32)> = Vec::new();
    let mut opaque = (0u64, [0u64; 3]);

    for i in (0..total).step_by(step) {
        let [r, g, b, a] = image.pixel_straight((i % w) as u32, (i / w) as u32);
        if a < 128 {
            continue;
        }
        opaque.0 += 1;
        opaque.1[0] += u64::from(r);
        opaque.1[1] += u64::from(g);
        opaque.1[2] += u64::from(b);

        if r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD {
            continue;
        }
        if r < BLACK_THRESHOLD && g < BLACK_THRESHOLD && b < BLACK_THRESHOLD {
            continue;
        }
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let saturation = if max == 0 {
            0.0
        } else {
            f64::from(max - min) / f64::from(max)
        };
        if saturation < MIN_SATURATION {
            continue;
        }
        let weight = (saturation * 10.0).floor() as u64 + 1;
        let key = (bucket(r), bucket(g), bucket(b));
        let entry = buckets.entry(key).or_insert_with(|| {
            order.push(key);
            (0, [0; 3])
        });
        entry.0 += weight;
        entry.1[0] += u64::from(r) * weight;
        entry.1[1] += u64::from(g) * weight;
        entry.1[2] += u64::from(b) * weight;
    }

    // First-seen bucket wins ties, keeping the result independent of hash order.
    let mut best: Option<(u64, [u64; 3])> = None;
    for key in &order {
        if let Some(&entry) = buckets.get(key) {
            if best.is_none_or(|b| entry.0 > b.0) {
                best = Some(entry);
            }
        }
    }
    match best {
        Some((count, sums)) => mean(count, sums),
        None if opaque.0 > 0 => mean(opaque.0, opaque.1),
        None => NEUTRAL_GRAY,
    }
}

fn bucket(c: u8) -> i32 {
    ((f64::from(c) / 10.0).round() * 10.0) as i32
}

fn mean(count: u64, sums: [u64; 3]) -> HexColor {
    let ch = |s: u64| ((s as f64 / count as f64).round()).clamp(0.0, 255.0) as u8;
    HexColor::rgb(ch(sums[0]), ch(sums[1]), ch(sums[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/texture/color.rs"]
mod tests;
