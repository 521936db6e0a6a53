//! Ambient-light check on camera frames.

use crate::raster::pixmap::Pixmap;

/// Delay before the first sample, letting the camera settle its exposure.
pub const INITIAL_DELAY_MS: f64 = 1500.0;
pub const SAMPLE_INTERVAL_MS: f64 = 500.0;
/// Average channel value below which a frame counts as dark.
pub const DARK_THRESHOLD: f64 = 80.0;
/// Consecutive dark samples needed to raise the warning.
pub const DARK_FRAMES: u32 = 3;

const REGION: u32 = 100;
const STRIDE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightEvent {
    WarningRaised,
    WarningCleared,
}

#[derive(Clone, Debug, Default)]
pub struct LightMonitor {
    started_at: Option<f64>,
    last_sample: Option<f64>,
    dark_count: u32,
    warning: bool,
}

impl LightMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_warning(&self) -> bool {
        self.warning
    }

    /// Forgets all history; the initial delay starts over on the next frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feeds one frame. Samples only after the initial delay and at most once per
    /// interval; returns a transition of the low-light warning if one happened.
    pub fn observe(&mut self, frame: &Pixmap, now_ms: f64) -> Option<LightEvent> {
        let started = *self.started_at.get_or_insert(now_ms);
        if now_ms - started < INITIAL_DELAY_MS {
            return None;
        }
        if let Some(last) = self.last_sample
            && now_ms - last < SAMPLE_INTERVAL_MS
        {
            return None;
        }
        self.last_sample = Some(now_ms);

        let brightness = central_brightness(frame)?;
        if brightness < DARK_THRESHOLD {
            self.dark_count += 1;
            if self.dark_count >= DARK_FRAMES && !self.warning {
                self.warning = true;
                tracing::warn!(brightness, "low ambient light");
                return Some(LightEvent::WarningRaised);
            }
        } else {
            self.dark_count = 0;
            if self.warning {
                self.warning = false;
                return Some(LightEvent::WarningCleared);
            }
        }
        None
    }
}

/// Mean of `(r + g + b) / 3` over every tenth pixel of the central 100x100 block
/// (smaller frames use what they have). `None` for an empty frame.
pub fn central_brightness(frame: &Pixmap) -> Option<f64> {
    if frame.is_empty() {
        return None;
    }
    let (w, h) = (frame.width(), frame.height());
    let (rw, rh) = (REGION.min(w), REGION.min(h));
    let x0 = w / 2 - rw / 2;
    let y0 = h / 2 - rh / 2;

    let mut sum = 0.0;
    let mut count = 0usize;
    for i in (0..(rw * rh) as usize).step_by(STRIDE) {
        let x = x0 + (i % rw as usize) as u32;
        let y = y0 + (i / rw as usize) as u32;
        let [r, g, b, _] = frame.pixel_straight(x, y);
        sum += (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/render/light.rs"]
mod tests;
