//! Before/after split view driven by a draggable divider.
//!
//! Pointer input updates the stored position immediately; the handle's visual
//! position follows on the next [`tick`](ComparisonController::tick), so bursts of
//! move events cost one visual update per frame.

use kurbo::Rect;

/// Moves smaller than this many pixels are ignored.
const MIN_MOVEMENT_PX: f64 = 1.0;
/// Time the handle keeps fading out before it is hidden.
const FADE_OUT_MS: f64 = 150.0;

/// Horizontal extent of the container the divider is dragged across.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerBounds {
    pub left: f64,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandleVisibility {
    Hidden,
    Visible,
    FadingOut { hide_at_ms: f64 },
}

#[derive(Clone, Debug)]
pub struct ComparisonController {
    active: bool,
    dragging: bool,
    position: f64,
    handle_position: f64,
    pending_visual: bool,
    last_x: f64,
    bounds: ContainerBounds,
    visibility: HandleVisibility,
}

impl ComparisonController {
    pub fn new(bounds: ContainerBounds) -> Self {
        Self {
            active: false,
            dragging: false,
            position: 0.5,
            handle_position: 0.5,
            pending_visual: false,
            last_x: 0.0,
            bounds,
            visibility: HandleVisibility::Hidden,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Divider position in `[0, 1]` from the left edge.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Position the handle is currently drawn at.
    pub fn handle_position(&self) -> f64 {
        self.handle_position
    }

    pub fn visibility(&self) -> HandleVisibility {
        self.visibility
    }

    pub fn set_bounds(&mut self, bounds: ContainerBounds) {
        self.bounds = bounds;
    }

    pub fn enable(&mut self) {
        self.active = true;
        self.visibility = HandleVisibility::Visible;
        self.pending_visual = true;
    }

    pub fn disable(&mut self, now_ms: f64) {
        self.active = false;
        self.dragging = false;
        self.visibility = HandleVisibility::FadingOut {
            hide_at_ms: now_ms + FADE_OUT_MS,
        };
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.active {
            self.disable(now_ms);
        } else {
            self.enable();
        }
    }

    /// Moves the divider programmatically, clamped to `[0, 1]`. The handle follows
    /// on the next tick.
    pub fn set_position(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        self.position = position.clamp(0.0, 1.0);
        self.pending_visual = true;
    }

    /// Starts a drag. Ignored while the split view is off.
    pub fn pointer_down(&mut self, client_x: f64) -> bool {
        if !self.active {
            return false;
        }
        self.dragging = true;
        self.last_x = client_x;
        true
    }

    /// Returns true when the stored position changed.
    pub fn pointer_move(&mut self, client_x: f64) -> bool {
        if !self.dragging || !client_x.is_finite() {
            return false;
        }
        if (client_x - self.last_x).abs() < MIN_MOVEMENT_PX {
            return false;
        }
        if self.bounds.width <= 0.0 {
            return false;
        }
        self.last_x = client_x;
        self.position = ((client_x - self.bounds.left) / self.bounds.width).clamp(0.0, 1.0);
        self.pending_visual = true;
        true
    }

    /// Ends the drag and snaps the position to two decimals.
    pub fn pointer_up(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        let snapped = (self.position * 100.0).round() / 100.0;
        if snapped != self.position {
            self.position = snapped;
            self.handle_position = snapped;
        }
    }

    /// Animation-frame hook: applies the deferred handle update and finishes a
    /// fade-out. Returns true when anything visible changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        if self.pending_visual {
            self.pending_visual = false;
            changed = self.handle_position != self.position;
            self.handle_position = self.position;
        }
        if let HandleVisibility::FadingOut { hide_at_ms } = self.visibility
            && now_ms >= hide_at_ms
            && !self.active
        {
            self.visibility = HandleVisibility::Hidden;
            changed = true;
        }
        changed
    }

    /// Left part of a `width x height` surface that shows the made-up side, or
    /// `None` while the split view is off.
    pub fn clip_region(&self, width: f64, height: f64) -> Option<Rect> {
        if !self.active {
            return None;
        }
        Some(Rect::new(0.0, 0.0, width * self.position, height))
    }
}

impl Default for ComparisonController {
    fn default() -> Self {
        Self::new(ContainerBounds {
            left: 0.0,
            width: 0.0,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/comparison.rs"]
mod tests;
