//! Drag / flick / hold arbitration within one manipulation span.
//!
//! The platform recognizer reports manipulations with cumulative translation.
//! [`DragArbiter`] turns them into at most one drag per span, never alongside
//! a flick, and upgrades the drag to a right-drag when a hold came first.

use crate::interaction::InteractionOutput;
use quill_core::{DeviceGeometry, GestureKind, DEFAULT_DRAG_THRESHOLD_INCHES};

/// "Already fired" latches for the current manipulation span.
#[derive(Debug, Clone)]
pub struct DragArbiter {
    fired_drag: bool,
    fired_hold: bool,
    fired_flick: bool,
    in_manipulation: bool,
    threshold_inches: f64,
}

impl DragArbiter {
    /// Create an arbiter with the default drag threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_DRAG_THRESHOLD_INCHES)
    }

    /// Create an arbiter with a drag threshold in inches.
    pub fn with_threshold(threshold_inches: f64) -> Self {
        Self {
            fired_drag: false,
            fired_hold: false,
            fired_flick: false,
            in_manipulation: false,
            threshold_inches,
        }
    }

    /// A drag fired in this span.
    pub fn fired_drag(&self) -> bool {
        self.fired_drag
    }

    /// A flick fired in this span.
    pub fn fired_flick(&self) -> bool {
        self.fired_flick
    }

    /// Clear every latch.
    pub fn reset(&mut self) {
        self.fired_drag = false;
        self.fired_hold = false;
        self.fired_flick = false;
        self.in_manipulation = false;
    }

    /// A new contact went down.
    ///
    /// Outside a manipulation span there is nothing left to arbitrate, so the
    /// latches of the previous contact are dropped.
    pub fn on_contact_down(&mut self) {
        if !self.in_manipulation {
            self.reset();
        }
    }

    /// Record that a hold began.
    pub fn on_hold(&mut self) {
        self.fired_hold = true;
    }

    /// Claim the span for a flick. Returns `false` if a drag or flick already fired.
    pub fn claim_flick(&mut self) -> bool {
        if self.fired_drag || self.fired_flick {
            return false;
        }
        self.fired_flick = true;
        true
    }

    /// Inspect one manipulation output and decide whether it is a drag.
    ///
    /// `flick_possible` is the flick detector's live verdict; drags wait until
    /// a flick has been ruled out. An END or cancel flag closes the span.
    pub fn detect_drag(
        &mut self,
        output: &InteractionOutput,
        flick_possible: bool,
        geometry: &DeviceGeometry,
    ) -> Option<GestureKind> {
        if output.flags.is_finished() {
            self.reset();
            return None;
        }
        if output.flags.begin {
            self.in_manipulation = true;
        }

        if self.fired_drag || self.fired_flick || flick_possible {
            return None;
        }

        let (dpi_x, dpi_y) = geometry.dpi();
        let inches_x = output.translation.x / dpi_x;
        let inches_y = output.translation.y / dpi_y;
        if inches_x.abs() > self.threshold_inches || inches_y.abs() > self.threshold_inches {
            self.fired_drag = true;
            let kind = if self.fired_hold {
                GestureKind::RightDrag
            } else {
                GestureKind::Drag
            };
            log::debug!("arbitration: {kind} after ({inches_x:.3}, {inches_y:.3}) in");
            return Some(kind);
        }
        None
    }
}

impl Default for DragArbiter {
    fn default() -> Self {
        Self::new()
    }
}
