//! Pen hover timing.
//!
//! A pen that stays in the air above the surface for longer than the hover
//! delay produces `HoverEnter`; touching down or leaving range afterwards
//! produces `HoverLeave`. Touch and mouse devices never hover.

use quill_core::{DeviceGeometry, Sample, DEFAULT_HOVER_DELAY_TICKS};
use serde::Serialize;

/// Hover state of one pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum HoverState {
    /// Waiting for the pen to be in the air.
    #[default]
    AwaitingHover,
    /// Pen is in the air; the delay is running.
    TimingHover,
    /// Hover ended or never started; waiting for the pen to lift again.
    HoverCancelled,
    /// Hover reported.
    InHover,
}

/// Edge produced by [`HoverTracker::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverTransition {
    /// Hover began.
    Enter,
    /// Hover ended.
    Leave,
}

/// Hover state machine for a single pen.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    state: HoverState,
    start_tick: u32,
    delay_ticks: u32,
}

impl HoverTracker {
    /// Create a tracker with the default delay.
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_HOVER_DELAY_TICKS)
    }

    /// Create a tracker that reports hover after `delay_ticks` in the air.
    pub fn with_delay(delay_ticks: u32) -> Self {
        Self {
            state: HoverState::AwaitingHover,
            start_tick: 0,
            delay_ticks,
        }
    }

    /// Current state.
    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Configured delay in ticks.
    pub fn delay_ticks(&self) -> u32 {
        self.delay_ticks
    }

    /// Return to [`HoverState::AwaitingHover`].
    pub fn reset(&mut self) {
        self.state = HoverState::AwaitingHover;
        self.start_tick = 0;
    }

    /// Advance the state machine with one sample.
    pub fn update(
        &mut self,
        sample: &Sample,
        geometry: &DeviceGeometry,
    ) -> Option<HoverTransition> {
        if !geometry.pointer_type.is_pen() {
            return None;
        }

        let now = sample.timestamp;
        match self.state {
            HoverState::AwaitingHover => {
                if sample.in_air && sample.in_range && !sample.is_down {
                    self.start_tick = now;
                    self.state = HoverState::TimingHover;
                }
                None
            }
            HoverState::TimingHover => {
                if sample.is_down {
                    self.state = HoverState::HoverCancelled;
                } else if !sample.in_range {
                    self.state = HoverState::AwaitingHover;
                } else if now < self.start_tick {
                    // tick counter wrapped; restart the timer
                    self.start_tick = now;
                } else if now - self.start_tick > self.delay_ticks {
                    self.state = HoverState::InHover;
                    log::debug!("hover: enter after {} ticks", now - self.start_tick);
                    return Some(HoverTransition::Enter);
                }
                None
            }
            HoverState::InHover => {
                if sample.is_down || !sample.in_range {
                    self.state = HoverState::HoverCancelled;
                    log::debug!("hover: leave");
                    return Some(HoverTransition::Leave);
                }
                None
            }
            HoverState::HoverCancelled => {
                if sample.in_air && !sample.is_down {
                    self.state = HoverState::AwaitingHover;
                }
                None
            }
        }
    }
}

impl Default for HoverTracker {
    fn default() -> Self {
        Self::new()
    }
}
