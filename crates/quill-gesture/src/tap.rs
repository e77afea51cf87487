//! Multi-tap counting.

use quill_core::{DeviceGeometry, Point, Rect, Sample};

#[derive(Debug, Clone, Copy, PartialEq)]
struct LastTap {
    position: Point,
    timestamp: u32,
    barrel_button: bool,
}

/// Counts consecutive taps that land close together in space and time.
///
/// A Down continues the sequence when it matches the reference tap's barrel
/// button state, lands inside the device's double-tap rectangle centred on
/// the reference, and arrives within the double-tap time window. Otherwise
/// the count restarts at 1 and the Down becomes the new reference.
#[derive(Debug, Clone)]
pub struct TapCounter {
    count: u32,
    last: Option<LastTap>,
}

impl TapCounter {
    /// Create a counter with no tap history.
    pub fn new() -> Self {
        Self {
            count: 1,
            last: None,
        }
    }

    /// Current tap count, at least 1.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Register a Down and return the updated count.
    pub fn on_down(&mut self, sample: &Sample, geometry: &DeviceGeometry) -> u32 {
        let continues = self.last.is_some_and(|last| {
            let window = Rect::centered(last.position, geometry.double_tap_size);
            let elapsed = sample.timestamp.wrapping_sub(last.timestamp);
            last.barrel_button == sample.barrel_button
                && window.contains_point(&sample.pixel)
                && elapsed <= geometry.double_tap_time_ms
        });

        if continues {
            self.count += 1;
        } else {
            self.count = 1;
            self.last = Some(LastTap {
                position: sample.pixel,
                timestamp: sample.timestamp,
                barrel_button: sample.barrel_button,
            });
        }
        self.count
    }

    /// Break any multi-tap sequence in progress.
    pub fn reset(&mut self) {
        self.count = 1;
    }
}

impl Default for TapCounter {
    fn default() -> Self {
        Self::new()
    }
}
