//! Streaming gesture recognition for pointer input.
//!
//! Samples from one contact go in, gestures come out:
//! - [`FlickDetector`]: decides whether a pen stroke was a flick
//! - [`HoverTracker`]: reports pens dwelling above the surface
//! - [`TapCounter`]: counts double and triple taps
//! - [`DragArbiter`]: keeps drags, holds and flicks mutually exclusive
//! - [`GestureEngine`]: wires the above to a platform [`InteractionRecognizer`]
//!
//! # Example
//!
//! ```
//! use quill_core::{ContactAction, DeviceGeometry, GestureConfig, GestureKind, Point, Sample};
//! use quill_gesture::GestureEngine;
//!
//! let mut engine = GestureEngine::with_config(GestureConfig::default());
//! let pen = DeviceGeometry::pen();
//!
//! let mut events = Vec::new();
//! events.extend(engine.update(&Sample::contact(ContactAction::Down, 0, Point::ORIGIN), &pen));
//! for (t, x) in [(20, 300.0), (40, 600.0), (60, 900.0)] {
//!     let sample = Sample::contact(ContactAction::Move, t, Point::new(x, 0.0));
//!     events.extend(engine.update(&sample, &pen));
//! }
//! let up = Sample::contact(ContactAction::Up, 60, Point::new(900.0, 0.0));
//! events.extend(engine.update(&up, &pen));
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].kind, GestureKind::Flick);
//! ```

mod arbitration;
mod engine;
mod flick;
mod hover;
mod interaction;
mod tap;

pub use arbitration::DragArbiter;
pub use engine::GestureEngine;
pub use flick::{
    FlickDetector, FlickResult, FlickThresholds, DEFAULT_PERIOD_MS, MAX_PEN_DOWN_WAIT_MS,
    PERIOD_ALPHA, THRESHOLD_LENGTH, THRESHOLD_TIME_MS,
};
pub use hover::{HoverState, HoverTracker, HoverTransition};
pub use interaction::{
    InteractionFlags, InteractionKind, InteractionOutput, InteractionRecognizer, NoInteractions,
};
pub use tap::TapCounter;
