//! Per-contact gesture engine.
//!
//! [`GestureEngine`] owns one [`FlickDetector`], one [`HoverTracker`], one
//! [`TapCounter`] and one [`DragArbiter`] for a single pointer device. Every
//! sample runs through them in a fixed order:
//!
//! 1. tap counting (Down only)
//! 2. flick detection, which may emit `Flick` on Up
//! 3. hover timing (pens only)
//! 4. the platform recognizer's outputs, arbitrated into taps, holds and drags
//!
//! Recognition never fails loudly: a panic raised while processing a sample
//! is caught, logged at debug level and turned into "no gestures".

use crate::arbitration::DragArbiter;
use crate::flick::{FlickDetector, FlickResult};
use crate::hover::{HoverState, HoverTracker, HoverTransition};
use crate::interaction::{
    InteractionKind, InteractionOutput, InteractionRecognizer, NoInteractions,
};
use crate::tap::TapCounter;
use quill_core::{
    ContactAction, DeviceGeometry, GestureConfig, GestureEvent, GestureKind, Sample,
    DEFAULT_DRAG_THRESHOLD_INCHES, DEFAULT_TOLERANCE,
};
use std::panic::{self, AssertUnwindSafe};

/// Gesture recognizer for one pointer device.
#[derive(Debug)]
pub struct GestureEngine<R = NoInteractions> {
    config: GestureConfig,
    flick: FlickDetector,
    hover: HoverTracker,
    taps: TapCounter,
    arbiter: DragArbiter,
    recognizer: R,
    geometry: DeviceGeometry,
    barrel_on_down: bool,
}

impl GestureEngine<NoInteractions> {
    /// Create an engine with the default config and no platform recognizer.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create an engine with a config and no platform recognizer.
    pub fn with_config(config: GestureConfig) -> Self {
        Self::with_recognizer(config, NoInteractions)
    }
}

impl Default for GestureEngine<NoInteractions> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: InteractionRecognizer> GestureEngine<R> {
    /// Create an engine driving `recognizer` with every sample.
    ///
    /// Invalid config values are replaced by their defaults with a warning.
    pub fn with_recognizer(config: GestureConfig, recognizer: R) -> Self {
        let config = sanitize(config);

        let mut flick = FlickDetector::new();
        if !flick.set_tolerance(config.tolerance) {
            log::warn!("tolerance {} rejected, keeping default", config.tolerance);
        }
        flick.set_allow_press_flicks(config.allow_press_flicks);
        flick.reset();

        Self {
            hover: HoverTracker::with_delay(config.hover_delay_ticks),
            arbiter: DragArbiter::with_threshold(config.drag_threshold_inches),
            taps: TapCounter::new(),
            flick,
            recognizer,
            geometry: DeviceGeometry::default(),
            barrel_on_down: false,
            config,
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Live flick verdict for the current or last contact.
    pub fn flick_result(&self) -> &FlickResult {
        self.flick.result()
    }

    /// The flick detector.
    pub fn flick_detector(&self) -> &FlickDetector {
        &self.flick
    }

    /// Current multi-tap count.
    pub fn tap_count(&self) -> u32 {
        self.taps.count()
    }

    /// Current hover state.
    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    /// The platform recognizer.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Drop all per-contact state.
    pub fn reset(&mut self) {
        self.flick.reset();
        self.hover.reset();
        self.taps = TapCounter::new();
        self.arbiter.reset();
        self.barrel_on_down = false;
    }

    /// Process one sample and return the gestures it completed.
    ///
    /// A panic raised while processing is caught and yields no gestures. The
    /// process-wide panic hook still runs first, so the default hook prints
    /// the message to stderr. Hosts that need silence install their own hook
    /// with [`std::panic::set_hook`].
    pub fn update(&mut self, sample: &Sample, geometry: &DeviceGeometry) -> Vec<GestureEvent> {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.process_sample(sample, geometry)));
        outcome.unwrap_or_else(|_| {
            log::debug!(
                "recognition fault swallowed at tick {} ({:?})",
                sample.timestamp,
                sample.action
            );
            Vec::new()
        })
    }

    /// Process an output of an externally driven platform recognizer.
    ///
    /// Panics are caught the same way as in [`update`](Self::update).
    pub fn on_interaction(&mut self, output: &InteractionOutput) -> Vec<GestureEvent> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut events = Vec::new();
            self.handle_interaction(output, &mut events);
            events
        }));
        outcome.unwrap_or_else(|_| {
            log::debug!("recognition fault swallowed for {:?}", output.kind);
            Vec::new()
        })
    }

    fn process_sample(&mut self, sample: &Sample, geometry: &DeviceGeometry) -> Vec<GestureEvent> {
        self.geometry = *geometry;
        let mut events = Vec::new();

        if sample.action == ContactAction::Down {
            let count = self.taps.on_down(sample, geometry);
            self.barrel_on_down = sample.barrel_button;
            self.arbiter.on_contact_down();
            log::trace!("engine: down #{count} at {:?}", sample.pixel);
        }

        self.detect_flick(sample, geometry, &mut events);

        if let Some(transition) = self.hover.update(sample, geometry) {
            let kind = match transition {
                HoverTransition::Enter => GestureKind::HoverEnter,
                HoverTransition::Leave => GestureKind::HoverLeave,
            };
            events.push(GestureEvent::new(kind, sample.pixel, sample.timestamp));
        }

        for output in self.recognizer.process(sample) {
            self.handle_interaction(&output, &mut events);
        }

        events
    }

    fn detect_flick(
        &mut self,
        sample: &Sample,
        geometry: &DeviceGeometry,
        events: &mut Vec<GestureEvent>,
    ) {
        if !self.config.flicks_enabled || !geometry.pointer_type.is_pen() {
            return;
        }

        let is_first = sample.action == ContactAction::Down;
        self.flick.update(sample, geometry, is_first);

        if sample.action == ContactAction::Up
            && self.flick.result().can_be_flick
            && self.arbiter.claim_flick()
        {
            let result = self.flick.result();
            log::debug!(
                "engine: flick {} units at {:.1} deg",
                result.physical_length,
                result.direction_deg
            );
            events.push(GestureEvent::new(
                GestureKind::Flick,
                result.tablet_start,
                sample.timestamp,
            ));
        }
    }

    /// A flick is still possible for the current contact, so drags must wait.
    fn flick_possible(&self) -> bool {
        self.config.flicks_enabled
            && self.geometry.pointer_type.is_pen()
            && self.flick.result().can_be_flick
    }

    fn handle_interaction(&mut self, output: &InteractionOutput, events: &mut Vec<GestureEvent>) {
        let kind = match output.kind {
            InteractionKind::Tap if self.barrel_on_down => Some(GestureKind::RightTap),
            InteractionKind::Tap => Some(GestureKind::Tap),
            InteractionKind::SecondaryTap => Some(GestureKind::RightTap),
            InteractionKind::Hold if output.flags.is_finished() => Some(GestureKind::HoldLeave),
            InteractionKind::Hold if output.flags.begin => {
                self.arbiter.on_hold();
                Some(GestureKind::HoldEnter)
            }
            InteractionKind::Hold => None,
            InteractionKind::Manipulation => {
                let flick_possible = self.flick_possible();
                let drag = self.arbiter.detect_drag(output, flick_possible, &self.geometry);
                if drag.is_some_and(GestureKind::is_drag) {
                    self.taps.reset();
                }
                drag
            }
        };

        if let Some(kind) = kind {
            events.push(GestureEvent::new(kind, output.position, output.timestamp));
        }
    }
}

fn sanitize(mut config: GestureConfig) -> GestureConfig {
    if let Err(e) = config.validate() {
        log::warn!("{e}; falling back to defaults for invalid fields");
        if !(config.tolerance > 0.0 && config.tolerance < 1.0) {
            config.tolerance = DEFAULT_TOLERANCE;
        }
        if !(config.drag_threshold_inches.is_finite() && config.drag_threshold_inches >= 0.0) {
            config.drag_threshold_inches = DEFAULT_DRAG_THRESHOLD_INCHES;
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionFlags;
    use quill_core::{Point, PointerType};

    fn contact(action: ContactAction, t: u32, x: f64) -> Sample {
        Sample::contact(action, t, Point::new(x, 0.0))
    }

    fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let engine = GestureEngine::with_config(GestureConfig {
            tolerance: 3.0,
            drag_threshold_inches: f64::NAN,
            ..GestureConfig::default()
        });
        assert_eq!(engine.config().tolerance, DEFAULT_TOLERANCE);
        assert_eq!(
            engine.config().drag_threshold_inches,
            DEFAULT_DRAG_THRESHOLD_INCHES
        );
    }

    #[test]
    fn test_config_reaches_components() {
        let engine = GestureEngine::with_config(GestureConfig {
            tolerance: 0.999_999,
            allow_press_flicks: false,
            hover_delay_ticks: 10,
            ..GestureConfig::default()
        });
        assert!(!engine.flick_detector().allow_press_flicks());
        assert!(engine.flick_detector().moved_enough_from_pen_down());
        assert!((engine.flick_detector().thresholds().min_length - 800.0).abs() < 0.01);
        assert_eq!(engine.hover.delay_ticks(), 10);
    }

    #[test]
    fn test_flick_emitted_at_start_point() {
        let mut engine = GestureEngine::with_config(GestureConfig {
            tolerance: 0.5,
            ..GestureConfig::default()
        });
        let pen = DeviceGeometry::pen();
        let mut events = Vec::new();
        events.extend(engine.update(&contact(ContactAction::Down, 0, 100.0), &pen));
        for (t, x) in [(20, 400.0), (40, 700.0), (60, 1000.0)] {
            events.extend(engine.update(&contact(ContactAction::Move, t, x), &pen));
        }
        events.extend(engine.update(&contact(ContactAction::Up, 60, 1000.0), &pen));

        assert_eq!(kinds(&events), vec![GestureKind::Flick]);
        assert_eq!(events[0].position, Point::new(100.0, 0.0));
        assert_eq!(events[0].timestamp, 60);
    }

    #[test]
    fn test_flicks_disabled() {
        let mut engine = GestureEngine::with_config(GestureConfig {
            flicks_enabled: false,
            ..GestureConfig::default()
        });
        let pen = DeviceGeometry::pen();
        engine.update(&contact(ContactAction::Down, 0, 0.0), &pen);
        engine.update(&contact(ContactAction::Move, 20, 900.0), &pen);
        let events = engine.update(&contact(ContactAction::Up, 40, 900.0), &pen);
        assert!(events.is_empty());
        assert!(!engine.flick_possible());
    }

    #[test]
    fn test_touch_never_flicks() {
        let mut engine = GestureEngine::new();
        let touch = DeviceGeometry::for_pointer(PointerType::Touch);
        engine.update(&contact(ContactAction::Down, 0, 0.0), &touch);
        engine.update(&contact(ContactAction::Move, 20, 900.0), &touch);
        let events = engine.update(&contact(ContactAction::Up, 40, 900.0), &touch);
        assert!(events.is_empty());
    }

    #[test]
    fn test_touch_drags_immediately() {
        let mut engine = GestureEngine::new();
        let touch = DeviceGeometry::for_pointer(PointerType::Touch);
        engine.update(&contact(ContactAction::Down, 0, 0.0), &touch);
        let events = engine.on_interaction(&InteractionOutput::manipulation(
            InteractionFlags::BEGIN,
            Point::ORIGIN,
            Point::new(30.0, 0.0),
            10,
        ));
        assert_eq!(kinds(&events), vec![GestureKind::Drag]);
    }

    #[test]
    fn test_pen_drag_waits_for_flick_rejection() {
        let mut engine = GestureEngine::new();
        let pen = DeviceGeometry::pen();
        engine.update(&contact(ContactAction::Down, 0, 0.0), &pen);
        let early = engine.on_interaction(&InteractionOutput::manipulation(
            InteractionFlags::BEGIN,
            Point::ORIGIN,
            Point::new(30.0, 0.0),
            10,
        ));
        assert!(early.is_empty());

        // slow stroke: past max time, so no longer a flick candidate
        engine.update(&contact(ContactAction::Move, 400, 30.0), &pen);
        engine.update(&contact(ContactAction::Move, 3100, 40.0), &pen);
        assert!(!engine.flick_result().can_be_flick);

        let late = engine.on_interaction(&InteractionOutput::manipulation(
            InteractionFlags::NONE,
            Point::ORIGIN,
            Point::new(40.0, 0.0),
            3100,
        ));
        assert_eq!(kinds(&late), vec![GestureKind::Drag]);
    }

    #[test]
    fn test_taps_and_holds() {
        let mut engine = GestureEngine::new();
        let pen = DeviceGeometry::pen();
        engine.update(&contact(ContactAction::Down, 0, 0.0), &pen);

        let tap = InteractionOutput::new(
            InteractionKind::Tap,
            InteractionFlags::NONE,
            Point::ORIGIN,
            5,
        );
        assert_eq!(kinds(&engine.on_interaction(&tap)), vec![GestureKind::Tap]);

        let secondary = InteractionOutput {
            kind: InteractionKind::SecondaryTap,
            ..tap
        };
        assert_eq!(
            kinds(&engine.on_interaction(&secondary)),
            vec![GestureKind::RightTap]
        );

        let hold = InteractionOutput {
            kind: InteractionKind::Hold,
            flags: InteractionFlags::BEGIN,
            ..tap
        };
        assert_eq!(
            kinds(&engine.on_interaction(&hold)),
            vec![GestureKind::HoldEnter]
        );
        let holding = InteractionOutput {
            flags: InteractionFlags::NONE,
            ..hold
        };
        assert!(engine.on_interaction(&holding).is_empty());
        let released = InteractionOutput {
            flags: InteractionFlags::END,
            ..hold
        };
        assert_eq!(
            kinds(&engine.on_interaction(&released)),
            vec![GestureKind::HoldLeave]
        );
    }

    #[test]
    fn test_hold_enters_only_on_begin() {
        let mut engine = GestureEngine::new();
        let touch = DeviceGeometry::for_pointer(PointerType::Touch);
        engine.update(&contact(ContactAction::Down, 0, 0.0), &touch);

        let holding = InteractionOutput::new(
            InteractionKind::Hold,
            InteractionFlags::NONE,
            Point::ORIGIN,
            5,
        );
        assert!(engine.on_interaction(&holding).is_empty());

        // no HoldEnter, so a drag stays a plain drag
        let drag = engine.on_interaction(&InteractionOutput::manipulation(
            InteractionFlags::BEGIN,
            Point::ORIGIN,
            Point::new(40.0, 0.0),
            10,
        ));
        assert_eq!(kinds(&drag), vec![GestureKind::Drag]);

        let cancelled = InteractionOutput {
            flags: InteractionFlags {
                cancel: true,
                ..InteractionFlags::NONE
            },
            ..holding
        };
        assert_eq!(
            kinds(&engine.on_interaction(&cancelled)),
            vec![GestureKind::HoldLeave]
        );
    }

    #[test]
    fn test_cancelled_manipulation_allows_next_drag() {
        let mut engine = GestureEngine::new();
        let touch = DeviceGeometry::for_pointer(PointerType::Touch);
        let moved = |flags, t| {
            InteractionOutput::manipulation(flags, Point::ORIGIN, Point::new(40.0, 0.0), t)
        };
        let cancel = InteractionFlags {
            cancel: true,
            ..InteractionFlags::NONE
        };

        engine.update(&contact(ContactAction::Down, 0, 0.0), &touch);
        let first = engine.on_interaction(&moved(InteractionFlags::BEGIN, 10));
        assert_eq!(kinds(&first), vec![GestureKind::Drag]);
        assert!(engine.on_interaction(&moved(cancel, 20)).is_empty());
        engine.update(&contact(ContactAction::Up, 30, 40.0), &touch);

        engine.update(&contact(ContactAction::Down, 2000, 0.0), &touch);
        let second = engine.on_interaction(&moved(InteractionFlags::BEGIN, 2010));
        assert_eq!(kinds(&second), vec![GestureKind::Drag]);
    }

    #[test]
    fn test_barrel_tap_is_right_tap() {
        let mut engine = GestureEngine::new();
        let pen = DeviceGeometry::pen();
        engine.update(&contact(ContactAction::Down, 0, 0.0).with_barrel_button(true), &pen);
        let tap = InteractionOutput::new(
            InteractionKind::Tap,
            InteractionFlags::NONE,
            Point::ORIGIN,
            5,
        );
        assert_eq!(kinds(&engine.on_interaction(&tap)), vec![GestureKind::RightTap]);
    }

    #[test]
    fn test_recognizer_panic_is_swallowed() {
        let recognizer = |s: &Sample| -> Vec<InteractionOutput> {
            assert!(s.action != ContactAction::Move, "recognizer fault");
            Vec::new()
        };
        let mut engine = GestureEngine::with_recognizer(GestureConfig::default(), recognizer);
        let pen = DeviceGeometry::pen();

        let previous = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let down = engine.update(&contact(ContactAction::Down, 0, 0.0), &pen);
        let moved = engine.update(&contact(ContactAction::Move, 10, 5.0), &pen);
        let up = engine.update(&contact(ContactAction::Up, 20, 5.0), &pen);
        panic::set_hook(previous);

        assert!(down.is_empty());
        assert!(moved.is_empty());
        assert!(up.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut engine = GestureEngine::new();
        let pen = DeviceGeometry::pen();
        engine.update(&Sample::hover(0, Point::ORIGIN), &pen);
        assert_eq!(engine.hover_state(), HoverState::TimingHover);
        engine.reset();
        assert_eq!(engine.hover_state(), HoverState::AwaitingHover);
        assert_eq!(engine.tap_count(), 1);
        assert!(engine.flick_result().can_be_flick);
    }
}
