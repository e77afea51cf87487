//! Flick detection for a single pen contact.
//!
//! A flick is a short, fast, straight stroke that ends with the pen lifting
//! while still moving. [`FlickDetector`] consumes the Down/Move/Up samples of
//! one contact and runs a two-phase pipeline:
//!
//! 1. **Collect**: from Down until the pen has left the pen-down
//!    neighbourhood and either travelled [`THRESHOLD_LENGTH`] physical units
//!    or spent [`THRESHOLD_TIME_MS`] in contact.
//! 2. **Analyze**: every further sample updates the stroke metrics and
//!    re-evaluates the verdict. Only the final pass on Up may reject a stroke
//!    for being too short.
//!
//! Rejection is one-shot: once the verdict turns negative the detector stops
//! looking at samples until the next Down.
//!
//! ```
//! use quill_core::{ContactAction, DeviceGeometry, Point, Sample};
//! use quill_gesture::{FlickDetector, FlickThresholds};
//!
//! let mut flick = FlickDetector::with_thresholds(FlickThresholds::PRECISE);
//! let pen = DeviceGeometry::pen();
//!
//! flick.update(&Sample::contact(ContactAction::Down, 0, Point::ORIGIN), &pen, true);
//! for (t, x) in [(50, 300.0), (100, 600.0), (150, 900.0)] {
//!     flick.update(&Sample::contact(ContactAction::Move, t, Point::new(x, 0.0)), &pen, false);
//! }
//! flick.update(&Sample::contact(ContactAction::Up, 150, Point::new(900.0, 0.0)), &pen, false);
//!
//! assert!(flick.result().can_be_flick);
//! assert_eq!(flick.result().physical_length, 900);
//! ```

use quill_core::{ContactAction, DeviceGeometry, Point, Rect, Sample, Size};
use serde::Serialize;

/// Elapsed time in contact after which analysis starts regardless of distance.
///
/// Kept well below the platform's 300 ms system-gesture timeout so feedback
/// can still be shown in time.
pub const THRESHOLD_TIME_MS: f64 = 150.0;

/// Distance from the start point after which analysis starts.
pub const THRESHOLD_LENGTH: f64 = 100.0;

/// After this long in contact the pen counts as having moved from pen-down.
pub const MAX_PEN_DOWN_WAIT_MS: f64 = 3000.0;

/// Smoothing factor for the inter-sample period average.
pub const PERIOD_ALPHA: f64 = 0.001;

/// Inter-sample period assumed before any samples were seen.
pub const DEFAULT_PERIOD_MS: f64 = 8.0;

/// Tick deltas above this are clock anomalies and are not averaged.
const MAX_TICK_DELTA: i32 = 1000;

/// Relative curvature only counts for strokes longer than this.
const CURVATURE_MIN_LENGTH: f64 = 500.0;

/// Path excess that must accompany a failing length ratio.
const CURVATURE_MIN_DEVIATION: f64 = 200.0;

/// Path excess that fails a stroke on its own.
const CURVATURE_MAX_DEVIATION: f64 = 300.0;

/// Acceptance thresholds for a flick, in physical units and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlickThresholds {
    /// Minimum straight-line length.
    pub min_length: f64,
    /// Maximum ratio of path length to straight-line length.
    pub max_length_ratio: f64,
    /// Velocity (units per sample period) below which time counts as dwell.
    pub min_velocity: f64,
    /// Maximum duration of the whole stroke.
    pub max_time: f64,
    /// Maximum accumulated low-velocity dwell.
    pub max_stationary_time: f64,
    /// Horizontal extent of the pen-down neighbourhood.
    pub max_stationary_displacement_x: f64,
    /// Vertical extent of the pen-down neighbourhood.
    pub max_stationary_displacement_y: f64,
}

impl FlickThresholds {
    /// Lenient preset, tolerance 0.
    pub const RELAXED: Self = Self {
        min_length: 400.0,
        max_length_ratio: 1.1,
        min_velocity: 8.0,
        max_time: 300.0,
        max_stationary_time: 45.0,
        max_stationary_displacement_x: 150.0,
        max_stationary_displacement_y: 150.0,
    };

    /// Strict preset, tolerance 1.
    pub const PRECISE: Self = Self {
        min_length: 800.0,
        max_length_ratio: 1.01,
        min_velocity: 19.0,
        max_time: 200.0,
        max_stationary_time: 45.0,
        max_stationary_displacement_x: 0.0,
        max_stationary_displacement_y: 0.0,
    };

    /// Linear blend of the presets: `t * PRECISE + (1 - t) * RELAXED`.
    ///
    /// `t` is not range-checked here; [`FlickDetector::set_tolerance`] is the
    /// validating entry point.
    #[must_use]
    pub fn interpolate(t: f64) -> Self {
        let blend = |precise: f64, relaxed: f64| t * precise + (1.0 - t) * relaxed;
        let (p, r) = (Self::PRECISE, Self::RELAXED);
        Self {
            min_length: blend(p.min_length, r.min_length),
            max_length_ratio: blend(p.max_length_ratio, r.max_length_ratio),
            min_velocity: blend(p.min_velocity, r.min_velocity),
            max_time: blend(p.max_time, r.max_time),
            max_stationary_time: blend(p.max_stationary_time, r.max_stationary_time),
            max_stationary_displacement_x: blend(
                p.max_stationary_displacement_x,
                r.max_stationary_displacement_x,
            ),
            max_stationary_displacement_y: blend(
                p.max_stationary_displacement_y,
                r.max_stationary_displacement_y,
            ),
        }
    }
}

impl Default for FlickThresholds {
    fn default() -> Self {
        Self::interpolate(quill_core::DEFAULT_TOLERANCE)
    }
}

/// Verdict and metrics for the current or last contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlickResult {
    /// Start point in physical units.
    pub physical_start: Point,
    /// Start point in tablet coordinates.
    pub tablet_start: Point,
    /// Straight-line length in physical units, rounded.
    pub physical_length: i32,
    /// Straight-line length in tablet units, rounded.
    pub tablet_length: i32,
    /// Direction from start to latest point, degrees in `[0, 360)`.
    pub direction_deg: f64,
    /// Stroke was long enough (only evaluated on Up).
    pub length_ok: bool,
    /// Stroke finished within the time limit.
    pub speed_ok: bool,
    /// Stroke was straight enough.
    pub curvature_ok: bool,
    /// Pen did not dwell before lifting.
    pub lift_ok: bool,
    /// Overall verdict.
    pub can_be_flick: bool,
}

impl Default for FlickResult {
    /// Optimistic until analyzed: the verdict starts positive, the
    /// individual criteria start unevaluated.
    fn default() -> Self {
        Self {
            physical_start: Point::ORIGIN,
            tablet_start: Point::ORIGIN,
            physical_length: 0,
            tablet_length: 0,
            direction_deg: 0.0,
            length_ok: false,
            speed_ok: false,
            curvature_ok: false,
            lift_ok: false,
            can_be_flick: true,
        }
    }
}

/// Previous processed sample, the detector's single point of lag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    physical: Point,
}

#[derive(Debug, Clone, PartialEq)]
struct FlickState {
    collecting: bool,
    analyzing: bool,
    moved_enough_from_pen_down: bool,
    physical_start: Point,
    tablet_start: Point,
    start_time: u32,
    last_tick: Option<u32>,
    stable_rect: Rect,
    pen_down_distance: f64,
    path_length: f64,
    flick_length: f64,
    tablet_length: f64,
    direction: f64,
    elapsed_ms: f64,
    low_velocity_ms: f64,
    previous: Option<Snapshot>,
}

impl FlickState {
    fn new(allow_press_flicks: bool) -> Self {
        Self {
            collecting: false,
            analyzing: false,
            moved_enough_from_pen_down: !allow_press_flicks,
            physical_start: Point::ORIGIN,
            tablet_start: Point::ORIGIN,
            start_time: 0,
            last_tick: None,
            stable_rect: Rect::default(),
            pen_down_distance: 0.0,
            path_length: 0.0,
            flick_length: 0.0,
            tablet_length: 0.0,
            direction: 0.0,
            elapsed_ms: 0.0,
            low_velocity_ms: 0.0,
            previous: None,
        }
    }
}

/// Per-contact flick classifier.
#[derive(Debug, Clone)]
pub struct FlickDetector {
    thresholds: FlickThresholds,
    allow_press_flicks: bool,
    /// Smoothed inter-sample period; survives resets since it describes the device.
    period_ms: f64,
    state: FlickState,
    result: FlickResult,
}

impl FlickDetector {
    /// Create a detector with the default tolerance of 0.5.
    pub fn new() -> Self {
        Self::with_thresholds(FlickThresholds::default())
    }

    /// Create a detector with explicit thresholds.
    pub fn with_thresholds(thresholds: FlickThresholds) -> Self {
        Self {
            thresholds,
            allow_press_flicks: true,
            period_ms: DEFAULT_PERIOD_MS,
            state: FlickState::new(true),
            result: FlickResult::default(),
        }
    }

    /// Set thresholds from a tolerance in the open interval (0, 1).
    ///
    /// Returns `false` and leaves the thresholds unchanged otherwise.
    #[must_use]
    pub fn set_tolerance(&mut self, tolerance: f64) -> bool {
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return false;
        }
        self.thresholds = FlickThresholds::interpolate(tolerance);
        true
    }

    /// Allow or forbid flicks that start from a stationary press.
    ///
    /// Takes effect at the next Down.
    pub fn set_allow_press_flicks(&mut self, allow: bool) {
        self.allow_press_flicks = allow;
    }

    /// Whether press-initiated flicks are allowed.
    pub fn allow_press_flicks(&self) -> bool {
        self.allow_press_flicks
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> &FlickThresholds {
        &self.thresholds
    }

    /// Verdict for the current or last contact.
    pub fn result(&self) -> &FlickResult {
        &self.result
    }

    /// Between Down and Up, unless rejected early.
    pub fn is_collecting(&self) -> bool {
        self.state.collecting
    }

    /// Enough motion or time has accumulated to evaluate the stroke.
    pub fn is_analyzing(&self) -> bool {
        self.state.analyzing
    }

    /// The pen has left the pen-down neighbourhood during this contact.
    pub fn moved_enough_from_pen_down(&self) -> bool {
        self.state.moved_enough_from_pen_down
    }

    /// Smoothed inter-sample period in milliseconds.
    pub fn time_period(&self) -> f64 {
        self.period_ms
    }

    /// Drop all per-contact accumulation.
    pub fn reset(&mut self) {
        self.state = FlickState::new(self.allow_press_flicks);
        self.result = FlickResult::default();
    }

    /// Feed one sample of the contact.
    ///
    /// Samples from devices other than pens are ignored.
    pub fn update(&mut self, sample: &Sample, geometry: &DeviceGeometry, is_first_sample: bool) {
        if !geometry.pointer_type.is_pen() {
            return;
        }

        match sample.action {
            ContactAction::Down => {
                self.reset();
                self.state.collecting = true;
                self.process_packet(sample, geometry, true);
                if self.state.analyzing {
                    self.analyze(false);
                }
            }
            ContactAction::Move => {
                if !self.state.collecting {
                    return;
                }
                self.process_packet(sample, geometry, is_first_sample);
                if self.state.analyzing {
                    self.analyze(false);
                }
            }
            ContactAction::Up => {
                if !self.state.collecting {
                    return;
                }
                self.process_packet(sample, geometry, is_first_sample);
                if self.state.analyzing {
                    self.analyze(true);
                } else {
                    // never got far enough to be judged
                    self.result.can_be_flick = false;
                }
                self.state.collecting = false;
                self.state.analyzing = false;
            }
        }
    }

    fn process_packet(&mut self, sample: &Sample, geometry: &DeviceGeometry, is_first: bool) {
        let tick_delta = self.state.last_tick.and_then(|prev| {
            let raw = sample.timestamp.wrapping_sub(prev) as i32;
            (0..=MAX_TICK_DELTA).contains(&raw).then_some(f64::from(raw))
        });
        if let Some(delta) = tick_delta {
            self.period_ms = PERIOD_ALPHA * delta + (1.0 - PERIOD_ALPHA) * self.period_ms;
        }
        self.state.last_tick = Some(sample.timestamp);

        let physical = geometry.to_physical(sample.tablet);
        if is_first {
            self.start_gesture(physical, sample);
            return;
        }

        let elapsed = sample.timestamp.wrapping_sub(self.state.start_time) as i32;
        self.state.elapsed_ms = f64::from(elapsed.max(0));

        if !self.state.moved_enough_from_pen_down {
            self.check_moved_enough(physical);
        }

        if self.state.moved_enough_from_pen_down && !self.state.analyzing {
            self.check_with_threshold(physical);
        }

        let accumulate = self.state.analyzing;
        self.add_point(physical, sample, tick_delta, accumulate);
    }

    fn start_gesture(&mut self, physical: Point, sample: &Sample) {
        let th = &self.thresholds;
        let state = &mut self.state;
        state.physical_start = physical;
        state.tablet_start = sample.tablet;
        state.start_time = sample.timestamp;
        state.elapsed_ms = 0.0;
        state.stable_rect = Rect::centered(
            physical,
            Size::new(
                th.max_stationary_displacement_x,
                th.max_stationary_displacement_y,
            ),
        );
        state.pen_down_distance = 0.0;
        state.path_length = 0.0;
        state.flick_length = 0.0;
        state.tablet_length = 0.0;
        state.direction = 0.0;
        state.low_velocity_ms = 0.0;
        state.previous = Some(Snapshot { physical });
        log::trace!(
            "flick: gesture start at {:?} (tablet {:?})",
            physical,
            sample.tablet
        );
    }

    fn check_moved_enough(&mut self, physical: Point) {
        let th = &self.thresholds;
        let state = &mut self.state;
        let Some(previous) = state.previous else {
            return;
        };

        let jump = physical.distance(&previous.physical);
        state.pen_down_distance += jump;

        let max_jump = th.min_velocity * self.period_ms;
        let max_displacement = th
            .max_stationary_displacement_x
            .max(th.max_stationary_displacement_y);

        if jump > max_jump
            || state.pen_down_distance > max_displacement
            || !state.stable_rect.contains_point(&physical)
            || state.elapsed_ms > MAX_PEN_DOWN_WAIT_MS
        {
            state.moved_enough_from_pen_down = true;
            log::trace!(
                "flick: moved from pen-down after {:.0} ms, {:.1} units",
                state.elapsed_ms,
                state.pen_down_distance
            );
        }
    }

    fn check_with_threshold(&mut self, physical: Point) {
        let displacement = physical.distance(&self.state.physical_start);
        if displacement > THRESHOLD_LENGTH || self.state.elapsed_ms > THRESHOLD_TIME_MS {
            self.state.analyzing = true;
            log::trace!(
                "flick: analyzing after {:.0} ms, {displacement:.1} units",
                self.state.elapsed_ms
            );
        }
    }

    fn add_point(
        &mut self,
        physical: Point,
        sample: &Sample,
        tick_delta: Option<f64>,
        accumulate: bool,
    ) {
        let min_velocity = self.thresholds.min_velocity;
        let period = self.period_ms;
        let state = &mut self.state;
        let Some(previous) = state.previous else {
            return;
        };

        let displacement = physical.distance(&previous.physical);
        let velocity = if period > 0.0 {
            displacement / period
        } else {
            0.0
        };

        if accumulate {
            state.path_length += displacement;
            if velocity < min_velocity {
                state.low_velocity_ms += tick_delta.unwrap_or(period);
            }
        }

        state.flick_length = physical.distance(&state.physical_start);
        state.tablet_length = sample.tablet.distance(&state.tablet_start);
        state.direction = state.physical_start.angle_to(&physical);
        state.previous = Some(Snapshot { physical });
        log::trace!("flick: segment {displacement:.1} units, velocity {velocity:.2}");
    }

    /// Recompute the verdict; `decide` marks the final pass on Up.
    fn analyze(&mut self, decide: bool) {
        let th = &self.thresholds;
        let state = &self.state;

        let mut result = FlickResult {
            physical_start: state.physical_start,
            tablet_start: state.tablet_start,
            physical_length: state.flick_length.round() as i32,
            tablet_length: state.tablet_length.round() as i32,
            direction_deg: direction_degrees(state.direction),
            length_ok: true,
            speed_ok: true,
            curvature_ok: true,
            lift_ok: true,
            can_be_flick: true,
        };

        if state.low_velocity_ms > th.max_stationary_time {
            result.lift_ok = false;
        }

        if state.elapsed_ms > th.max_time {
            result.speed_ok = false;
        }

        if !curvature_ok(state.path_length, state.flick_length, th.max_length_ratio) {
            result.curvature_ok = false;
        }

        if decide && state.flick_length < th.min_length {
            result.length_ok = false;
        }

        result.can_be_flick =
            result.lift_ok && result.speed_ok && result.curvature_ok && result.length_ok;
        self.result = result;

        if !result.can_be_flick || decide {
            log::debug!(
                "flick: verdict {} (length {}, speed {}, curvature {}, lift {}) after {:.0} ms",
                result.can_be_flick,
                result.length_ok,
                result.speed_ok,
                result.curvature_ok,
                result.lift_ok,
                state.elapsed_ms
            );
            self.state.collecting = false;
            self.state.analyzing = false;
        }
    }
}

impl Default for FlickDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-tier straightness check: a relative test for long strokes plus an
/// absolute ceiling on path excess for any stroke.
fn curvature_ok(path_length: f64, straight_length: f64, max_ratio: f64) -> bool {
    let deviation = path_length - straight_length;
    let too_curved = straight_length > CURVATURE_MIN_LENGTH
        && path_length / straight_length > max_ratio
        && deviation > CURVATURE_MIN_DEVIATION;
    !(too_curved || deviation > CURVATURE_MAX_DEVIATION)
}

fn direction_degrees(radians: f64) -> f64 {
    let deg = radians.to_degrees().rem_euclid(360.0);
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}
