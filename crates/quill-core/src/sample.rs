//! Inbound input samples and the device description they are measured against.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// Logical DPI assumed when a device reports none.
pub const DEFAULT_DPI: f64 = 96.0;

/// Pointer identifier for a single physical contact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
}

impl PointerType {
    /// Pens are the only devices that hover and the only flick candidates.
    #[must_use]
    pub const fn is_pen(self) -> bool {
        matches!(self, Self::Pen)
    }
}

/// Lifecycle tag of a sample within one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactAction {
    /// Contact started.
    Down,
    /// Contact moved (in contact or in air).
    Move,
    /// Contact lifted.
    Up,
}

/// One input observation.
///
/// `timestamp` is a 32-bit millisecond tick count that wraps; consumers
/// use wrapping arithmetic on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Contact source.
    #[serde(default)]
    pub pointer_id: PointerId,
    /// Lifecycle tag.
    pub action: ContactAction,
    /// Tick count in milliseconds.
    pub timestamp: u32,
    /// Position in tablet logical coordinates.
    pub tablet: Point,
    /// Position in device pixels.
    #[serde(default)]
    pub pixel: Point,
    /// Device is hovering above the surface.
    #[serde(default)]
    pub in_air: bool,
    /// Device is within detection range.
    #[serde(default = "default_true")]
    pub in_range: bool,
    /// Device touches the surface.
    #[serde(default)]
    pub in_contact: bool,
    /// Primary button (tip) is pressed.
    #[serde(default)]
    pub is_down: bool,
    /// Barrel button is pressed.
    #[serde(default)]
    pub barrel_button: bool,
}

const fn default_true() -> bool {
    true
}

impl Sample {
    /// Create a contact sample with the contact flags derived from `action`.
    ///
    /// `Down` and `Move` produce an in-contact sample; `Up` produces a sample
    /// that is in range but no longer touching. The pixel position mirrors
    /// the tablet position; use [`Sample::with_pixel`] when they differ.
    #[must_use]
    pub fn contact(action: ContactAction, timestamp: u32, tablet: Point) -> Self {
        let touching = !matches!(action, ContactAction::Up);
        Self {
            pointer_id: PointerId::default(),
            action,
            timestamp,
            tablet,
            pixel: tablet,
            in_air: !touching,
            in_range: true,
            in_contact: touching,
            is_down: touching,
            barrel_button: false,
        }
    }

    /// Create an in-air hover sample.
    #[must_use]
    pub fn hover(timestamp: u32, tablet: Point) -> Self {
        Self {
            in_air: true,
            in_contact: false,
            is_down: false,
            ..Self::contact(ContactAction::Move, timestamp, tablet)
        }
    }

    /// Set the pixel position.
    #[must_use]
    pub const fn with_pixel(mut self, pixel: Point) -> Self {
        self.pixel = pixel;
        self
    }

    /// Set the barrel button state.
    #[must_use]
    pub const fn with_barrel_button(mut self, pressed: bool) -> Self {
        self.barrel_button = pressed;
        self
    }

    /// Set the in-range flag.
    #[must_use]
    pub const fn with_in_range(mut self, in_range: bool) -> Self {
        self.in_range = in_range;
        self
    }
}

/// Immutable description of the device a sample was produced by.
///
/// Passed alongside every sample so recognizers never hold a reference to a
/// live device object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceGeometry {
    /// Device class.
    pub pointer_type: PointerType,
    /// Size of the device rectangle in physical units (1/100 mm).
    pub device_size: Size,
    /// Size of the tablet logical coordinate space.
    pub tablet_size: Size,
    /// Horizontal DPI of the display the device maps onto.
    pub dpi_x: f64,
    /// Vertical DPI of the display the device maps onto.
    pub dpi_y: f64,
    /// Double-tap spatial window in pixels.
    pub double_tap_size: Size,
    /// Double-tap time window in milliseconds.
    pub double_tap_time_ms: u32,
}

impl Default for DeviceGeometry {
    fn default() -> Self {
        Self {
            pointer_type: PointerType::Pen,
            device_size: Size::ZERO,
            tablet_size: Size::ZERO,
            dpi_x: DEFAULT_DPI,
            dpi_y: DEFAULT_DPI,
            double_tap_size: Size::new(4.0, 4.0),
            double_tap_time_ms: 500,
        }
    }
}

impl DeviceGeometry {
    /// Geometry for a pen whose tablet coordinates already are physical units.
    #[must_use]
    pub fn pen() -> Self {
        Self::default()
    }

    /// Geometry for a device of the given type with default metrics.
    #[must_use]
    pub fn for_pointer(pointer_type: PointerType) -> Self {
        Self {
            pointer_type,
            ..Self::default()
        }
    }

    /// Per-axis factor converting tablet logical coordinates to physical units.
    ///
    /// An axis whose device or tablet extent is missing degrades to `1.0`.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        fn axis(device: f64, tablet: f64) -> f64 {
            if device > 0.0 && tablet > 0.0 {
                device / tablet
            } else {
                1.0
            }
        }
        (
            axis(self.device_size.width, self.tablet_size.width),
            axis(self.device_size.height, self.tablet_size.height),
        )
    }

    /// Convert a tablet point to physical units.
    #[must_use]
    pub fn to_physical(&self, tablet: Point) -> Point {
        let (sx, sy) = self.scale();
        tablet.scale(sx, sy)
    }

    /// DPI per axis, with missing values degraded to [`DEFAULT_DPI`].
    #[must_use]
    pub fn dpi(&self) -> (f64, f64) {
        let valid = |d: f64| if d > 0.0 { d } else { DEFAULT_DPI };
        (valid(self.dpi_x), valid(self.dpi_y))
    }
}
