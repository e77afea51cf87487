//! Core types for the Quill pen gesture recognizer.
//!
//! This crate provides the value types shared by the recognizer and its
//! callers:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Inbound input: [`Sample`], [`ContactAction`], [`DeviceGeometry`]
//! - Outbound gestures: [`GestureEvent`], [`GestureKind`]
//! - Configuration: [`GestureConfig`], [`ConfigError`]

mod config;
mod error;
mod event;
mod geometry;
mod sample;

pub use config::{
    GestureConfig, DEFAULT_DRAG_THRESHOLD_INCHES, DEFAULT_HOVER_DELAY_TICKS, DEFAULT_TOLERANCE,
};
pub use error::ConfigError;
pub use event::{GestureEvent, GestureKind};
pub use geometry::{Point, Rect, Size};
pub use sample::{ContactAction, DeviceGeometry, PointerId, PointerType, Sample, DEFAULT_DPI};
