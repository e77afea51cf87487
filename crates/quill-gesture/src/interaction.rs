//! Seam to a platform interaction recognizer.
//!
//! The platform recognizer classifies raw contacts into taps, holds and
//! manipulations. Quill does not implement one; it layers flick, drag and
//! hold arbitration on top of whatever recognizer the host provides.

use quill_core::{Point, Sample};
use serde::{Deserialize, Serialize};

/// What the platform recognizer saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Primary tap.
    Tap,
    /// Secondary tap.
    SecondaryTap,
    /// Press and hold.
    Hold,
    /// Translation manipulation.
    Manipulation,
}

/// Begin/end markers of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionFlags {
    /// First output of the interaction.
    pub begin: bool,
    /// Last output of the interaction.
    pub end: bool,
    /// Interaction was cancelled.
    pub cancel: bool,
}

impl InteractionFlags {
    /// Flags for the first output of an interaction.
    pub const BEGIN: Self = Self {
        begin: true,
        end: false,
        cancel: false,
    };

    /// Flags for the last output of an interaction.
    pub const END: Self = Self {
        begin: false,
        end: true,
        cancel: false,
    };

    /// Flags for an output in the middle of an interaction.
    pub const NONE: Self = Self {
        begin: false,
        end: false,
        cancel: false,
    };

    /// The interaction is over, normally or not.
    pub const fn is_finished(self) -> bool {
        self.end || self.cancel
    }
}

/// One output event of the platform recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionOutput {
    /// Interaction kind.
    pub kind: InteractionKind,
    /// Begin/end markers.
    #[serde(default)]
    pub flags: InteractionFlags,
    /// Position in device pixels.
    pub position: Point,
    /// Cumulative translation since the interaction began, in device pixels.
    #[serde(default)]
    pub translation: Point,
    /// Tick count.
    #[serde(default)]
    pub timestamp: u32,
}

impl InteractionOutput {
    /// Create an output with zero translation.
    pub fn new(
        kind: InteractionKind,
        flags: InteractionFlags,
        position: Point,
        timestamp: u32,
    ) -> Self {
        Self {
            kind,
            flags,
            position,
            translation: Point::ORIGIN,
            timestamp,
        }
    }

    /// Create a manipulation output carrying a cumulative translation.
    pub fn manipulation(
        flags: InteractionFlags,
        position: Point,
        translation: Point,
        timestamp: u32,
    ) -> Self {
        Self {
            translation,
            ..Self::new(InteractionKind::Manipulation, flags, position, timestamp)
        }
    }
}

/// A platform recognizer driven sample by sample.
pub trait InteractionRecognizer {
    /// Feed one sample and collect any outputs it produced.
    fn process(&mut self, sample: &Sample) -> Vec<InteractionOutput>;
}

/// Recognizer that never reports anything.
///
/// Use it when interaction outputs arrive through
/// [`crate::GestureEngine::on_interaction`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInteractions;

impl InteractionRecognizer for NoInteractions {
    fn process(&mut self, _sample: &Sample) -> Vec<InteractionOutput> {
        Vec::new()
    }
}

impl<F> InteractionRecognizer for F
where
    F: FnMut(&Sample) -> Vec<InteractionOutput>,
{
    fn process(&mut self, sample: &Sample) -> Vec<InteractionOutput> {
        self(sample)
    }
}
