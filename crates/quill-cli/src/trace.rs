//! JSON-lines pointer traces.
//!
//! One record per line, externally tagged:
//!
//! ```text
//! {"geometry": {"pointer_type": "pen", "dpi_x": 96.0, "dpi_y": 96.0}}
//! {"sample": {"action": "down", "timestamp": 0, "tablet": {"x": 0.0, "y": 0.0}, "is_down": true}}
//! {"interaction": {"kind": "tap", "position": {"x": 0.0, "y": 0.0}, "timestamp": 40}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use quill_core::{
    ConfigError, ContactAction, DeviceGeometry, GestureConfig, GestureEvent, Sample,
};
use quill_gesture::{
    FlickDetector, FlickResult, FlickThresholds, GestureEngine, InteractionOutput,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors while reading or replaying a trace.
#[derive(Debug, Error)]
pub(crate) enum TraceError {
    /// IO error reading the trace or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A trace line is not a valid record.
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The gesture config could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TraceRecord {
    /// Pointer sample, measured against the most recent geometry.
    Sample(Sample),
    /// Output of the platform recognizer.
    Interaction(InteractionOutput),
    /// Device change; applies to every following sample.
    Geometry(DeviceGeometry),
}

/// Flick verdict reported at an Up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct FlickReport {
    pub(crate) timestamp: u32,
    #[serde(flatten)]
    pub(crate) result: FlickResult,
}

pub(crate) fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| TraceError::Json {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    log::debug!("trace: {} records", records.len());
    Ok(records)
}

pub(crate) fn load_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let file = std::fs::File::open(path)?;
    read_trace(BufReader::new(file))
}

/// Run a trace through a full [`GestureEngine`].
pub(crate) fn replay(records: &[TraceRecord], config: GestureConfig) -> Vec<GestureEvent> {
    let mut engine = GestureEngine::with_config(config);
    let mut geometry = DeviceGeometry::default();
    let mut events = Vec::new();

    for record in records {
        match record {
            TraceRecord::Geometry(g) => geometry = *g,
            TraceRecord::Sample(sample) => events.extend(engine.update(sample, &geometry)),
            TraceRecord::Interaction(output) => events.extend(engine.on_interaction(output)),
        }
    }
    events
}

/// Run only the flick detector and report its verdict at every pen Up.
pub(crate) fn flick_reports(
    records: &[TraceRecord],
    thresholds: FlickThresholds,
) -> Vec<FlickReport> {
    let mut detector = FlickDetector::with_thresholds(thresholds);
    let mut geometry = DeviceGeometry::default();
    let mut reports = Vec::new();

    for record in records {
        match record {
            TraceRecord::Geometry(g) => geometry = *g,
            TraceRecord::Sample(sample) => {
                detector.update(sample, &geometry, sample.action == ContactAction::Down);
                if sample.action == ContactAction::Up && geometry.pointer_type.is_pen() {
                    reports.push(FlickReport {
                        timestamp: sample.timestamp,
                        result: *detector.result(),
                    });
                }
            }
            TraceRecord::Interaction(_) => {}
        }
    }
    reports
}

/// Thresholds for a tolerance in `[0, 1]`; the end points select the presets.
pub(crate) fn thresholds_for(tolerance: f64) -> Result<FlickThresholds, TraceError> {
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(ConfigError::InvalidValue {
            field: "tolerance",
            message: format!("{tolerance} is outside [0, 1]"),
        }
        .into());
    }
    Ok(FlickThresholds::interpolate(tolerance))
}
