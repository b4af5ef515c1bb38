//! Export size estimation and JSON export.

use serde::Serialize;

use crate::sampling::{estimated_points, SamplingRate};
use crate::state::{DateRange, Reading, DEFAULT_LARGE_EXPORT_THRESHOLD};

/// Rows an export of `range` at `rate` would contain, rounded up
pub fn estimated_point_count(range: &DateRange, rate: SamplingRate) -> u64 {
    estimated_points(range, rate).ceil() as u64
}

/// Size check shown before an export is requested
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExportEstimate {
    pub rate: SamplingRate,
    pub points: u64,
    /// True when the user should confirm before exporting
    pub is_large: bool,
}

impl ExportEstimate {
    pub fn new(range: &DateRange, rate: SamplingRate) -> Self {
        Self::with_threshold(range, rate, DEFAULT_LARGE_EXPORT_THRESHOLD)
    }

    pub fn with_threshold(range: &DateRange, rate: SamplingRate, threshold: u64) -> Self {
        let points = estimated_point_count(range, rate);
        Self {
            rate,
            points,
            is_large: points > threshold,
        }
    }
}

/// Serialize readings as a pretty-printed JSON array
pub fn export_json(readings: &[Reading]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(readings)
}
