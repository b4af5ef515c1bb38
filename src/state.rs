//! Core data types and constants.
//!
//! This module contains the fundamental data structures shared by every
//! engine component: readings, date ranges, and the derived navigation and
//! sampling results handed to the rendering boundary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::sampling::SamplingRate;

// ============================================================================
// Constants
// ============================================================================

/// Default point budget for a rendered window (mobile-friendly)
pub const DEFAULT_TARGET_POINTS: usize = 1500;

/// Minimum window span used when estimating densities, in minutes.
/// Keeps zero-width windows from collapsing the estimate to nothing.
pub const MIN_SPAN_MINUTES: i64 = 5;

/// Default fraction of the previous window kept visible after a navigation step
pub const DEFAULT_NAVIGATION_OVERLAP: f64 = 0.1;

/// Largest overlap accepted; an overlap of 1.0 would never move the window
pub const MAX_NAVIGATION_OVERLAP: f64 = 0.95;

/// Window/total span ratio below which finer sampling is offered
pub const DEFAULT_HIGH_RES_RATIO: f64 = 0.1;

/// Point count above which an export is considered large
pub const DEFAULT_LARGE_EXPORT_THRESHOLD: u64 = 50_000;

/// Zoom factor applied per wheel tick when zooming out
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

/// Zoom factor applied per wheel tick when zooming in
pub const ZOOM_IN_FACTOR: f64 = 0.9;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ============================================================================
// Readings
// ============================================================================

/// Where a reading came from
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadingSource {
    /// Pressure transducer logged in the well
    #[default]
    Transducer,
    /// Remote telemetry unit
    Telemetry,
    /// Hand measurement taken on site
    Manual,
}

/// A single well observation as returned by the data store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub water_level: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub source: ReadingSource,
}

impl Reading {
    /// Create a transducer reading with only a water level
    pub fn new(timestamp: DateTime<Utc>, water_level: Option<f64>) -> Self {
        Self {
            timestamp,
            water_level,
            temperature: None,
            source: ReadingSource::Transducer,
        }
    }

    /// Builder-style setter for temperature
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder-style setter for the reading source
    pub fn with_source(mut self, source: ReadingSource) -> Self {
        self.source = source;
        self
    }
}

/// Check that readings are ordered by timestamp ascending
pub fn is_sorted_by_time(readings: &[Reading]) -> bool {
    readings
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Sort readings by timestamp in place if they are not already ordered.
/// The sort is stable so readings sharing a timestamp keep their order.
pub fn ensure_sorted(readings: &mut [Reading]) {
    if !is_sorted_by_time(readings) {
        readings.sort_by_key(|r| r.timestamp);
    }
}

// ============================================================================
// Date Ranges
// ============================================================================

/// A closed time window with `start <= end`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RangeEndpoints")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Wire form of a range; endpoints are ordered on the way in
#[derive(Deserialize)]
struct RangeEndpoints {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl From<RangeEndpoints> for DateRange {
    fn from(raw: RangeEndpoints) -> Self {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, ordering the endpoints so `start <= end` always holds
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Build a range from epoch milliseconds, rejecting non-finite or
    /// out-of-range values
    pub fn from_millis(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let start = Utc.timestamp_millis_opt(a.round() as i64).single()?;
        let end = Utc.timestamp_millis_opt(b.round() as i64).single()?;
        Some(Self::new(start, end))
    }

    /// Endpoints as epoch milliseconds
    pub fn as_millis(&self) -> (f64, f64) {
        (
            self.start.timestamp_millis() as f64,
            self.end.timestamp_millis() as f64,
        )
    }

    /// Width of the range
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Width of the range in fractional days
    pub fn span_days(&self) -> f64 {
        self.span().num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// True when `start == end`
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// True when `other` lies entirely within this range
    pub fn encloses(&self, other: &DateRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Clamp both endpoints into `bounds`.
    /// A range lying entirely outside collapses onto the nearest bound.
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end);
        DateRange::new(start, end)
    }

    /// Move the range into `bounds` keeping its width where possible.
    /// The width only shrinks when it exceeds the bounds' own width.
    pub fn slide_into(&self, bounds: &DateRange) -> DateRange {
        let span = self.span();
        if span >= bounds.span() {
            return *bounds;
        }
        if self.start < bounds.start {
            DateRange::new(bounds.start, bounds.start + span)
        } else if self.end > bounds.end {
            DateRange::new(bounds.end - span, bounds.end)
        } else {
            *self
        }
    }

    /// Smallest range covering every reading, or `None` for an empty slice
    pub fn spanning(readings: &[Reading]) -> Option<DateRange> {
        let first = readings.iter().map(|r| r.timestamp).min()?;
        let last = readings.iter().map(|r| r.timestamp).max()?;
        Some(DateRange::new(first, last))
    }
}

/// Convert fractional days to a duration at millisecond precision
pub fn days(days: f64) -> Duration {
    Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

// ============================================================================
// Derived View State
// ============================================================================

/// Where the current window sits within the available data
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NavigationState {
    /// 0.0 = window at the start of the data, 1.0 = at the end
    pub position: f64,
    pub can_navigate_left: bool,
    pub can_navigate_right: bool,
}

/// Recommended rate for a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SamplingDecision {
    pub rate: SamplingRate,
    /// True when `rate` is strictly finer than the rate currently displayed
    pub is_upgrade: bool,
}

/// Pan direction along the time axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards older data
    Left,
    /// Towards newer data
    Right,
}
