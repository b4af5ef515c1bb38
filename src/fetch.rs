//! Data store boundary and stale-response suppression.
//!
//! The engine never talks to storage directly. It asks a [`ReadingStore`]
//! for a window at a rate, and tags every request with a generation token
//! from [`RequestTracker`]. Only the response carrying the newest token is
//! applied; anything older has been superseded by a later pan or zoom and
//! is dropped on arrival.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampling::SamplingRate;
use crate::state::{ensure_sorted, DateRange, Reading};

/// Identifier of a monitored well
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellId(pub String);

impl WellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors reported by a reading store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The store could not be reached or timed out
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something that is not a reading sequence
    #[error("Invalid response from data store: {0}")]
    InvalidResponse(String),

    /// The store has no such well
    #[error("Unknown well: {0}")]
    UnknownWell(WellId),
}

impl FetchError {
    /// Whether re-issuing the same query may succeed.
    /// The engine itself never retries; this guides the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Unavailable(_))
    }
}

/// External source of well readings
pub trait ReadingStore {
    /// Readings for `well` within `range`, ideally already sampled at `rate`
    fn fetch_readings(
        &self,
        well: &WellId,
        range: &DateRange,
        rate: SamplingRate,
    ) -> Result<Vec<Reading>, FetchError>;

    /// True when the store applies `rate` server-side, so responses need no
    /// client-side aggregation
    fn applies_sampling(&self) -> bool {
        false
    }
}

// ============================================================================
// Generation Tokens
// ============================================================================

/// Token identifying one issued fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A fetch the caller should perform
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub generation: Generation,
    pub well: WellId,
    pub range: DateRange,
    pub rate: SamplingRate,
}

/// Hands out monotonically increasing tokens and recognizes stale ones
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token that supersedes every earlier one
    pub fn next(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// True when `generation` is the most recently issued token
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest != 0 && generation.0 == self.latest
    }

    /// Invalidate every outstanding request without issuing a new one
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Reading store over an owned dataset. Returns raw readings; sampling is
/// left to the client-side aggregator.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    well: WellId,
    readings: Vec<Reading>,
}

impl MemoryStore {
    /// Create a store for one well. Readings are sorted on construction.
    pub fn new(well: WellId, mut readings: Vec<Reading>) -> Self {
        ensure_sorted(&mut readings);
        Self { well, readings }
    }

    pub fn well(&self) -> &WellId {
        &self.well
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// True min/max timestamps of the dataset
    pub fn available_range(&self) -> Option<DateRange> {
        let first = self.readings.first()?;
        let last = self.readings.last()?;
        Some(DateRange::new(first.timestamp, last.timestamp))
    }
}

impl ReadingStore for MemoryStore {
    fn fetch_readings(
        &self,
        well: &WellId,
        range: &DateRange,
        _rate: SamplingRate,
    ) -> Result<Vec<Reading>, FetchError> {
        if *well != self.well {
            return Err(FetchError::UnknownWell(well.clone()));
        }

        // A range built by struct literal may still be reversed
        let range = DateRange::new(range.start, range.end);
        let start = self.readings.partition_point(|r| r.timestamp < range.start);
        let end = self.readings.partition_point(|r| r.timestamp <= range.end);
        Ok(self.readings[start..end].to_vec())
    }
}
