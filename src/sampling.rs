//! Sampling catalog and rate selection.
//!
//! The catalog is a closed set of sampling rates ordered coarsest first.
//! Each rate carries a fixed density (points per day) that the selector uses
//! to estimate how many points a window would produce at that rate.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

use crate::state::{DateRange, SamplingDecision, DEFAULT_HIGH_RES_RATIO, MIN_SPAN_MINUTES};

/// Returned when a rate key is not part of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sampling rate: {0}")]
pub struct UnknownRateError(pub String);

/// Named target data density.
///
/// Variants are declared coarsest first, so the derived ordering means
/// "finer than": `SamplingRate::FifteenMinutes > SamplingRate::Daily`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
)]
pub enum SamplingRate {
    #[serde(rename = "daily")]
    #[strum(serialize = "daily")]
    Daily,
    #[serde(rename = "6hour")]
    #[strum(serialize = "6hour")]
    SixHours,
    #[serde(rename = "1hour")]
    #[strum(serialize = "1hour")]
    OneHour,
    #[serde(rename = "15min")]
    #[strum(serialize = "15min")]
    FifteenMinutes,
}

/// Catalog entry for a sampling rate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateInfo {
    pub label: &'static str,
    pub description: &'static str,
    pub points_per_day: f64,
    pub bucket_minutes: u32,
}

const DAILY: RateInfo = RateInfo {
    label: "Daily",
    description: "One averaged point per day",
    points_per_day: 1.0,
    bucket_minutes: 1440,
};

const SIX_HOURS: RateInfo = RateInfo {
    label: "6 Hours",
    description: "Four averaged points per day",
    points_per_day: 4.0,
    bucket_minutes: 360,
};

const ONE_HOUR: RateInfo = RateInfo {
    label: "Hourly",
    description: "One averaged point per hour",
    points_per_day: 24.0,
    bucket_minutes: 60,
};

const FIFTEEN_MINUTES: RateInfo = RateInfo {
    label: "15 Minutes",
    description: "Full logger resolution, one point every 15 minutes",
    points_per_day: 96.0,
    bucket_minutes: 15,
};

/// Fallback text for rate keys outside the catalog (display only)
pub const UNKNOWN_RATE_DESCRIPTION: &str = "Custom sampling";

impl SamplingRate {
    /// Coarsest rate in the catalog
    pub const COARSEST: SamplingRate = SamplingRate::Daily;

    /// Finest rate in the catalog
    pub const FINEST: SamplingRate = SamplingRate::FifteenMinutes;

    /// Look up a rate by its catalog key (e.g. `"6hour"`)
    pub fn parse(key: &str) -> Result<Self, UnknownRateError> {
        key.parse::<SamplingRate>()
            .map_err(|_| UnknownRateError(key.to_string()))
    }

    /// Catalog entry for this rate
    pub fn info(&self) -> &'static RateInfo {
        match self {
            SamplingRate::Daily => &DAILY,
            SamplingRate::SixHours => &SIX_HOURS,
            SamplingRate::OneHour => &ONE_HOUR,
            SamplingRate::FifteenMinutes => &FIFTEEN_MINUTES,
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn points_per_day(&self) -> f64 {
        self.info().points_per_day
    }

    /// Aggregation bucket width that yields this rate's density
    pub fn bucket_minutes(&self) -> u32 {
        self.info().bucket_minutes
    }

    /// True when `self` is strictly finer than `other`
    pub fn is_finer_than(&self, other: SamplingRate) -> bool {
        *self > other
    }

    /// All rates, coarsest first
    pub fn all() -> impl Iterator<Item = SamplingRate> {
        SamplingRate::iter()
    }
}

impl fmt::Display for SamplingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Window span in days with the minimum floor applied
fn effective_span_days(window: &DateRange) -> f64 {
    let floor = MIN_SPAN_MINUTES as f64 / (24.0 * 60.0);
    window.span_days().max(floor)
}

/// Estimated number of points a window yields at `rate`
pub fn estimated_points(window: &DateRange, rate: SamplingRate) -> f64 {
    effective_span_days(window) * rate.points_per_day()
}

/// Pick the finest rate whose estimated point count fits the budget.
///
/// Falls back to the coarsest rate when nothing fits, so a window is never
/// refused. `current` is the rate the caller is displaying now; the
/// decision is an upgrade only when the selected rate is strictly finer.
pub fn calculate_best_sampling(
    window: &DateRange,
    target_points: usize,
    current: Option<SamplingRate>,
) -> SamplingDecision {
    let budget = target_points as f64;
    let rate = SamplingRate::all()
        .filter(|rate| estimated_points(window, *rate) <= budget)
        .last()
        .unwrap_or(SamplingRate::COARSEST);

    let is_upgrade = current.is_some_and(|current| rate.is_finer_than(current));

    tracing::debug!(
        "Sampling for {:.2} day window with budget {}: {} (upgrade: {})",
        window.span_days(),
        target_points,
        rate,
        is_upgrade
    );

    SamplingDecision { rate, is_upgrade }
}

/// Whether finer sampling should be offered, using the default ratio
pub fn should_show_high_res_options(total_span_days: f64, window_span_days: f64) -> bool {
    should_show_high_res_options_with_ratio(
        total_span_days,
        window_span_days,
        DEFAULT_HIGH_RES_RATIO,
    )
}

/// Whether the visible window is a small enough slice of the dataset that a
/// finer rate is worth offering.
pub fn should_show_high_res_options_with_ratio(
    total_span_days: f64,
    window_span_days: f64,
    ratio: f64,
) -> bool {
    if !total_span_days.is_finite()
        || !window_span_days.is_finite()
        || total_span_days <= 0.0
        || window_span_days < 0.0
    {
        return false;
    }
    window_span_days / total_span_days < ratio
}

/// Human-readable description of a rate
pub fn format_sampling_description(rate: SamplingRate) -> String {
    let info = rate.info();
    format!("{} ({})", info.label, info.description)
}

/// Describe a rate given by key. Unknown keys get a generic fallback
/// instead of an error since this is display-only.
pub fn describe_rate_key(key: &str) -> String {
    match SamplingRate::parse(key) {
        Ok(rate) => format_sampling_description(rate),
        Err(_) => UNKNOWN_RATE_DESCRIPTION.to_string(),
    }
}
