//! Resolution modes and calendar-style navigation.
//!
//! A resolution mode caps how wide a navigable window may be and supplies
//! the window shown when the mode is first selected. The functions here are
//! pure: they take the active mode, the current window and the dataset's
//! available range, and return the derived state or the next window.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

use crate::state::{
    days, DateRange, Direction, NavigationState, DEFAULT_NAVIGATION_OVERLAP,
    MAX_NAVIGATION_OVERLAP,
};

/// Returned when a mode key is not one of the known resolution modes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown resolution mode: {0}")]
pub struct UnknownModeError(pub String);

/// Named class of navigation window size, widest first
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
)]
pub enum ResolutionMode {
    /// Entire dataset
    #[default]
    #[serde(rename = "full")]
    #[strum(serialize = "full")]
    Full,
    #[serde(rename = "1year")]
    #[strum(serialize = "1year")]
    OneYear,
    #[serde(rename = "6months")]
    #[strum(serialize = "6months")]
    SixMonths,
    #[serde(rename = "1month")]
    #[strum(serialize = "1month")]
    OneMonth,
}

/// Static configuration for a resolution mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionConfig {
    /// Widest window allowed in this mode, in days. `None` = unbounded
    pub max_time_span_days: Option<f64>,
    /// Window width shown when the mode is selected. `None` = whole dataset
    pub default_span_days: Option<f64>,
    pub label: &'static str,
    pub icon: &'static str,
}

const FULL: ResolutionConfig = ResolutionConfig {
    max_time_span_days: None,
    default_span_days: None,
    label: "Full Range",
    icon: "\u{1F310}", // Globe
};

const ONE_YEAR: ResolutionConfig = ResolutionConfig {
    max_time_span_days: Some(365.0),
    default_span_days: Some(365.0),
    label: "1 Year",
    icon: "\u{1F4C5}", // Calendar
};

const SIX_MONTHS: ResolutionConfig = ResolutionConfig {
    max_time_span_days: Some(182.0),
    default_span_days: Some(182.0),
    label: "6 Months",
    icon: "\u{1F4C6}", // Tear-off calendar
};

const ONE_MONTH: ResolutionConfig = ResolutionConfig {
    max_time_span_days: Some(31.0),
    default_span_days: Some(31.0),
    label: "1 Month",
    icon: "\u{1F5D3}", // Spiral calendar
};

impl ResolutionMode {
    /// Look up a mode by its key (e.g. `"6months"`)
    pub fn parse(key: &str) -> Result<Self, UnknownModeError> {
        key.parse::<ResolutionMode>()
            .map_err(|_| UnknownModeError(key.to_string()))
    }

    /// All modes, widest first
    pub fn all() -> impl Iterator<Item = ResolutionMode> {
        ResolutionMode::iter()
    }

    pub fn config(&self) -> &'static ResolutionConfig {
        get_resolution_config(*self)
    }

    pub fn label(&self) -> &'static str {
        self.config().label
    }

    pub fn icon(&self) -> &'static str {
        self.config().icon
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Static lookup of a mode's configuration
pub fn get_resolution_config(mode: ResolutionMode) -> &'static ResolutionConfig {
    match mode {
        ResolutionMode::Full => &FULL,
        ResolutionMode::OneYear => &ONE_YEAR,
        ResolutionMode::SixMonths => &SIX_MONTHS,
        ResolutionMode::OneMonth => &ONE_MONTH,
    }
}

/// Window shown when `mode` is selected.
///
/// Full mode shows everything. Other modes show their default span anchored
/// at the newest data when `anchor_to_latest` is set, otherwise at the
/// oldest. The result never exceeds `available`.
pub fn get_default_date_range(
    mode: ResolutionMode,
    available: &DateRange,
    anchor_to_latest: bool,
) -> DateRange {
    let Some(default_days) = mode.config().default_span_days else {
        return *available;
    };

    let span = days(default_days).min(available.span());
    if anchor_to_latest {
        DateRange::new(available.end - span, available.end)
    } else {
        DateRange::new(available.start, available.start + span)
    }
}

/// Locate `current` within `available`.
///
/// `position` is 0.0 when the window sits at the start of the data and 1.0
/// at the end. A window covering the whole range reports 0.0.
pub fn calculate_navigation_state(
    mode: ResolutionMode,
    current: &DateRange,
    available: &DateRange,
) -> NavigationState {
    let free_ms = (available.span() - current.span()).num_milliseconds();
    let position = if free_ms <= 0 {
        0.0
    } else {
        let offset_ms = (current.start - available.start).num_milliseconds();
        (offset_ms as f64 / free_ms as f64).clamp(0.0, 1.0)
    };

    let state = NavigationState {
        position,
        can_navigate_left: current.start > available.start,
        can_navigate_right: current.end < available.end,
    };

    tracing::debug!(
        "{} navigation state: position {:.3}, left {}, right {}",
        mode.label(),
        state.position,
        state.can_navigate_left,
        state.can_navigate_right
    );

    state
}

/// Bring a requested overlap into `[0, MAX_NAVIGATION_OVERLAP]`
fn sanitize_overlap(overlap_fraction: f64) -> f64 {
    if overlap_fraction.is_finite() {
        overlap_fraction.clamp(0.0, MAX_NAVIGATION_OVERLAP)
    } else {
        DEFAULT_NAVIGATION_OVERLAP
    }
}

/// Window after one navigation step.
///
/// The window moves by `(1 - overlap_fraction)` of its span so part of the
/// previous window stays visible, then both endpoints are clamped into
/// `available`. The span only shrinks when a step runs into the edge of the
/// data. A step that would leave nothing of the window returns `current`.
pub fn calculate_next_navigation_range(
    mode: ResolutionMode,
    current: &DateRange,
    direction: Direction,
    available: &DateRange,
    overlap_fraction: f64,
) -> DateRange {
    if current.is_degenerate() || available.is_degenerate() {
        return current.clamp_to(available);
    }

    let overlap = sanitize_overlap(overlap_fraction);
    let span_ms = current.span().num_milliseconds() as f64;
    let shift = chrono::Duration::milliseconds(((1.0 - overlap) * span_ms).round() as i64);

    let shifted = match direction {
        Direction::Left => DateRange::new(current.start - shift, current.end - shift),
        Direction::Right => DateRange::new(current.start + shift, current.end + shift),
    };
    let next = shifted.clamp_to(available);
    if next.is_degenerate() {
        return current.clamp_to(available);
    }

    tracing::debug!(
        "{} step {:?}: {} -> {}",
        mode.label(),
        direction,
        current.start,
        next.start
    );

    next
}

/// Validate a requested window against a mode and the available data.
///
/// A window wider than the mode allows is narrowed around its centre, then
/// moved inside `available` keeping its span where possible.
pub fn constrain_range(
    mode: ResolutionMode,
    candidate: &DateRange,
    available: &DateRange,
) -> DateRange {
    let capped = match mode.config().max_time_span_days {
        Some(max_days) if candidate.span() > days(max_days) => {
            let max_span = days(max_days);
            let centre = candidate.start + candidate.span() / 2;
            let start = centre - max_span / 2;
            DateRange::new(start, start + max_span)
        }
        _ => *candidate,
    };
    capped.slide_into(available)
}
