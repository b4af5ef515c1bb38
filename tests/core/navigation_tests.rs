//! Tests for resolution modes and navigation
//!
//! Tests cover:
//! - Mode catalog and key parsing
//! - The one-year step scenario
//! - Position and flag invariants while walking the dataset
//! - Range constraint against mode ceilings

use chrono::Duration;
use wellview::navigation::{
    calculate_navigation_state, calculate_next_navigation_range, constrain_range,
    get_default_date_range, get_resolution_config, ResolutionMode,
};
use wellview::state::{days, DateRange, Direction};

use crate::common::assertions::{assert_close_days, assert_within};
use crate::common::{at, range};

fn available() -> DateRange {
    range(at(2010, 1, 1), at(2024, 1, 1))
}

// ============================================
// Mode Catalog Tests
// ============================================

#[test]
fn test_mode_configs() {
    let full = get_resolution_config(ResolutionMode::Full);
    assert_eq!(full.max_time_span_days, None);
    assert_eq!(full.default_span_days, None);

    let year = get_resolution_config(ResolutionMode::OneYear);
    assert_eq!(year.max_time_span_days, Some(365.0));
    assert_eq!(year.label, "1 Year");

    assert_eq!(
        get_resolution_config(ResolutionMode::OneMonth).max_time_span_days,
        Some(31.0)
    );
}

#[test]
fn test_mode_keys() {
    for mode in ResolutionMode::all() {
        assert_eq!(ResolutionMode::parse(&mode.to_string()).unwrap(), mode);
        assert!(!mode.icon().is_empty());
    }
    let err = ResolutionMode::parse("3months").unwrap_err();
    assert!(err.to_string().contains("3months"));
}

// ============================================
// Step Scenario Tests
// ============================================

#[test]
fn test_one_year_step_right() {
    let current = range(at(2020, 1, 1), at(2021, 1, 1));
    let next = calculate_next_navigation_range(
        ResolutionMode::OneYear,
        &current,
        Direction::Right,
        &available(),
        0.1,
    );

    // 90% of the window's own span
    assert_eq!(next.start, current.start + days(current.span_days() * 0.9));
    assert_eq!(next.span(), current.span());
    assert_within(&next, &available());
}

#[test]
fn test_step_right_near_end_shrinks_to_available() {
    let current = range(at(2023, 3, 1), at(2023, 12, 1));
    let next = calculate_next_navigation_range(
        ResolutionMode::OneYear,
        &current,
        Direction::Right,
        &available(),
        0.1,
    );

    // Moves the full 90% and loses what falls past the end of the data
    assert_eq!(next.start, current.start + days(current.span_days() * 0.9));
    assert_eq!(next.end, at(2024, 1, 1));
    assert!(next.start > at(2023, 11, 1) && next.start < at(2023, 11, 5));
    assert!(next.span() < current.span());
}

#[test]
fn test_step_left_near_start_shrinks_to_available() {
    let current = range(at(2010, 2, 1), at(2010, 8, 1));
    let next = calculate_next_navigation_range(
        ResolutionMode::SixMonths,
        &current,
        Direction::Left,
        &available(),
        0.1,
    );
    assert_eq!(next.start, at(2010, 1, 1));
    assert_eq!(next.end, current.end - days(current.span_days() * 0.9));
    assert_within(&next, &available());
}

#[test]
fn test_step_left_then_right_returns_when_unclamped() {
    let current = range(at(2016, 3, 1), at(2016, 4, 1));
    let left = calculate_next_navigation_range(
        ResolutionMode::OneMonth,
        &current,
        Direction::Left,
        &available(),
        0.25,
    );
    let back = calculate_next_navigation_range(
        ResolutionMode::OneMonth,
        &left,
        Direction::Right,
        &available(),
        0.25,
    );
    assert_eq!(back, current);
}

#[test]
fn test_zero_overlap_steps_full_span() {
    let current = range(at(2016, 1, 1), at(2016, 2, 1));
    let next = calculate_next_navigation_range(
        ResolutionMode::OneMonth,
        &current,
        Direction::Right,
        &available(),
        0.0,
    );
    assert_eq!(next.start, current.end);
}

#[test]
fn test_non_finite_overlap_uses_default() {
    let current = range(at(2016, 1, 1), at(2016, 2, 1));
    let with_nan = calculate_next_navigation_range(
        ResolutionMode::OneMonth,
        &current,
        Direction::Right,
        &available(),
        f64::NAN,
    );
    let with_default = calculate_next_navigation_range(
        ResolutionMode::OneMonth,
        &current,
        Direction::Right,
        &available(),
        0.1,
    );
    assert_eq!(with_nan, with_default);
}

#[test]
fn test_degenerate_window_is_clamped_not_moved() {
    let instant = range(at(2030, 1, 1), at(2030, 1, 1));
    let next = calculate_next_navigation_range(
        ResolutionMode::OneYear,
        &instant,
        Direction::Left,
        &available(),
        0.1,
    );
    assert_eq!(next, range(at(2024, 1, 1), at(2024, 1, 1)));
}

// ============================================
// Invariant Tests
// ============================================

#[test]
fn test_walk_right_keeps_invariants() {
    let mut current = get_default_date_range(ResolutionMode::SixMonths, &available(), false);
    let mut previous_position = -1.0;

    let mut steps = 0;
    loop {
        let state = calculate_navigation_state(ResolutionMode::SixMonths, &current, &available());
        assert!((0.0..=1.0).contains(&state.position));
        assert!(state.position >= previous_position, "position went backwards");
        assert!(state.can_navigate_left || state.can_navigate_right);
        previous_position = state.position;
        if !state.can_navigate_right {
            break;
        }

        current = calculate_next_navigation_range(
            ResolutionMode::SixMonths,
            &current,
            Direction::Right,
            &available(),
            0.1,
        );
        assert_within(&current, &available());
        // Full width everywhere except the last step into the end of the data
        if current.end < available().end {
            assert_close_days(current.span_days(), 182.0);
        } else {
            assert!(current.span_days() <= 182.0 + 1e-6);
        }
        steps += 1;
        assert!(steps < 60, "walk never reached the end");
    }

    assert_eq!(current.end, available().end);
    let state = calculate_navigation_state(ResolutionMode::SixMonths, &current, &available());
    assert_eq!(state.position, 1.0);
}

#[test]
fn test_flags_both_false_only_for_whole_range() {
    let whole = calculate_navigation_state(ResolutionMode::Full, &available(), &available());
    assert!(!whole.can_navigate_left && !whole.can_navigate_right);

    let inner = range(at(2010, 1, 2), at(2024, 1, 1));
    let state = calculate_navigation_state(ResolutionMode::Full, &inner, &available());
    assert!(state.can_navigate_left);
    assert!(!state.can_navigate_right);
}

#[test]
fn test_position_midpoint() {
    let avail = range(at(2020, 1, 1), at(2020, 1, 1) + Duration::days(100));
    let current = range(
        at(2020, 1, 1) + Duration::days(45),
        at(2020, 1, 1) + Duration::days(55),
    );
    let state = calculate_navigation_state(ResolutionMode::OneMonth, &current, &avail);
    assert!((state.position - 0.5).abs() < 1e-9);
}

// ============================================
// Constraint Tests
// ============================================

#[test]
fn test_constrain_narrows_around_centre() {
    let wide = range(at(2014, 1, 1), at(2016, 1, 1));
    let centre = wide.start + wide.span() / 2;
    let constrained = constrain_range(ResolutionMode::OneMonth, &wide, &available());
    assert_close_days(constrained.span_days(), 31.0);
    let new_centre = constrained.start + constrained.span() / 2;
    assert!((new_centre - centre).num_seconds().abs() <= 1);
}

#[test]
fn test_constrain_full_mode_only_clamps() {
    let past_end = range(at(2023, 1, 1), at(2025, 1, 1));
    let constrained = constrain_range(ResolutionMode::Full, &past_end, &available());
    assert_eq!(constrained.end, at(2024, 1, 1));
    assert_eq!(constrained.span(), past_end.span());
}

#[test]
fn test_constrain_wider_than_data_returns_available() {
    let short = range(at(2023, 1, 1), at(2023, 1, 20));
    let candidate = range(at(2022, 12, 1), at(2023, 2, 1));
    assert_eq!(
        constrain_range(ResolutionMode::OneMonth, &candidate, &short),
        short
    );
}
