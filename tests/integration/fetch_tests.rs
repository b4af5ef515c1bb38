//! Fetch supersession and failure handling
//!
//! Tests cover:
//! - Out-of-order responses: only the newest request is applied
//! - Failed fetches keep the previous readings
//! - Stores that sample server-side skip client aggregation

use std::cell::Cell;

use chrono::Duration;
use wellview::events::{channel, ViewEvent};
use wellview::fetch::{FetchError, MemoryStore, ReadingStore, WellId};
use wellview::navigation::ResolutionMode;
use wellview::sampling::SamplingRate;
use wellview::session::ChartSession;
use wellview::settings::EngineSettings;
use wellview::state::{DateRange, Direction, Reading};

use crate::common::{at, synthetic};

/// Store that fails a configurable number of calls before answering
struct FlakyStore {
    inner: MemoryStore,
    failures_left: Cell<u32>,
}

impl ReadingStore for FlakyStore {
    fn fetch_readings(
        &self,
        well: &WellId,
        range: &DateRange,
        rate: SamplingRate,
    ) -> Result<Vec<Reading>, FetchError> {
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(FetchError::Unavailable("connection reset".to_string()));
        }
        self.inner.fetch_readings(well, range, rate)
    }
}

/// Store that claims to sample server-side but returns whatever it holds
struct SampledStore(MemoryStore);

impl ReadingStore for SampledStore {
    fn fetch_readings(
        &self,
        well: &WellId,
        range: &DateRange,
        rate: SamplingRate,
    ) -> Result<Vec<Reading>, FetchError> {
        self.0.fetch_readings(well, range, rate)
    }

    fn applies_sampling(&self) -> bool {
        true
    }
}

fn memory_store(days: usize) -> MemoryStore {
    MemoryStore::new(WellId::new("PZ-3"), synthetic::logger(at(2021, 1, 1), days))
}

fn session_for(store: &MemoryStore) -> (ChartSession, wellview::events::EventQueue) {
    let (sink, queue) = channel();
    let available = store.available_range().unwrap();
    let session = ChartSession::new(
        store.well().clone(),
        available,
        EngineSettings::default(),
        sink,
    );
    (session, queue)
}

// ============================================
// Supersession Tests
// ============================================

#[test]
fn test_out_of_order_responses() {
    let store = memory_store(400);
    let (mut session, queue) = session_for(&store);
    session.select_mode(ResolutionMode::OneMonth);

    let first = session.begin_fetch();
    let second = session.begin_fetch();
    assert!(second.generation > first.generation);

    let second_result = store.fetch_readings(&second.well, &second.range, second.rate);
    let first_result = store.fetch_readings(&first.well, &first.range, first.rate);

    // Newest arrives first and is applied, the older one is dropped
    assert!(session.apply_fetch_result(&second, second_result, false));
    let applied = session.readings().to_vec();
    assert!(!session.apply_fetch_result(&first, first_result, false));
    assert_eq!(session.readings(), applied.as_slice());

    let ready: Vec<_> = queue
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            ViewEvent::ReadingsReady { generation, .. } => Some(generation),
            _ => None,
        })
        .collect();
    assert_eq!(ready, vec![second.generation]);
}

#[test]
fn test_navigation_supersedes_in_flight_request() {
    let store = memory_store(400);
    let (mut session, _queue) = session_for(&store);
    session.select_mode(ResolutionMode::OneMonth);

    let request = session.begin_fetch();
    session.navigate(Direction::Left);
    let result = store.fetch_readings(&request.well, &request.range, request.rate);
    assert!(!session.apply_fetch_result(&request, result, false));
    assert!(session.readings().is_empty());
}

#[test]
fn test_accepting_upgrade_supersedes_in_flight_request() {
    let store = memory_store(400);
    let (mut session, _queue) = session_for(&store);
    session.select_mode(ResolutionMode::OneMonth);

    let request = session.begin_fetch();
    assert_eq!(session.accept_upgrade(), Some(SamplingRate::OneHour));
    assert!(!session.apply_fetch_result(&request, Ok(Vec::new()), false));

    let refreshed = session.begin_fetch();
    assert_eq!(refreshed.rate, SamplingRate::OneHour);
}

// ============================================
// Failure Tests
// ============================================

#[test]
fn test_failed_fetch_keeps_previous_readings() {
    let store = memory_store(60);
    let (mut session, queue) = session_for(&store);
    session.refresh(&store).unwrap();
    let before = session.readings().to_vec();
    assert!(!before.is_empty());

    let flaky = FlakyStore {
        inner: store.clone(),
        failures_left: Cell::new(1),
    };
    let err = session.refresh(&flaky).unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(session.readings(), before.as_slice());
    assert!(queue
        .drain()
        .iter()
        .any(|e| matches!(e, ViewEvent::FetchFailed { .. })));

    // The caller decides to retry; the second attempt succeeds
    assert_eq!(session.refresh(&flaky).unwrap(), before.len());
}

#[test]
fn test_unknown_well_is_not_retryable() {
    let store = memory_store(10);
    let other = MemoryStore::new(WellId::new("OTHER"), Vec::new());
    let (mut session, _queue) = session_for(&store);
    let err = session.refresh(&other).unwrap_err();
    assert!(matches!(err, FetchError::UnknownWell(_)));
    assert!(!err.is_retryable());
}

// ============================================
// Aggregation Placement Tests
// ============================================

#[test]
fn test_raw_store_is_aggregated_client_side() {
    let store = memory_store(60);
    let (mut session, _queue) = session_for(&store);
    session.refresh(&store).unwrap();
    // 60 days at 15 minutes would be 5760 points, hourly is 1440
    assert_eq!(session.rate(), SamplingRate::OneHour);
    assert!(session.readings().len() <= 60 * 24);
}

#[test]
fn test_sampled_store_output_is_used_as_is() {
    let store = memory_store(2);
    let (mut session, _queue) = session_for(&store);
    let sampled = SampledStore(store.clone());
    let shown = session.refresh(&sampled).unwrap();
    assert_eq!(shown, store.len());
}

#[test]
fn test_unsorted_response_is_sorted_before_use() {
    let store = memory_store(2);
    let (mut session, _queue) = session_for(&store);
    let request = session.begin_fetch();
    let mut readings = synthetic::scattered(at(2021, 1, 1), Duration::hours(40), 50, 21);
    readings.reverse();
    assert!(session.apply_fetch_result(&request, Ok(readings), true));
    crate::common::assertions::assert_ascending(session.readings());
}
