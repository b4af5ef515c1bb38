//! Per-chart view session.
//!
//! A [`ChartSession`] owns everything one chart needs: the active mode,
//! window and rate, the interaction translator, and the fetch generation
//! counter. It reports changes to the embedding view through an
//! [`EventSink`]; nothing is shared between charts.
//!
//! Rate policy: a window that needs a coarser rate switches immediately so
//! the point budget holds. A window that could use a finer rate only
//! produces an upgrade offer, applied through [`ChartSession::accept_upgrade`].

use std::sync::Arc;

use crate::downsample::downsample_to_rate;
use crate::events::{EventSink, ViewEvent};
use crate::export::ExportEstimate;
use crate::fetch::{FetchError, FetchRequest, ReadingStore, RequestTracker, WellId};
use crate::navigation::{
    calculate_navigation_state, calculate_next_navigation_range, constrain_range,
    get_default_date_range, ResolutionMode, UnknownModeError,
};
use crate::sampling::{
    calculate_best_sampling, should_show_high_res_options_with_ratio, SamplingRate,
};
use crate::settings::EngineSettings;
use crate::state::{ensure_sorted, DateRange, Direction, NavigationState, Reading};
use crate::viewport::{AxisScale, InteractionOutcome, InteractionTranslator};

/// View state for one chart of one well.
///
/// Every change to the window or rate goes through the session so it can
/// reconcile the sampling rate, invalidate stale fetches and notify the view.
pub struct ChartSession {
    well: WellId,
    settings: EngineSettings,
    mode: ResolutionMode,
    available: DateRange,
    range: DateRange,
    rate: SamplingRate,
    pending_upgrade: Option<SamplingRate>,
    translator: InteractionTranslator,
    tracker: RequestTracker,
    readings: Arc<[Reading]>,
    events: EventSink,
}

impl ChartSession {
    /// Open a chart on `well` showing the settings' default mode
    pub fn new(
        well: WellId,
        available: DateRange,
        settings: EngineSettings,
        events: EventSink,
    ) -> Self {
        let mode = settings.default_mode;
        let range = get_default_date_range(mode, &available, settings.anchor_to_latest);
        let rate = calculate_best_sampling(&range, settings.target_points, None).rate;
        let translator = InteractionTranslator::new(
            settings.target_points,
            settings.zoom_in_factor,
            settings.zoom_out_factor,
        );

        tracing::info!(
            "Opened chart for {} in {} mode at {} sampling",
            well,
            mode.label(),
            rate
        );

        let session = Self {
            well,
            settings,
            mode,
            available,
            range,
            rate,
            pending_upgrade: None,
            translator,
            tracker: RequestTracker::new(),
            readings: Arc::from(Vec::new()),
            events,
        };
        session.emit_range();
        session
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn well(&self) -> &WellId {
        &self.well
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn available(&self) -> DateRange {
        self.available
    }

    /// Rate of the readings on screen
    pub fn rate(&self) -> SamplingRate {
        self.rate
    }

    /// Finer rate offered for the current window, if any
    pub fn pending_upgrade(&self) -> Option<SamplingRate> {
        self.pending_upgrade
    }

    /// Readings from the last applied fetch
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn navigation_state(&self) -> NavigationState {
        calculate_navigation_state(self.mode, &self.range, &self.available)
    }

    /// Whether the window is a small enough slice of the data to advertise
    /// finer sampling
    pub fn high_res_available(&self) -> bool {
        should_show_high_res_options_with_ratio(
            self.available.span_days(),
            self.range.span_days(),
            self.settings.high_res_ratio,
        )
    }

    pub fn export_estimate(&self) -> ExportEstimate {
        ExportEstimate::with_threshold(
            &self.range,
            self.rate,
            self.settings.large_export_threshold,
        )
    }

    // ------------------------------------------------------------------------
    // Mode & Navigation
    // ------------------------------------------------------------------------

    /// Switch mode and reset to its default window
    pub fn select_mode(&mut self, mode: ResolutionMode) -> InteractionOutcome {
        tracing::debug!("Mode change: {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
        self.reset_view()
    }

    /// Switch mode by key, e.g. `"6months"`
    pub fn select_mode_key(&mut self, key: &str) -> Result<InteractionOutcome, UnknownModeError> {
        let mode = ResolutionMode::parse(key)?;
        Ok(self.select_mode(mode))
    }

    /// Return to the active mode's default window
    pub fn reset_view(&mut self) -> InteractionOutcome {
        let range =
            get_default_date_range(self.mode, &self.available, self.settings.anchor_to_latest);
        self.settle(range)
    }

    /// Step one window towards older or newer data. The window stays put
    /// when it already touches the data edge in that direction.
    pub fn navigate(&mut self, direction: Direction) -> InteractionOutcome {
        let state = self.navigation_state();
        let blocked = match direction {
            Direction::Left => !state.can_navigate_left,
            Direction::Right => !state.can_navigate_right,
        };
        if blocked {
            return self.settle(self.range);
        }

        let range = calculate_next_navigation_range(
            self.mode,
            &self.range,
            direction,
            &self.available,
            self.settings.navigation_overlap,
        );
        self.settle(range)
    }

    /// Replace the available data extent, e.g. after new readings arrive.
    /// The current window is kept where possible.
    pub fn set_available(&mut self, available: DateRange) -> InteractionOutcome {
        self.available = available;
        let range = constrain_range(self.mode, &self.range, &self.available);
        self.settle(range)
    }

    // ------------------------------------------------------------------------
    // Viewport Interaction
    // ------------------------------------------------------------------------

    /// Apply one wheel event. `None` when the axis or delta is degenerate.
    pub fn on_wheel(
        &mut self,
        scale: &AxisScale,
        pivot_pixel: f64,
        wheel_delta: f64,
    ) -> Option<InteractionOutcome> {
        let candidate = self.translator.zoom(scale, pivot_pixel, wheel_delta)?;
        Some(self.settle_candidate(candidate))
    }

    pub fn begin_drag(&mut self, scale: AxisScale) {
        self.translator.begin_drag(scale);
    }

    /// Window to preview while dragging. Does not change the session.
    pub fn drag_to(&self, total_delta_pixels: f64) -> Option<DateRange> {
        let candidate = self.translator.drag_to(total_delta_pixels)?;
        Some(constrain_range(self.mode, &candidate, &self.available))
    }

    /// Finish a drag and commit its window
    pub fn end_drag(&mut self, total_delta_pixels: f64) -> Option<InteractionOutcome> {
        let candidate = self.translator.end_drag(total_delta_pixels)?;
        Some(self.settle_candidate(candidate))
    }

    pub fn cancel_drag(&mut self) {
        self.translator.cancel_drag();
    }

    /// Switch to the offered finer rate. Returns the new rate, or `None`
    /// when nothing was on offer.
    pub fn accept_upgrade(&mut self) -> Option<SamplingRate> {
        let rate = self.pending_upgrade.take()?;
        tracing::info!("Upgrade accepted: {} -> {}", self.rate, rate);
        self.set_rate(rate);
        Some(rate)
    }

    /// Turn down the current offer. It comes back if a later window
    /// qualifies again.
    pub fn decline_upgrade(&mut self) {
        self.pending_upgrade = None;
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Request for the current window and rate. Supersedes any request
    /// issued earlier.
    pub fn begin_fetch(&mut self) -> FetchRequest {
        FetchRequest {
            generation: self.tracker.next(),
            well: self.well.clone(),
            range: self.range,
            rate: self.rate,
        }
    }

    /// Apply the response to `request`.
    ///
    /// Returns false when the response is stale and was dropped. Raw
    /// responses are aggregated to the request's rate unless
    /// `store_sampled` says the store already did so.
    pub fn apply_fetch_result(
        &mut self,
        request: &FetchRequest,
        result: Result<Vec<Reading>, FetchError>,
        store_sampled: bool,
    ) -> bool {
        if !self.tracker.is_current(request.generation) {
            tracing::warn!(
                "Dropping stale response for {} (generation {})",
                request.well,
                request.generation.value()
            );
            return false;
        }

        match result {
            Ok(mut readings) => {
                ensure_sorted(&mut readings);
                let raw_count = readings.len();
                if !store_sampled {
                    readings = downsample_to_rate(&readings, request.rate);
                }
                tracing::info!(
                    "Applied {} readings ({} raw) for {} at {} sampling",
                    readings.len(),
                    raw_count,
                    request.well,
                    request.rate
                );
                self.readings = readings.into();
                self.events.emit(ViewEvent::ReadingsReady {
                    generation: request.generation,
                    rate: request.rate,
                    readings: Arc::clone(&self.readings),
                });
            }
            Err(error) => {
                tracing::warn!("Fetch for {} failed: {}", request.well, error);
                self.events.emit(ViewEvent::FetchFailed {
                    generation: request.generation,
                    error,
                });
            }
        }
        true
    }

    /// Fetch the current window from `store` and apply it synchronously
    pub fn refresh<S: ReadingStore + ?Sized>(&mut self, store: &S) -> Result<usize, FetchError> {
        let request = self.begin_fetch();
        let result = store.fetch_readings(&request.well, &request.range, request.rate);
        let error = result.as_ref().err().cloned();
        self.apply_fetch_result(&request, result, store.applies_sampling());
        match error {
            Some(e) => Err(e),
            None => Ok(self.readings.len()),
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn settle_candidate(&mut self, candidate: DateRange) -> InteractionOutcome {
        let range = constrain_range(self.mode, &candidate, &self.available);
        self.settle(range)
    }

    /// Commit a validated window and reconcile the rate with it
    fn settle(&mut self, range: DateRange) -> InteractionOutcome {
        if range != self.range {
            self.range = range;
            // Responses for the old window no longer apply
            self.tracker.invalidate();
            self.emit_range();
        }

        let outcome = self.translator.complete(range, self.rate);
        let selected = outcome.decision.rate;

        if let Some(offer) = outcome.upgrade_offer {
            if self.pending_upgrade != Some(offer) {
                self.pending_upgrade = Some(offer);
                self.events.emit(ViewEvent::UpgradeAvailable { rate: offer });
            }
        } else {
            self.pending_upgrade = None;
            if selected != self.rate {
                tracing::debug!("Window needs coarser sampling: {} -> {}", self.rate, selected);
                self.set_rate(selected);
            }
        }

        outcome
    }

    fn set_rate(&mut self, rate: SamplingRate) {
        self.rate = rate;
        self.tracker.invalidate();
        self.events.emit(ViewEvent::RateChanged { rate });
    }

    fn emit_range(&self) {
        self.events.emit(ViewEvent::RangeChanged {
            range: self.range,
            navigation: self.navigation_state(),
        });
    }
}
