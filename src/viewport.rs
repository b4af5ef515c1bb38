//! Pointer and wheel interaction on a rendered time axis.
//!
//! Translates pixel-space input into time-domain windows. Zoom keeps the
//! time under the pointer fixed; pan shifts both bounds by the time
//! equivalent of the pixel delta. Degenerate axes (zero pixel or time
//! extent, non-finite values) turn every operation into a no-op.

use crate::sampling::{calculate_best_sampling, SamplingRate};
use crate::state::{
    DateRange, SamplingDecision, DEFAULT_TARGET_POINTS, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

/// Mapping between the chart's pixel extent and the visible time extent.
/// Times are epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScale {
    pub pixel_min: f64,
    pub pixel_max: f64,
    pub time_min: f64,
    pub time_max: f64,
}

impl AxisScale {
    /// Scale for a window drawn between two pixel positions
    pub fn new(pixel_min: f64, pixel_max: f64, window: &DateRange) -> Self {
        let (time_min, time_max) = window.as_millis();
        Self {
            pixel_min,
            pixel_max,
            time_min,
            time_max,
        }
    }

    /// True when the scale cannot map pixels to time
    pub fn is_degenerate(&self) -> bool {
        let values = [self.pixel_min, self.pixel_max, self.time_min, self.time_max];
        values.iter().any(|v| !v.is_finite())
            || (self.pixel_max - self.pixel_min).abs() < f64::EPSILON
            || (self.time_max - self.time_min).abs() < f64::EPSILON
    }

    /// Milliseconds represented by one pixel
    pub fn time_per_pixel(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some((self.time_max - self.time_min) / (self.pixel_max - self.pixel_min))
    }

    /// Time under a pixel position
    pub fn pixel_to_time(&self, pixel: f64) -> Option<f64> {
        let ratio = self.time_per_pixel()?;
        pixel
            .is_finite()
            .then(|| self.time_min + (pixel - self.pixel_min) * ratio)
    }
}

/// Zoom factor for one wheel event.
/// Positive deltas (wheel down) zoom out; negative deltas zoom in.
pub fn wheel_zoom_factor(
    wheel_delta: f64,
    zoom_in_factor: f64,
    zoom_out_factor: f64,
) -> Option<f64> {
    if !wheel_delta.is_finite() || wheel_delta == 0.0 {
        return None;
    }
    Some(if wheel_delta > 0.0 {
        zoom_out_factor
    } else {
        zoom_in_factor
    })
}

/// New `[min, max]` after scaling the visible span by `factor` around the
/// time under `pivot_pixel`.
pub fn zoom_bounds(scale: &AxisScale, pivot_pixel: f64, factor: f64) -> Option<(f64, f64)> {
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    let pivot = scale.pixel_to_time(pivot_pixel)?;
    let min = pivot - (pivot - scale.time_min) * factor;
    let max = pivot + (scale.time_max - pivot) * factor;
    (min.is_finite() && max.is_finite() && max > min).then_some((min, max))
}

/// New `[min, max]` after dragging by `delta_pixels`.
/// Dragging right (positive delta) reveals earlier data.
pub fn pan_bounds(scale: &AxisScale, delta_pixels: f64) -> Option<(f64, f64)> {
    if !delta_pixels.is_finite() {
        return None;
    }
    let shift = delta_pixels * scale.time_per_pixel()?;
    Some((scale.time_min - shift, scale.time_max - shift))
}

/// Result of a completed zoom or pan
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionOutcome {
    pub range: DateRange,
    pub decision: SamplingDecision,
    /// Finer rate the user may opt into; never applied automatically
    pub upgrade_offer: Option<SamplingRate>,
}

/// Per-chart translator from pointer input to time windows
#[derive(Clone, Debug)]
pub struct InteractionTranslator {
    target_points: usize,
    zoom_in_factor: f64,
    zoom_out_factor: f64,
    /// Axis scale captured when the current drag started
    drag_origin: Option<AxisScale>,
}

impl Default for InteractionTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_POINTS, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR)
    }
}

impl InteractionTranslator {
    pub fn new(target_points: usize, zoom_in_factor: f64, zoom_out_factor: f64) -> Self {
        Self {
            target_points,
            zoom_in_factor,
            zoom_out_factor,
            drag_origin: None,
        }
    }

    pub fn target_points(&self) -> usize {
        self.target_points
    }

    /// Window after one wheel event, or `None` when the input is degenerate
    pub fn zoom(
        &self,
        scale: &AxisScale,
        pivot_pixel: f64,
        wheel_delta: f64,
    ) -> Option<DateRange> {
        let factor = wheel_zoom_factor(wheel_delta, self.zoom_in_factor, self.zoom_out_factor)?;
        let (min, max) = zoom_bounds(scale, pivot_pixel, factor)?;
        DateRange::from_millis(min, max)
    }

    /// Window after a single pan step
    pub fn pan(&self, scale: &AxisScale, delta_pixels: f64) -> Option<DateRange> {
        let (min, max) = pan_bounds(scale, delta_pixels)?;
        DateRange::from_millis(min, max)
    }

    /// Start a drag from the current axis scale
    pub fn begin_drag(&mut self, scale: AxisScale) {
        self.drag_origin = Some(scale);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Live preview while dragging, relative to where the drag started
    pub fn drag_to(&self, total_delta_pixels: f64) -> Option<DateRange> {
        let origin = self.drag_origin.as_ref()?;
        self.pan(origin, total_delta_pixels)
    }

    /// Finish the drag and return its final window
    pub fn end_drag(&mut self, total_delta_pixels: f64) -> Option<DateRange> {
        let origin = self.drag_origin.take()?;
        self.pan(&origin, total_delta_pixels)
    }

    /// Abandon a drag without producing a window
    pub fn cancel_drag(&mut self) {
        self.drag_origin = None;
    }

    /// Run the sampling selector for a settled window.
    ///
    /// An upgrade is surfaced as an offer; the caller keeps displaying
    /// `current_rate` until the user accepts it.
    pub fn complete(&self, range: DateRange, current_rate: SamplingRate) -> InteractionOutcome {
        let decision = calculate_best_sampling(&range, self.target_points, Some(current_rate));
        InteractionOutcome {
            range,
            decision,
            upgrade_offer: decision.is_upgrade.then_some(decision.rate),
        }
    }
}
