//! Summary statistics over a reading sequence.

use serde::Serialize;

use crate::state::{DateRange, Reading};

/// Aggregate figures for a set of readings. Absent and non-finite values
/// are skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReadingStats {
    pub count: usize,
    /// Readings carrying a water level
    pub present_count: usize,
    pub min_water_level: Option<f64>,
    pub max_water_level: Option<f64>,
    pub mean_water_level: Option<f64>,
    pub mean_temperature: Option<f64>,
    /// Observed time extent; `None` when there are no readings
    pub range: Option<DateRange>,
}

impl ReadingStats {
    pub fn from_readings(readings: &[Reading]) -> Self {
        let mut stats = ReadingStats {
            count: readings.len(),
            range: DateRange::spanning(readings),
            ..Default::default()
        };

        let mut level_sum = 0.0;
        let mut temp_sum = 0.0;
        let mut temp_count = 0usize;

        for reading in readings {
            if let Some(level) = reading.water_level.filter(|v| v.is_finite()) {
                stats.present_count += 1;
                level_sum += level;
                let min = stats.min_water_level.map_or(level, |m| m.min(level));
                let max = stats.max_water_level.map_or(level, |m| m.max(level));
                stats.min_water_level = Some(min);
                stats.max_water_level = Some(max);
            }
            if let Some(temp) = reading.temperature.filter(|v| v.is_finite()) {
                temp_sum += temp;
                temp_count += 1;
            }
        }

        if stats.present_count > 0 {
            stats.mean_water_level = Some(level_sum / stats.present_count as f64);
        }
        if temp_count > 0 {
            stats.mean_temperature = Some(temp_sum / temp_count as f64);
        }

        stats
    }

    /// Readings without a water level
    pub fn gap_count(&self) -> usize {
        self.count - self.present_count
    }
}
