//! Time-bucket downsampling of raw readings.
//!
//! Readings are grouped into half-open buckets of a fixed width anchored at
//! the Unix epoch, so two calls over overlapping windows always agree on
//! bucket boundaries. Each bucket contributes at most one output point.

use chrono::{DateTime, Duration, Utc};

use crate::sampling::SamplingRate;
use crate::state::{is_sorted_by_time, Reading};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Start of the epoch-anchored bucket containing `timestamp`, in epoch ms
#[inline]
fn bucket_start_millis(timestamp: &DateTime<Utc>, width_ms: i64) -> i64 {
    timestamp.timestamp_millis().div_euclid(width_ms) * width_ms
}

/// Compress readings to at most one point per bucket of `bucket_minutes`.
///
/// `None`, a zero width, or an empty input returns the readings unchanged.
/// A bucket holding one reading passes it through as-is; a bucket holding
/// several is replaced by a point at the bucket midpoint carrying the mean
/// of the present water levels, with the remaining fields taken from the
/// first reading. Buckets without a single present water level are dropped,
/// whatever their size.
pub fn downsample(readings: &[Reading], bucket_minutes: Option<u32>) -> Vec<Reading> {
    let width_ms = match bucket_minutes {
        Some(minutes) if minutes > 0 => i64::from(minutes) * MILLIS_PER_MINUTE,
        _ => return readings.to_vec(),
    };
    if readings.is_empty() {
        return Vec::new();
    }

    // Grouping below relies on ascending order
    let sorted;
    let ordered: &[Reading] = if is_sorted_by_time(readings) {
        readings
    } else {
        let mut copy = readings.to_vec();
        copy.sort_by_key(|r| r.timestamp);
        sorted = copy;
        &sorted
    };

    let mut output = Vec::with_capacity(ordered.len().min(1024));
    let mut group_start = 0usize;
    let mut current_bucket = bucket_start_millis(&ordered[0].timestamp, width_ms);

    for (i, reading) in ordered.iter().enumerate().skip(1) {
        let bucket = bucket_start_millis(&reading.timestamp, width_ms);
        if bucket != current_bucket {
            let group = &ordered[group_start..i];
            if let Some(point) = aggregate_bucket(group, current_bucket, width_ms) {
                output.push(point);
            }
            group_start = i;
            current_bucket = bucket;
        }
    }
    if let Some(point) = aggregate_bucket(&ordered[group_start..], current_bucket, width_ms) {
        output.push(point);
    }

    tracing::debug!(
        "Downsampled {} readings to {} points ({} min buckets)",
        readings.len(),
        output.len(),
        width_ms / MILLIS_PER_MINUTE
    );

    output
}

/// Downsample to the bucket width of a catalog rate
pub fn downsample_to_rate(readings: &[Reading], rate: SamplingRate) -> Vec<Reading> {
    downsample(readings, Some(rate.bucket_minutes()))
}

/// Reduce one bucket's readings to its representative point
fn aggregate_bucket(bucket: &[Reading], bucket_start_ms: i64, width_ms: i64) -> Option<Reading> {
    let first = bucket.first()?;
    if bucket.len() == 1 && first.water_level.is_some_and(f64::is_finite) {
        return Some(first.clone());
    }

    let (sum, count) = bucket
        .iter()
        .filter_map(|r| r.water_level)
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }

    let midpoint = DateTime::<Utc>::from_timestamp_millis(bucket_start_ms)?
        + Duration::milliseconds(width_ms / 2);

    Some(Reading {
        timestamp: midpoint,
        water_level: Some(sum / count as f64),
        temperature: first.temperature,
        source: first.source,
    })
}
