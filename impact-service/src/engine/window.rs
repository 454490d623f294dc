use impact_client::domain::ConsumptionRecord;
use time::{Duration, OffsetDateTime};

use crate::report::{Trend, Trends};

const TREND_THRESHOLD_PCT: f64 = 5.0;

/// Records with `as_of - days <= timestamp <= as_of`, oldest first.
///
/// A window reaching past the earliest representable date has no lower bound.
pub fn trailing_window(records: &[ConsumptionRecord], as_of: OffsetDateTime, days: u32) -> Vec<ConsumptionRecord> {
    let start = as_of.checked_sub(Duration::days(i64::from(days)));
    let mut window: Vec<ConsumptionRecord> = records
        .iter()
        .filter(|r| start.map_or(true, |s| r.timestamp >= s) && r.timestamp <= as_of)
        .cloned()
        .collect();
    // Stable sort keeps insertion order for equal timestamps.
    window.sort_by_key(|r| r.timestamp);
    window
}

fn mean_of_known(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Collapse a chronological window into one record.
///
/// Each numeric field is the mean over the records where that field is known.
/// Diet and household size take the most recent known value.
pub fn average_record(window: &[ConsumptionRecord], as_of: OffsetDateTime) -> ConsumptionRecord {
    ConsumptionRecord {
        timestamp: as_of,
        electricity_kwh: mean_of_known(window.iter().map(|r| r.electricity_kwh)),
        gas_therms: mean_of_known(window.iter().map(|r| r.gas_therms)),
        water_gallons: mean_of_known(window.iter().map(|r| r.water_gallons)),
        car_miles: mean_of_known(window.iter().map(|r| r.car_miles)),
        public_transport_miles: mean_of_known(window.iter().map(|r| r.public_transport_miles)),
        diet: window.iter().rev().find_map(|r| r.diet),
        household_size: window.iter().rev().find_map(|r| r.household_size),
    }
}

/// Compare the mean of the newer half of `values` against the older half.
///
/// `values` must be oldest first.
pub fn trend_of(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }

    let mid = values.len() / 2;
    let (older, newer) = values.split_at(mid);
    let older_mean = older.iter().sum::<f64>() / older.len() as f64;
    let newer_mean = newer.iter().sum::<f64>() / newer.len() as f64;

    if older_mean == 0.0 {
        return if newer_mean > 0.0 { Trend::Increasing } else { Trend::Stable };
    }

    let change_pct = (newer_mean - older_mean) / older_mean * 100.0;
    if change_pct > TREND_THRESHOLD_PCT {
        Trend::Increasing
    } else if change_pct < -TREND_THRESHOLD_PCT {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn field_trend(window: &[ConsumptionRecord], field: impl Fn(&ConsumptionRecord) -> Option<f64>) -> Trend {
    let values: Vec<f64> = window.iter().filter_map(field).collect();
    trend_of(&values)
}

/// Per-field trends over a chronological window, skipping unknown values.
pub fn trends(window: &[ConsumptionRecord]) -> Trends {
    Trends {
        electricity: field_trend(window, |r| r.electricity_kwh),
        gas: field_trend(window, |r| r.gas_therms),
        water: field_trend(window, |r| r.water_gallons),
        car_miles: field_trend(window, |r| r.car_miles),
        public_transport: field_trend(window, |r| r.public_transport_miles),
    }
}
