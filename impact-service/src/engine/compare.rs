use impact_client::domain::ConsumptionRecord;

use super::Baseline;
use crate::report::{ComparativeMetric, ComparativeMetrics};

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Percentile of `value` assuming usage is normally distributed around
/// `average` with the given standard deviation. A comparative heuristic only.
pub fn percentile(value: f64, average: f64, std_dev: f64) -> f64 {
    (normal_cdf((value - average) / std_dev) * 100.0).clamp(0.0, 100.0)
}

pub fn percent_vs_average(value: f64, average: f64) -> f64 {
    (value - average) / average * 100.0
}

fn metric(value: Option<f64>, average: f64, std_dev: Option<f64>) -> Option<ComparativeMetric> {
    value.map(|v| ComparativeMetric {
        value: v,
        percent_vs_average: percent_vs_average(v, average),
        percentile: std_dev.map(|sd| percentile(v, average, sd)),
    })
}

pub fn comparative_metrics(record: &ConsumptionRecord, baseline: &Baseline) -> ComparativeMetrics {
    ComparativeMetrics {
        electricity: metric(
            record.electricity_kwh,
            baseline.avg_electricity_kwh,
            Some(baseline.electricity_std_dev),
        ),
        gas: metric(record.gas_therms, baseline.avg_gas_therms_per_month, None),
        water: metric(record.water_gallons, baseline.avg_water_gallons, Some(baseline.water_std_dev)),
        car_miles: metric(record.car_miles, baseline.avg_car_miles, Some(baseline.car_miles_std_dev)),
        public_transport: metric(
            record.public_transport_miles,
            baseline.avg_public_transport_miles,
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn normal_cdf_matches_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.0) - 0.841_344_7).abs() < 1e-6);
        assert!((normal_cdf(-1.96) - 0.024_997_9).abs() < 1e-6);
        assert!(normal_cdf(40.0) <= 1.0);
    }

    #[test]
    fn usage_on_average_is_fiftieth_percentile() {
        assert!((percentile(877.0, 877.0, 200.0) - 50.0).abs() < 1e-5);
    }

    #[test]
    fn percentile_is_monotonic_in_usage() {
        let low = percentile(500.0, 877.0, 200.0);
        let mid = percentile(900.0, 877.0, 200.0);
        let high = percentile(1500.0, 877.0, 200.0);
        assert!(low < mid && mid < high);
    }

    #[test]
    fn metrics_only_for_known_fields() {
        let record = ConsumptionRecord {
            electricity_kwh: Some(1200.0),
            public_transport_miles: Some(75.0),
            ..ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC))
        };

        let m = comparative_metrics(&record, &Baseline::default());

        let elec = m.electricity.unwrap();
        assert!((elec.percent_vs_average - 36.830_102_6).abs() < 1e-6);
        // z = 323 / 200 = 1.615
        assert!((elec.percentile.unwrap() - 94.685).abs() < 0.01);

        let transit = m.public_transport.unwrap();
        assert!((transit.percent_vs_average + 50.0).abs() < 1e-9);
        assert!(transit.percentile.is_none());

        assert!(m.water.is_none());
        assert!(m.car_miles.is_none());
        assert!(m.gas.is_none());
    }
}
