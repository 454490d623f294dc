use impact_client::domain::{ConsumptionRecord, Diet};

use super::Baseline;

const ELECTRICITY_CAP: f64 = 30.0;
const GAS_CAP: f64 = 20.0;
const WATER_CAP: f64 = 20.0;
const TRANSIT_BONUS_CAP: f64 = 10.0;
const TRANSIT_RATIO_THRESHOLD: f64 = 0.5;

/// Deduction for usage above the baseline; the full cap is reached at 2x.
fn deduction(usage: Option<f64>, average: f64, cap: f64) -> i32 {
    let Some(usage) = usage else { return 0 };
    let ratio = usage / average;
    if ratio <= 1.0 {
        return 0;
    }
    (cap * (ratio - 1.0)).floor().min(cap) as i32
}

/// Bonus when public transport makes up a large share of travel.
///
/// Needs both car and public transport mileage to be known.
fn transit_bonus(record: &ConsumptionRecord) -> i32 {
    let (Some(car), Some(transit)) = (record.car_miles, record.public_transport_miles) else {
        return 0;
    };
    let ratio = transit / (car + 0.1);
    if ratio > TRANSIT_RATIO_THRESHOLD {
        (TRANSIT_BONUS_CAP * ratio).floor().min(TRANSIT_BONUS_CAP) as i32
    } else {
        0
    }
}

fn diet_bonus(diet: Option<Diet>) -> i32 {
    match diet {
        Some(Diet::Vegan) => 10,
        Some(Diet::Vegetarian) => 7,
        Some(Diet::MeatWeekly) => 3,
        Some(Diet::MeatDaily) | None => 0,
    }
}

/// Sustainability score in [0, 100]; higher is better.
pub fn energy_score(record: &ConsumptionRecord, baseline: &Baseline) -> u8 {
    let mut score: i32 = 100;

    score -= deduction(record.electricity_kwh, baseline.avg_electricity_kwh, ELECTRICITY_CAP);
    score -= deduction(record.gas_therms, baseline.avg_gas_therms_per_month, GAS_CAP);
    score -= deduction(record.water_gallons, baseline.avg_water_gallons, WATER_CAP);
    score += transit_bonus(record);
    score += diet_bonus(record.diet);

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record() -> ConsumptionRecord {
        ConsumptionRecord::empty(datetime!(2024-06-01 00:00:00 UTC))
    }

    #[test]
    fn unknown_record_scores_full_marks() {
        assert_eq!(energy_score(&record(), &Baseline::default()), 100);
    }

    #[test]
    fn electricity_deduction_is_floored_and_capped() {
        let b = Baseline::default();
        let r = ConsumptionRecord {
            electricity_kwh: Some(1200.0),
            ..record()
        };
        // 30 * (1200 / 877 - 1) = 11.05
        assert_eq!(energy_score(&r, &b), 89);

        let r = ConsumptionRecord {
            electricity_kwh: Some(877.0 * 5.0),
            ..record()
        };
        assert_eq!(energy_score(&r, &b), 70);
    }

    #[test]
    fn usage_at_or_below_baseline_costs_nothing() {
        let b = Baseline::default();
        let r = ConsumptionRecord {
            electricity_kwh: Some(877.0),
            gas_therms: Some(10.0),
            water_gallons: Some(0.0),
            ..record()
        };
        assert_eq!(energy_score(&r, &b), 100);
    }

    #[test]
    fn score_stays_within_bounds_for_extreme_inputs() {
        let b = Baseline::default();
        let worst = ConsumptionRecord {
            electricity_kwh: Some(1_000_000.0),
            gas_therms: Some(1_000_000.0),
            water_gallons: Some(f64::MAX),
            car_miles: Some(1_000_000.0),
            public_transport_miles: Some(0.0),
            diet: Some(Diet::MeatDaily),
            ..record()
        };
        assert_eq!(energy_score(&worst, &b), 30);

        let best = ConsumptionRecord {
            electricity_kwh: Some(0.0),
            car_miles: Some(0.0),
            public_transport_miles: Some(1_000_000.0),
            diet: Some(Diet::Vegan),
            ..record()
        };
        assert_eq!(energy_score(&best, &b), 100);
    }

    #[test]
    fn transit_bonus_requires_both_mileages() {
        let b = Baseline::default();
        let r = ConsumptionRecord {
            electricity_kwh: Some(877.0 * 1.5),
            public_transport_miles: Some(500.0),
            ..record()
        };
        // 30 * 0.5 = 15 deducted, no bonus without car mileage.
        assert_eq!(energy_score(&r, &b), 85);

        let r = ConsumptionRecord {
            car_miles: Some(100.0),
            ..r
        };
        // ratio ~4.99 -> bonus capped at 10.
        assert_eq!(energy_score(&r, &b), 95);
    }

    #[test]
    fn transit_bonus_scales_below_cap() {
        let b = Baseline::default();
        let r = ConsumptionRecord {
            electricity_kwh: Some(877.0 * 2.0),
            car_miles: Some(100.0),
            public_transport_miles: Some(70.0),
            ..record()
        };
        // 100 - 30 + floor(10 * 70 / 100.1) = 76
        assert_eq!(energy_score(&r, &b), 76);
    }

    #[test]
    fn diet_bonus_follows_table() {
        let b = Baseline::default();
        let heavy = ConsumptionRecord {
            electricity_kwh: Some(877.0 * 2.0),
            ..record()
        };
        let scores: Vec<u8> = Diet::ALL
            .iter()
            .map(|d| {
                energy_score(
                    &ConsumptionRecord {
                        diet: Some(*d),
                        ..heavy.clone()
                    },
                    &b,
                )
            })
            .collect();
        assert_eq!(scores, vec![70, 73, 77, 80]);
    }
}
