use impact_client::domain::ConsumptionRecord;

use super::Baseline;
use crate::report::{CarbonFootprint, FootprintBreakdown};

pub const LBS_PER_TON: f64 = 2000.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Per-source monthly lbs CO2, before any diet adjustment.
pub fn breakdown(record: &ConsumptionRecord, baseline: &Baseline) -> FootprintBreakdown {
    FootprintBreakdown {
        electricity_lbs: record.electricity_kwh.map(|v| v * baseline.electricity_lbs_co2_per_kwh),
        gas_lbs: record.gas_therms.map(|v| v * baseline.gas_lbs_co2_per_therm),
        car_lbs: record.car_miles.map(|v| v * baseline.car_lbs_co2_per_mile),
        public_transport_lbs: record
            .public_transport_miles
            .map(|v| v * baseline.public_transport_lbs_co2_per_mile),
    }
}

/// Monthly carbon footprint of a (validated) record.
///
/// Unknown sources contribute nothing, and the diet multiplier scales the sum
/// of the known ones.
pub fn carbon_footprint(record: &ConsumptionRecord, baseline: &Baseline) -> CarbonFootprint {
    let breakdown = breakdown(record, baseline);
    let diet_multiplier = baseline.diet_multiplier(record.diet);

    let lbs = breakdown.total_lbs() * diet_multiplier;
    let tons = lbs / LBS_PER_TON;

    CarbonFootprint {
        lbs_co2_per_month: lbs,
        tons_co2_per_month: tons,
        tons_co2_per_year: tons * MONTHS_PER_YEAR,
        tons_co2_per_person_per_month: record.household_size.map(|n| tons / f64::from(n)),
        diet_multiplier,
        percent_of_national_average: lbs / baseline.national_lbs_co2_per_month() * 100.0,
        breakdown,
    }
}
