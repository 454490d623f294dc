use impact_client::domain::{ConsumptionRecord, Diet};

use super::{compare::percent_vs_average, footprint, Baseline};
use crate::report::{Recommendation, RecommendationCategory};

const ELECTRICITY_THRESHOLD_PCT: f64 = 10.0;
const GAS_THRESHOLD_PCT: f64 = 10.0;
const WATER_THRESHOLD_PCT: f64 = 0.0;
const CAR_THRESHOLD_PCT: f64 = 10.0;

const ELECTRICITY_ACTIONS: &[&str] = &[
    "Switch to LED bulbs (saves up to 75% on lighting)",
    "Use smart power strips for electronics",
    "Upgrade to Energy Star appliances",
    "Install a programmable thermostat",
];

const GAS_ACTIONS: &[&str] = &[
    "Lower the water heater temperature to 120°F",
    "Seal drafts around windows and doors",
    "Service the furnace once a year",
    "Use a smart thermostat schedule for heating",
];

const WATER_ACTIONS: &[&str] = &[
    "Install low-flow showerheads and faucet aerators",
    "Fix leaky faucets and pipes",
    "Collect rainwater for gardening",
    "Run full loads of laundry and dishes",
];

const TRANSPORT_ACTIONS: &[&str] = &[
    "Consider carpooling options",
    "Use public transportation when possible",
    "Combine errands into single trips",
    "Consider an electric or hybrid vehicle",
];

const DIET_ACTIONS: &[&str] = &[
    "Start with Meatless Mondays",
    "Explore plant-based protein alternatives",
    "Reduce red meat consumption",
    "Choose local and seasonal produce",
];

fn actions(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Usage above `average` by more than `threshold_pct` percent, with the
/// excess amount and the percent over average.
fn excess(value: Option<f64>, average: f64, threshold_pct: f64) -> Option<(f64, f64)> {
    let v = value?;
    let pct = percent_vs_average(v, average);
    (v > average && pct > threshold_pct).then_some((v - average, pct))
}

fn electricity(record: &ConsumptionRecord, b: &Baseline) -> Option<Recommendation> {
    let (extra_kwh, pct) = excess(record.electricity_kwh, b.avg_electricity_kwh, ELECTRICITY_THRESHOLD_PCT)?;
    let savings = extra_kwh * b.electricity_cost_per_kwh;
    let tons = extra_kwh * b.electricity_lbs_co2_per_kwh / footprint::LBS_PER_TON;

    Some(Recommendation {
        category: RecommendationCategory::Energy,
        title: "Reduce Electricity Usage".to_string(),
        description: format!("Your electricity usage is {pct:.1}% above average."),
        action_items: actions(ELECTRICITY_ACTIONS),
        potential_impact: format!(
            "Save approximately ${savings:.2} monthly and reduce CO2 emissions by {tons:.2} tons"
        ),
        estimated_co2_tons_per_month: Some(tons),
        estimated_savings_usd_per_month: Some(savings),
    })
}

fn gas(record: &ConsumptionRecord, b: &Baseline) -> Option<Recommendation> {
    let (extra_therms, pct) = excess(record.gas_therms, b.avg_gas_therms_per_month, GAS_THRESHOLD_PCT)?;
    let savings = extra_therms * b.gas_cost_per_therm;
    let tons = extra_therms * b.gas_lbs_co2_per_therm / footprint::LBS_PER_TON;

    Some(Recommendation {
        category: RecommendationCategory::Energy,
        title: "Cut Natural Gas Use".to_string(),
        description: format!("Your natural gas usage is {pct:.1}% above average."),
        action_items: actions(GAS_ACTIONS),
        potential_impact: format!(
            "Save approximately ${savings:.2} monthly and reduce CO2 emissions by {tons:.2} tons"
        ),
        estimated_co2_tons_per_month: Some(tons),
        estimated_savings_usd_per_month: Some(savings),
    })
}

fn water(record: &ConsumptionRecord, b: &Baseline) -> Option<Recommendation> {
    let (extra_gallons, pct) = excess(record.water_gallons, b.avg_water_gallons, WATER_THRESHOLD_PCT)?;
    let savings = extra_gallons * b.water_cost_per_gallon;

    Some(Recommendation {
        category: RecommendationCategory::Water,
        title: "Reduce Water Consumption".to_string(),
        description: format!("Your water usage is {pct:.1}% above average."),
        action_items: actions(WATER_ACTIONS),
        potential_impact: format!(
            "Save {extra_gallons:.0} gallons and approximately ${savings:.2} monthly"
        ),
        estimated_co2_tons_per_month: None,
        estimated_savings_usd_per_month: Some(savings),
    })
}

fn transportation(record: &ConsumptionRecord, b: &Baseline) -> Option<Recommendation> {
    let (extra_miles, pct) = excess(record.car_miles, b.avg_car_miles, CAR_THRESHOLD_PCT)?;
    let tons = extra_miles * b.car_lbs_co2_per_mile / footprint::LBS_PER_TON;

    Some(Recommendation {
        category: RecommendationCategory::Transportation,
        title: "Optimize Transportation".to_string(),
        description: format!("Your car usage is {pct:.1}% above average."),
        action_items: actions(TRANSPORT_ACTIONS),
        potential_impact: format!("Reduce CO2 emissions by {tons:.2} tons monthly"),
        estimated_co2_tons_per_month: Some(tons),
        estimated_savings_usd_per_month: None,
    })
}

fn lifestyle(record: &ConsumptionRecord, b: &Baseline) -> Option<Recommendation> {
    if record.diet != Some(Diet::MeatDaily) {
        return None;
    }

    let current = b.diet_multipliers.meat_daily;
    let target = b.diet_multipliers.vegetarian;
    let reduction = (current - target).max(0.0);
    let pct = if current > 0.0 { reduction / current * 100.0 } else { 0.0 };
    let tons = footprint::breakdown(record, b).total_lbs() * reduction / footprint::LBS_PER_TON;

    Some(Recommendation {
        category: RecommendationCategory::Lifestyle,
        title: "Consider Plant-Based Meals".to_string(),
        description: "Regular meat consumption has a significant environmental impact.".to_string(),
        action_items: actions(DIET_ACTIONS),
        potential_impact: format!(
            "Reduce your footprint by up to {pct:.0}% ({tons:.2} tons CO2 monthly) with a vegetarian diet"
        ),
        estimated_co2_tons_per_month: Some(tons),
        estimated_savings_usd_per_month: None,
    })
}

/// Rule-based recommendations, in category order: energy, water,
/// transportation, lifestyle. Categories with unknown data are skipped.
pub fn recommendations(record: &ConsumptionRecord, baseline: &Baseline) -> Vec<Recommendation> {
    [
        electricity(record, baseline),
        gas(record, baseline),
        water(record, baseline),
        transportation(record, baseline),
        lifestyle(record, baseline),
    ]
    .into_iter()
    .flatten()
    .collect()
}
