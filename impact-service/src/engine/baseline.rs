use impact_client::domain::Diet;
use serde::{Deserialize, Serialize};

use super::EngineError;

/// Footprint multipliers applied to the summed emissions for each diet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietMultipliers {
    pub meat_daily: f64,
    pub meat_weekly: f64,
    pub vegetarian: f64,
    pub vegan: f64,
}

impl Default for DietMultipliers {
    fn default() -> Self {
        Self {
            meat_daily: 1.0,
            meat_weekly: 0.8,
            vegetarian: 0.6,
            vegan: 0.4,
        }
    }
}

impl DietMultipliers {
    pub fn for_diet(&self, diet: Diet) -> f64 {
        match diet {
            Diet::MeatDaily => self.meat_daily,
            Diet::MeatWeekly => self.meat_weekly,
            Diet::Vegetarian => self.vegetarian,
            Diet::Vegan => self.vegan,
        }
    }
}

/// Reference averages, emission factors and unit costs.
///
/// All averages are monthly per household. Emission factors are pounds of CO2
/// per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baseline {
    pub avg_electricity_kwh: f64,
    pub avg_gas_therms_per_month: f64,
    pub avg_water_gallons: f64,
    pub avg_car_miles: f64,
    pub avg_public_transport_miles: f64,

    pub electricity_lbs_co2_per_kwh: f64,
    pub gas_lbs_co2_per_therm: f64,
    pub car_lbs_co2_per_mile: f64,
    pub public_transport_lbs_co2_per_mile: f64,
    pub diet_multipliers: DietMultipliers,

    pub electricity_std_dev: f64,
    pub water_std_dev: f64,
    pub car_miles_std_dev: f64,

    pub electricity_cost_per_kwh: f64,
    pub gas_cost_per_therm: f64,
    pub water_cost_per_gallon: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            avg_electricity_kwh: 877.0,
            avg_gas_therms_per_month: 63.0,
            avg_water_gallons: 7000.0,
            avg_car_miles: 1000.0,
            avg_public_transport_miles: 150.0,

            electricity_lbs_co2_per_kwh: 0.85,
            gas_lbs_co2_per_therm: 11.7,
            car_lbs_co2_per_mile: 0.89,
            public_transport_lbs_co2_per_mile: 0.14,
            diet_multipliers: DietMultipliers::default(),

            electricity_std_dev: 200.0,
            water_std_dev: 2000.0,
            car_miles_std_dev: 300.0,

            electricity_cost_per_kwh: 0.12,
            gas_cost_per_therm: 1.20,
            water_cost_per_gallon: 0.01,
        }
    }
}

impl Baseline {
    /// Diet multiplier, or 1.0 when the diet is unknown.
    pub fn diet_multiplier(&self, diet: Option<Diet>) -> f64 {
        diet.map_or(1.0, |d| self.diet_multipliers.for_diet(d))
    }

    /// Monthly lbs CO2 of a household sitting exactly on every average.
    pub fn national_lbs_co2_per_month(&self) -> f64 {
        self.avg_electricity_kwh * self.electricity_lbs_co2_per_kwh
            + self.avg_gas_therms_per_month * self.gas_lbs_co2_per_therm
            + self.avg_car_miles * self.car_lbs_co2_per_mile
            + self.avg_public_transport_miles * self.public_transport_lbs_co2_per_mile
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let positive = [
            ("avg_electricity_kwh", self.avg_electricity_kwh),
            ("avg_gas_therms_per_month", self.avg_gas_therms_per_month),
            ("avg_water_gallons", self.avg_water_gallons),
            ("avg_car_miles", self.avg_car_miles),
            ("avg_public_transport_miles", self.avg_public_transport_miles),
            ("electricity_std_dev", self.electricity_std_dev),
            ("water_std_dev", self.water_std_dev),
            ("car_miles_std_dev", self.car_miles_std_dev),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidBaseline(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("electricity_lbs_co2_per_kwh", self.electricity_lbs_co2_per_kwh),
            ("gas_lbs_co2_per_therm", self.gas_lbs_co2_per_therm),
            ("car_lbs_co2_per_mile", self.car_lbs_co2_per_mile),
            ("public_transport_lbs_co2_per_mile", self.public_transport_lbs_co2_per_mile),
            ("electricity_cost_per_kwh", self.electricity_cost_per_kwh),
            ("gas_cost_per_therm", self.gas_cost_per_therm),
            ("water_cost_per_gallon", self.water_cost_per_gallon),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidBaseline(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        for diet in Diet::ALL {
            let m = self.diet_multipliers.for_diet(diet);
            if !(m > 0.0 && m <= 1.0) {
                return Err(EngineError::InvalidBaseline(format!(
                    "diet multiplier for {diet} must be in (0, 1], got {m}"
                )));
            }
        }

        // Diet::ALL runs from most to least meat.
        for pair in Diet::ALL.windows(2) {
            let (heavier, lighter) = (pair[0], pair[1]);
            let (hm, lm) = (self.diet_multipliers.for_diet(heavier), self.diet_multipliers.for_diet(lighter));
            if lm > hm {
                return Err(EngineError::InvalidBaseline(format!(
                    "diet multiplier for {lighter} ({lm}) exceeds {heavier} ({hm})"
                )));
            }
        }

        let national = self.national_lbs_co2_per_month();
        if !national.is_finite() || national <= 0.0 {
            return Err(EngineError::InvalidBaseline(format!(
                "national average footprint must be positive, got {national} lbs CO2/month"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_baseline_is_valid() {
        assert!(Baseline::default().validate().is_ok());
    }

    #[test]
    fn zero_average_is_rejected() {
        let baseline = Baseline {
            avg_water_gallons: 0.0,
            ..Baseline::default()
        };
        assert!(matches!(baseline.validate(), Err(EngineError::InvalidBaseline(_))));
    }

    #[test]
    fn diet_multiplier_above_one_is_rejected() {
        let mut baseline = Baseline::default();
        baseline.diet_multipliers.vegan = 1.5;
        assert!(matches!(baseline.validate(), Err(EngineError::InvalidBaseline(_))));
    }

    #[test]
    fn out_of_order_diet_multipliers_are_rejected() {
        let mut baseline = Baseline::default();
        baseline.diet_multipliers.vegan = 0.9;
        let err = baseline.validate().unwrap_err();
        assert!(matches!(&err, EngineError::InvalidBaseline(msg) if msg.contains("Vegan")), "{err}");

        let mut equal = Baseline::default();
        equal.diet_multipliers.meat_weekly = 1.0;
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn all_zero_emission_factors_are_rejected() {
        let baseline = Baseline {
            electricity_lbs_co2_per_kwh: 0.0,
            gas_lbs_co2_per_therm: 0.0,
            car_lbs_co2_per_mile: 0.0,
            public_transport_lbs_co2_per_mile: 0.0,
            ..Baseline::default()
        };
        assert!(matches!(baseline.validate(), Err(EngineError::InvalidBaseline(_))));

        let one_zero = Baseline {
            gas_lbs_co2_per_therm: 0.0,
            ..Baseline::default()
        };
        assert!(one_zero.validate().is_ok());
    }

    #[test]
    fn unknown_diet_uses_neutral_multiplier() {
        assert_eq!(Baseline::default().diet_multiplier(None), 1.0);
        assert_eq!(Baseline::default().diet_multiplier(Some(Diet::Vegetarian)), 0.6);
    }

    #[test]
    fn national_footprint_sums_all_sources() {
        let b = Baseline::default();
        let expected = 877.0 * 0.85 + 63.0 * 11.7 + 1000.0 * 0.89 + 150.0 * 0.14;
        assert!((b.national_lbs_co2_per_month() - expected).abs() < 1e-9);
    }
}
