use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Eating pattern reported alongside a consumption record.
///
/// Serializes as snake_case; deserializes through `FromStr`, so every source
/// accepts the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Diet {
    MeatDaily,
    MeatWeekly,
    Vegetarian,
    Vegan,
}

impl Diet {
    pub const ALL: [Diet; 4] = [Diet::MeatDaily, Diet::MeatWeekly, Diet::Vegetarian, Diet::Vegan];

    pub fn display_name(self) -> &'static str {
        match self {
            Diet::MeatDaily => "Meat Daily",
            Diet::MeatWeekly => "Meat Weekly",
            Diet::Vegetarian => "Vegetarian",
            Diet::Vegan => "Vegan",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized diet '{0}'")]
pub struct ParseDietError(pub String);

impl FromStr for Diet {
    type Err = ParseDietError;

    /// Accepts "Meat Daily", "meat_daily", "MeatDaily", "meat-daily" and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "meatdaily" => Ok(Diet::MeatDaily),
            "meatweekly" => Ok(Diet::MeatWeekly),
            "vegetarian" => Ok(Diet::Vegetarian),
            "vegan" => Ok(Diet::Vegan),
            _ => Err(ParseDietError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Diet {
    type Error = ParseDietError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One monthly observation of a household's consumption.
///
/// Every measurement is optional: `None` means "unknown", which is different
/// from a reading of zero and must never be averaged as one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub electricity_kwh: Option<f64>,
    #[serde(default)]
    pub gas_therms: Option<f64>,
    #[serde(default)]
    pub water_gallons: Option<f64>,
    #[serde(default)]
    pub car_miles: Option<f64>,
    #[serde(default)]
    pub public_transport_miles: Option<f64>,
    #[serde(default)]
    pub diet: Option<Diet>,
    #[serde(default)]
    pub household_size: Option<u32>,
}

impl ConsumptionRecord {
    /// A record with a timestamp and nothing else known.
    pub fn empty(timestamp: OffsetDateTime) -> Self {
        Self {
            timestamp,
            electricity_kwh: None,
            gas_therms: None,
            water_gallons: None,
            car_miles: None,
            public_transport_miles: None,
            diet: None,
            household_size: None,
        }
    }

    /// Named numeric measurements, in a fixed order.
    pub fn measurements(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("electricity_kwh", self.electricity_kwh),
            ("gas_therms", self.gas_therms),
            ("water_gallons", self.water_gallons),
            ("car_miles", self.car_miles),
            ("public_transport_miles", self.public_transport_miles),
        ]
    }

    /// True when no measurement and no diet is known.
    pub fn is_unknown(&self) -> bool {
        self.diet.is_none() && self.measurements().iter().all(|(_, v)| v.is_none())
    }
}

/// A record tagged with the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConsumption {
    pub user_id: String,
    #[serde(flatten)]
    pub record: ConsumptionRecord,
}
