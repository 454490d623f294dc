use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Monthly lbs CO2 per source, before the diet multiplier.
///
/// A source is `None` when its input was unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootprintBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_transport_lbs: Option<f64>,
}

impl FootprintBreakdown {
    /// Sum of the known sources; `0.0` (never `-0.0`) when none is known.
    pub fn total_lbs(&self) -> f64 {
        [self.electricity_lbs, self.gas_lbs, self.car_lbs, self.public_transport_lbs]
            .into_iter()
            .flatten()
            .fold(0.0, |acc, v| acc + v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonFootprint {
    pub lbs_co2_per_month: f64,
    pub tons_co2_per_month: f64,
    pub tons_co2_per_year: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tons_co2_per_person_per_month: Option<f64>,
    pub diet_multiplier: f64,
    pub percent_of_national_average: f64,
    pub breakdown: FootprintBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeMetric {
    pub value: f64,
    pub percent_vs_average: f64,
    /// Heuristic rank under a normal distribution around the baseline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparativeMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity: Option<ComparativeMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<ComparativeMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<ComparativeMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_miles: Option<ComparativeMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_transport: Option<ComparativeMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub electricity: Trend,
    pub gas: Trend,
    pub water: Trend,
    pub car_miles: Trend,
    pub public_transport: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Energy,
    Water,
    Transportation,
    Lifestyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
    pub potential_impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_co2_tons_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings_usd_per_month: Option<f64>,
}

/// Result of one engine evaluation. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    #[serde(with = "time::serde::rfc3339")]
    pub as_of: OffsetDateTime,
    pub records_considered: usize,
    pub carbon_footprint: CarbonFootprint,
    pub energy_score: u8,
    pub comparative_metrics: ComparativeMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
    pub recommendations: Vec<Recommendation>,
}

impl ImpactReport {
    /// blake3 digest of the report's JSON encoding, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
