//! Consumption-to-impact scoring.
//!
//! Everything in here is pure: an `ImpactEngine` holds an immutable
//! [`Baseline`] and turns records into [`ImpactReport`]s without I/O, so one
//! engine can be shared freely across tasks.

pub mod baseline;
pub mod compare;
pub mod footprint;
pub mod recommend;
pub mod score;
pub mod window;

use impact_client::{
    db::ConsumptionRow,
    domain::{ConsumptionRecord, Diet},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::report::ImpactReport;

pub use baseline::{Baseline, DietMultipliers};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("no known consumption fields to evaluate")]
    InsufficientData,
    #[error("invalid baseline: {0}")]
    InvalidBaseline(String),
}

/// Longest accepted trailing window, roughly a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Trailing window used by `evaluate_window`.
    pub window_days: u32,
    /// Reject records with nothing known instead of returning a neutral report.
    pub strict: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            window_days: 30,
            strict: false,
        }
    }
}

/// Reject negative or non-finite measurements and empty households.
pub fn validate_record(record: &ConsumptionRecord) -> Result<(), EngineError> {
    for (field, value) in record.measurements() {
        let Some(v) = value else { continue };
        if !v.is_finite() {
            return Err(EngineError::InvalidInput {
                field,
                reason: format!("must be a finite number, got {v}"),
            });
        }
        if v < 0.0 {
            return Err(EngineError::InvalidInput {
                field,
                reason: format!("must be non-negative, got {v}"),
            });
        }
    }

    if record.household_size == Some(0) {
        return Err(EngineError::InvalidInput {
            field: "household_size",
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Convert a raw store row into a validated record.
pub fn record_from_row(row: &ConsumptionRow) -> Result<ConsumptionRecord, EngineError> {
    let diet = row
        .diet
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Diet>)
        .transpose()
        .map_err(|e| EngineError::InvalidInput {
            field: "diet",
            reason: format!("{e}"),
        })?;

    let household_size = match row.household_size {
        None => None,
        Some(n) if n >= 1 => Some(n as u32),
        Some(n) => {
            return Err(EngineError::InvalidInput {
                field: "household_size",
                reason: format!("must be at least 1, got {n}"),
            })
        }
    };

    let record = ConsumptionRecord {
        timestamp: row.ts,
        electricity_kwh: row.electricity,
        gas_therms: row.gas,
        water_gallons: row.water,
        car_miles: row.car_miles,
        public_transport_miles: row.public_transport,
        diet,
        household_size,
    };
    validate_record(&record)?;
    Ok(record)
}

#[derive(Debug, Clone)]
pub struct ImpactEngine {
    baseline: Baseline,
    options: EngineOptions,
}

impl ImpactEngine {
    pub fn new(baseline: Baseline, options: EngineOptions) -> Result<Self, EngineError> {
        baseline.validate()?;
        if options.window_days == 0 || options.window_days > MAX_WINDOW_DAYS {
            return Err(EngineError::InvalidBaseline(format!(
                "window_days must be in 1..={MAX_WINDOW_DAYS}, got {}",
                options.window_days
            )));
        }
        Ok(Self { baseline, options })
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate a single record.
    pub fn evaluate(&self, record: &ConsumptionRecord) -> Result<ImpactReport, EngineError> {
        validate_record(record)?;
        if self.options.strict && record.is_unknown() {
            return Err(EngineError::InsufficientData);
        }

        Ok(self.build_report(record, 1))
    }

    /// Evaluate the trailing window ending at `as_of`.
    ///
    /// Records outside the window are ignored; each numeric field is averaged
    /// over the records where it is known.
    pub fn evaluate_window(
        &self,
        records: &[ConsumptionRecord],
        as_of: OffsetDateTime,
    ) -> Result<ImpactReport, EngineError> {
        for record in records {
            validate_record(record)?;
        }

        let in_window = window::trailing_window(records, as_of, self.options.window_days);
        let averaged = window::average_record(&in_window, as_of);
        if self.options.strict && averaged.is_unknown() {
            return Err(EngineError::InsufficientData);
        }

        let mut report = self.build_report(&averaged, in_window.len());
        report.trends = Some(window::trends(&in_window));

        tracing::debug!(
            records = in_window.len(),
            energy_score = report.energy_score,
            "evaluated consumption window"
        );

        Ok(report)
    }

    fn build_report(&self, record: &ConsumptionRecord, records_considered: usize) -> ImpactReport {
        ImpactReport {
            as_of: record.timestamp,
            records_considered,
            carbon_footprint: footprint::carbon_footprint(record, &self.baseline),
            energy_score: score::energy_score(record, &self.baseline),
            comparative_metrics: compare::comparative_metrics(record, &self.baseline),
            trends: None,
            recommendations: recommend::recommendations(record, &self.baseline),
        }
    }
}
