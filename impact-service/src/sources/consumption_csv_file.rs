use std::{fs::File, path::PathBuf};

use csv::StringRecord;
use impact_client::domain::{ConsumptionRecord, Diet, UserConsumption};
use time::OffsetDateTime;

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// CSV source for consumption history.
///
/// Expected header columns (by name):
/// - user_id
/// - timestamp (RFC3339)
/// - electricity_kwh, gas_therms, water_gallons, car_miles,
///   public_transport_miles (optional)
/// - diet (optional, e.g. "Meat Weekly")
/// - household_size (optional)
///
/// An empty cell or a missing optional column means the value is unknown.
pub struct ConsumptionCsvFileSource {
    path: PathBuf,
}

impl ConsumptionCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn parse_optional<T>(name: &str, s: Option<&str>) -> Result<Option<T>, PipelineError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e| PipelineError::Source(format!("invalid {name} '{v}': {e}"))),
    }
}

fn column<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|idx| record.get(idx))
}

fn record_to_user_consumption(
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<UserConsumption, PipelineError> {
    let get = |name: &str| column(record, headers, name);
    let require = |name: &str| {
        column(record, headers, name)
            .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV record")))
    };

    let user_id = require("user_id")?.trim().to_string();

    let ts_str = require("timestamp")?;
    let timestamp = OffsetDateTime::parse(ts_str.trim(), &time::format_description::well_known::Rfc3339)
        .map_err(|e| PipelineError::Source(format!("invalid timestamp '{ts_str}': {e}")))?;

    let record = ConsumptionRecord {
        timestamp,
        electricity_kwh: parse_optional("electricity_kwh", get("electricity_kwh"))?,
        gas_therms: parse_optional("gas_therms", get("gas_therms"))?,
        water_gallons: parse_optional("water_gallons", get("water_gallons"))?,
        car_miles: parse_optional("car_miles", get("car_miles"))?,
        public_transport_miles: parse_optional("public_transport_miles", get("public_transport_miles"))?,
        diet: parse_optional::<Diet>("diet", get("diet"))?,
        household_size: parse_optional("household_size", get("household_size"))?,
    };

    Ok(UserConsumption { user_id, record })
}

#[async_trait::async_trait]
impl Source<UserConsumption> for ConsumptionCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<UserConsumption> {
        // Blocking CSV reader inside a single stream; history files are small.
        let path = self.path.clone();
        let s = async_stream::stream! {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to open CSV file: {e}")));
                    return;
                }
            };
            let mut rdr = csv::Reader::from_reader(file);
            let headers = match rdr.headers() {
                Ok(h) => h.clone(),
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to read CSV headers: {e}")));
                    return;
                }
            };

            for result in rdr.records() {
                let parsed = result
                    .map_err(|e| PipelineError::Source(format!("failed to read CSV record: {e}")))
                    .and_then(|record| record_to_user_consumption(&record, &headers));

                // A bad row is reported and skipped; later rows still flow.
                match parsed {
                    Ok(c) => yield Ok(Envelope::now(c)),
                    Err(e) => {
                        metrics::counter!("consumption_csv_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
