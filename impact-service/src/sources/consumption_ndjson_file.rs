use std::path::PathBuf;

use async_stream::stream;
use impact_client::domain::UserConsumption;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// NDJSON source for consumption history.
///
/// Each non-blank line is a JSON object with `user_id`, an RFC3339
/// `timestamp`, and any of the optional measurement fields.
pub struct ConsumptionNdjsonFileSource {
    path: PathBuf,
}

impl ConsumptionNdjsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn parse_line(line: &str) -> Result<UserConsumption, PipelineError> {
    serde_json::from_str(line)
        .map_err(|e| PipelineError::Source(format!("failed to parse consumption json line: {e}")))
}

#[async_trait::async_trait]
impl Source<UserConsumption> for ConsumptionNdjsonFileSource {
    async fn stream(&self) -> EnvelopeStream<UserConsumption> {
        let path = self.path.clone();
        let s = stream! {
            let file = match File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to open NDJSON file: {e}")));
                    return;
                }
            };
            let mut lines = BufReader::new(file).lines();

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(PipelineError::Source(format!("failed to read NDJSON line: {e}")));
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                // A bad line is reported and skipped; the rest of the file still flows.
                match parse_line(&line) {
                    Ok(c) => yield Ok(Envelope::now(c)),
                    Err(e) => {
                        metrics::counter!("consumption_ndjson_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use impact_client::domain::Diet;
    use time::macros::datetime;

    #[test]
    fn parses_line_with_display_diet_name() {
        let parsed = parse_line(
            r#"{"user_id":"u-9","timestamp":"2024-02-01T08:00:00Z","gas_therms":55.5,"diet":"Vegan"}"#,
        )
        .unwrap();

        assert_eq!(parsed.user_id, "u-9");
        assert_eq!(parsed.record.timestamp, datetime!(2024-02-01 08:00:00 UTC));
        assert_eq!(parsed.record.gas_therms, Some(55.5));
        assert_eq!(parsed.record.diet, Some(Diet::Vegan));
        assert_eq!(parsed.record.water_gallons, None);
    }

    #[test]
    fn rejects_unknown_diet() {
        let res = parse_line(r#"{"user_id":"u-9","timestamp":"2024-02-01T08:00:00Z","diet":"paleo"}"#);
        assert!(matches!(res, Err(PipelineError::Source(_))));
    }

    #[tokio::test]
    async fn streams_lines_from_file() {
        let path = std::env::temp_dir().join(format!("impact-ndjson-{}.ndjson", std::process::id()));
        tokio::fs::write(
            &path,
            concat!(
                r#"{"user_id":"a","timestamp":"2024-02-01T00:00:00Z","electricity_kwh":700}"#,
                "\n\n",
                r#"{"user_id":"b","timestamp":"2024-02-02T00:00:00Z","car_miles":"lots"}"#,
                "\n",
                r#"{"user_id":"c","timestamp":"2024-02-03T00:00:00Z"}"#,
                "\n",
            ),
        )
        .await
        .unwrap();

        let items: Vec<_> = ConsumptionNdjsonFileSource::new(&path).stream().await.collect().await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().payload.user_id, "a");
        assert!(items[1].is_err());
        assert_eq!(items[2].as_ref().unwrap().payload.user_id, "c");
    }
}
