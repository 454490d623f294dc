use std::collections::BTreeMap;

use futures::StreamExt;
use impact_client::domain::{ConsumptionRecord, UserConsumption};
use serde::Serialize;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

use crate::{
    engine::ImpactEngine,
    pipeline::{Envelope, PipelineError, Sink},
    report::ImpactReport,
};

/// One NDJSON output line.
#[derive(Debug, Serialize)]
pub struct UserReportLine<'a> {
    pub user_id: &'a str,
    pub fingerprint: String,
    pub report: &'a ImpactReport,
}

/// Collects every user's history, then writes one report line per user.
///
/// Each user's window ends at that user's most recent record. Users are
/// written in user id order.
pub struct ReportSink<W> {
    engine: ImpactEngine,
    writer: Mutex<W>,
}

impl<W> ReportSink<W> {
    pub fn new(engine: ImpactEngine, writer: W) -> Self {
        Self {
            engine,
            writer: Mutex::new(writer),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> ReportSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_report(&self, user_id: &str, report: &ImpactReport) -> Result<(), PipelineError> {
        let fingerprint = report
            .fingerprint()
            .map_err(|e| PipelineError::Sink(format!("failed to encode report: {e}")))?;
        let line = UserReportLine {
            user_id,
            fingerprint,
            report,
        };
        let mut bytes = serde_json::to_vec(&line)
            .map_err(|e| PipelineError::Sink(format!("failed to encode report: {e}")))?;
        bytes.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&bytes)
            .await
            .map_err(|e| PipelineError::Sink(format!("failed to write report: {e}")))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<W> Sink<UserConsumption> for ReportSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<UserConsumption>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut histories: BTreeMap<String, Vec<ConsumptionRecord>> = BTreeMap::new();

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping record rejected upstream of ReportSink");
                    continue;
                }
            };

            let UserConsumption { user_id, record } = env.payload;
            histories.entry(user_id).or_default().push(record);
        }

        tracing::info!(users = histories.len(), "evaluating consumption histories");

        for (user_id, records) in &histories {
            let Some(as_of) = records.iter().map(|r| r.timestamp).max() else {
                continue;
            };

            let report = match self.engine.evaluate_window(records, as_of) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(error = %e, user_id = %user_id, "failed to evaluate user history");
                    metrics::counter!("impact_report_errors_total").increment(1);
                    continue;
                }
            };

            self.write_report(user_id, &report).await?;
            metrics::counter!("impact_reports_written_total").increment(1);
        }

        self.writer
            .lock()
            .await
            .flush()
            .await
            .map_err(|e| PipelineError::Sink(format!("failed to flush reports: {e}")))?;

        Ok(())
    }
}
