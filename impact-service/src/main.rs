use anyhow::{bail, Result};
use impact_client::domain::UserConsumption;
use impact_service::{
    config::AppConfig,
    observability,
    pipeline::{EnvelopeStream, Pipeline, Source},
    sinks::ReportSink,
    sources::{ConsumptionCsvFileSource, ConsumptionNdjsonFileSource},
    transform,
};
use std::{env, path::Path, pin::Pin, sync::Arc};
use tokio::io::AsyncWrite;

enum HistorySource {
    Csv(ConsumptionCsvFileSource),
    Ndjson(ConsumptionNdjsonFileSource),
}

impl HistorySource {
    fn for_path(path: &str) -> Self {
        let is_ndjson = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ndjson") || e.eq_ignore_ascii_case("jsonl"));
        if is_ndjson {
            Self::Ndjson(ConsumptionNdjsonFileSource::new(path))
        } else {
            Self::Csv(ConsumptionCsvFileSource::new(path))
        }
    }
}

#[async_trait::async_trait]
impl Source<UserConsumption> for HistorySource {
    async fn stream(&self) -> EnvelopeStream<UserConsumption> {
        match self {
            Self::Csv(s) => s.stream().await,
            Self::Ndjson(s) => s.stream().await,
        }
    }
}

type BoxedWriter = Pin<Box<dyn AsyncWrite + Send>>;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: impact-service <history.csv|history.ndjson> [output.ndjson]");
    }
    let input_path = &args[1];

    let cfg = AppConfig::load()?;
    let engine = cfg.build_engine()?;

    let writer: BoxedWriter = match args.get(2) {
        Some(out) => Box::pin(tokio::fs::File::create(out).await?),
        None => Box::pin(tokio::io::stdout()),
    };

    tracing::info!(
        input = %input_path,
        window_days = engine.options().window_days,
        "building impact reports"
    );

    let pipeline: Pipeline<_, UserConsumption, _> = Pipeline {
        source: HistorySource::for_path(input_path),
        transforms: vec![Arc::new(transform::ConsumptionValidation)],
        sink: ReportSink::new(engine, writer),
    };

    pipeline.run().await?;

    Ok(())
}
