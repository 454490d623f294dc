pub mod config;
pub mod engine;
pub mod observability;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod sinks;
pub mod sources;
pub mod transform;

pub use engine::{Baseline, EngineError, EngineOptions, ImpactEngine};
pub use pipeline::{Envelope, Pipeline};
pub use report::ImpactReport;
