pub mod consumption_csv_file;
pub mod consumption_ndjson_file;

pub use consumption_csv_file::ConsumptionCsvFileSource;
pub use consumption_ndjson_file::ConsumptionNdjsonFileSource;
