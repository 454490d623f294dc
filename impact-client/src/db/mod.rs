pub mod consumption_queries;

pub use consumption_queries::{load_window, ConsumptionRow};
