pub mod compare_export;
pub mod dataset;
pub mod persist;
pub mod schema;
pub mod season_metrics;
pub mod state;
