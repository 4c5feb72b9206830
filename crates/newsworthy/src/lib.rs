pub mod api;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod providers;
pub mod sources;
pub mod telemetry;
