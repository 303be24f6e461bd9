pub mod burnout;
pub mod config;
pub mod error;
pub mod telemetry;
