// Domain layer - Telemetry value types, chart datasets and errors
pub mod chart;
pub mod error;
pub mod report;
