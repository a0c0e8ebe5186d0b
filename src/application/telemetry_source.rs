// Telemetry source trait for status report access
use crate::domain::error::DashboardError;
use crate::domain::report::Report;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the cumulative report of the running benchmark.
    ///
    /// Fails with `Transport` when the endpoint is unreachable or answers
    /// with a non-success status, and with `Decode` when the payload does not
    /// have the expected shape. Never retries.
    async fn fetch_report(&self) -> Result<Report, DashboardError>;
}
