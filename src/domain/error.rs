// Dashboard error taxonomy
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Endpoint unreachable (no status code) or answered with a non-success status.
    #[error("failed to get status: {} {status_text}", status_label(.status_code))]
    Transport {
        status_code: Option<u16>,
        status_text: String,
    },

    #[error("malformed status payload: {detail}")]
    Decode { detail: String },

    #[error("invariant violated: {detail}")]
    InvariantViolation { detail: String },

    #[error("chart {chart} updated before it was created")]
    NotInitialized { chart: String },
}

fn status_label(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message() {
        let err = DashboardError::Transport {
            status_code: Some(503),
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "failed to get status: 503 Service Unavailable");

        let err = DashboardError::Transport {
            status_code: None,
            status_text: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "failed to get status: - connection refused");
    }
}
