// HTTP status client - Fetches the benchmark's cumulative report
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::DashboardError;
use crate::domain::report::Report;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const STATUS_PATH: &str = "/api/status";

#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    status_url: String,
    client: reqwest::Client,
}

impl HttpStatusClient {
    /// `base_url` is where the benchmark's HTTP server listens; `timeout`
    /// bounds a single status request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            status_url: Self::build_status_url(base_url),
            client,
        })
    }

    fn build_status_url(base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), STATUS_PATH)
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }
}

fn transport(error: reqwest::Error) -> DashboardError {
    DashboardError::Transport {
        status_code: error.status().map(|s| s.as_u16()),
        status_text: error.to_string(),
    }
}

#[async_trait]
impl TelemetrySource for HttpStatusClient {
    async fn fetch_report(&self) -> Result<Report, DashboardError> {
        let response = self
            .client
            .get(&self.status_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Transport {
                status_code: Some(status.as_u16()),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        tracing::trace!("Got {} bytes from {}", body.len(), self.status_url);

        serde_json::from_str::<Report>(&body).map_err(|e| DashboardError::Decode {
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    const STATUS_JSON: &str = r#"{
        "CurrentTime": 3.5,
        "Note": "",
        "Workloads": ["read"],
        "DataSnapshots": [{
            "Time": 1.0,
            "AllWorkloadData": {
                "Rate": 10, "DesiredRate": 10, "Mean": 100, "Max": 200,
                "Percentile25": 50, "Percentile50": 90, "Percentile75": 120,
                "Percentile90": 150, "Percentile99": 190
            },
            "PerWorkloadData": {}
        }]
    }"#;

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn client(base_url: &str) -> HttpStatusClient {
        HttpStatusClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_status_url() {
        assert_eq!(
            HttpStatusClient::build_status_url("http://localhost:8005/"),
            "http://localhost:8005/api/status"
        );
        assert_eq!(
            HttpStatusClient::build_status_url("http://bench:9000"),
            "http://bench:9000/api/status"
        );
    }

    #[tokio::test]
    async fn test_fetch_report() {
        let base = spawn_server(Router::new().route(STATUS_PATH, get(|| async { STATUS_JSON }))).await;

        let report = client(&base).fetch_report().await.unwrap();
        assert_eq!(report.current_time, 3.5);
        assert_eq!(report.workload_names, vec!["read"]);
        assert_eq!(report.snapshots[0].overall.percentile99, 190.0);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let base = spawn_server(Router::new().route(
            STATUS_PATH,
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        ))
        .await;

        let err = client(&base).fetch_report().await.unwrap_err();
        assert_eq!(
            err,
            DashboardError::Transport {
                status_code: Some(503),
                status_text: "Service Unavailable".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let base = spawn_server(Router::new().route(
            STATUS_PATH,
            get(|| async { r#"{"Workloads": ["read"], "CurrentTime": 1}"# }),
        ))
        .await;

        let err = client(&base).fetch_report().await.unwrap_err();
        match err {
            DashboardError::Decode { detail } => assert!(detail.contains("DataSnapshots")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).fetch_report().await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Transport {
                status_code: None,
                ..
            }
        ));
    }
}
