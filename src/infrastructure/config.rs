use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base location of the benchmark's HTTP server.
    pub status_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub listen_addr: SocketAddr,
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        if self.status_url.trim().is_empty() {
            anyhow::bail!("status_url must not be empty");
        }
        Ok(self)
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("status_url", "http://localhost:8005")?
        .set_default("poll_interval_secs", 5)?
        .set_default("request_timeout_secs", 10)?
        .set_default("listen_addr", "127.0.0.1:8080")?)
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD_*`
/// environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD"))
        .build()?;

    settings.try_deserialize::<DashboardConfig>()?.validate()
}
