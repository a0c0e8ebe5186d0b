// Poll loop - Fetch, normalize, aggregate and render on a fixed cadence
use crate::application::aggregator::build_frame;
use crate::application::chart_registry::ChartRegistry;
use crate::application::normalizer::normalize;
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::DashboardError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

pub struct PollLoop {
    source: Arc<dyn TelemetrySource>,
    registry: ChartRegistry,
    interval: Duration,
    charts_created: bool,
    last_note: String,
}

impl PollLoop {
    pub fn new(source: Arc<dyn TelemetrySource>, registry: ChartRegistry, interval: Duration) -> Self {
        Self {
            source,
            registry,
            interval,
            charts_created: false,
            last_note: String::new(),
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// Poll forever. Each poll runs to completion before the next tick is
    /// awaited, and a tick that came due while a poll was still running is
    /// dropped, so at most one poll is ever in flight.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_finished: Option<Instant> = None;

        loop {
            let scheduled = ticker.tick().await;
            if last_finished.is_some_and(|finished| scheduled < finished) {
                tracing::debug!("Previous poll overran the {:?} interval, skipping tick", self.interval);
                continue;
            }

            self.tick().await;
            last_finished = Some(Instant::now());
        }
    }

    /// Run one poll and absorb its failure. Charts keep whatever they showed
    /// before a failed poll. Returns whether the poll succeeded.
    pub async fn tick(&mut self) -> bool {
        match self.poll_once().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Poll failed, keeping last rendered data: {}", e);
                self.registry
                    .show_note(&failure_note(&self.last_note, &e));
                false
            }
        }
    }

    /// One full pass of fetch, normalize, aggregate and render.
    pub async fn poll_once(&mut self) -> Result<(), DashboardError> {
        let report = self.source.fetch_report().await?;
        let report = normalize(&report);

        if !self.charts_created {
            self.registry.create_all(&report.workload_names);
            self.charts_created = true;
            tracing::info!(
                "Created charts for {} workloads: {:?}",
                report.workload_names.len(),
                report.workload_names
            );
        } else {
            for workload in &report.workload_names {
                if self.registry.ensure_histogram(workload) {
                    tracing::info!("New workload {} appeared, created its histogram", workload);
                }
            }
        }

        // Derive everything before touching any chart
        let frame = build_frame(&report)?;
        self.registry.apply(&frame)?;

        tracing::debug!(
            "Rendered {} snapshots for {} workloads, time domain [{}, {}]",
            report.snapshots.len(),
            report.workload_names.len(),
            frame.time_domain.min,
            frame.time_domain.max
        );

        self.registry.show_note(&report.note);
        self.last_note = report.note;
        Ok(())
    }
}

fn failure_note(last_note: &str, error: &DashboardError) -> String {
    if last_note.is_empty() {
        format!("last poll failed: {}", error)
    } else {
        format!("{}; last poll failed: {}", last_note, error)
    }
}
