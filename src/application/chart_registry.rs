// Chart registry - Sole owner of the long-lived chart views
use crate::application::aggregator::DashboardFrame;
use crate::application::renderer::{ChartRenderer, ChartView};
use crate::domain::chart::{ChartDataset, ChartId, HistogramRange, TimeDomain};
use crate::domain::error::DashboardError;
use crate::infrastructure::chart_specs;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const TIME_DOMAIN_PARAM: &str = "time_domain";
pub const LATENCY_MIN_PARAM: &str = "latency_min";
pub const LATENCY_MAX_PARAM: &str = "latency_max";

struct RegisteredChart {
    view: Box<dyn ChartView>,
}

pub struct ChartRegistry {
    renderer: Arc<dyn ChartRenderer>,
    charts: BTreeMap<ChartId, RegisteredChart>,
}

impl ChartRegistry {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            renderer,
            charts: BTreeMap::new(),
        }
    }

    /// Create every fixed chart plus one histogram per workload. Charts that
    /// already exist are left alone.
    pub fn create_all(&mut self, workload_names: &[String]) {
        for id in ChartId::FIXED {
            self.create(id);
        }
        for workload in workload_names {
            self.ensure_histogram(workload);
        }
    }

    /// Lazily create the histogram chart of a workload. Returns true when the
    /// chart did not exist before.
    pub fn ensure_histogram(&mut self, workload: &str) -> bool {
        self.create(ChartId::Histogram(workload.to_string()))
    }

    fn create(&mut self, id: ChartId) -> bool {
        if self.charts.contains_key(&id) {
            return false;
        }

        tracing::debug!("Creating chart {}", id);
        let view = self.renderer.create_view(&id, chart_specs::describe(&id));
        self.charts.insert(id, RegisteredChart { view });
        true
    }

    pub fn is_created(&self, id: &ChartId) -> bool {
        self.charts.contains_key(id)
    }

    #[cfg(test)]
    pub fn chart_ids(&self) -> impl Iterator<Item = &ChartId> {
        self.charts.keys()
    }


    /// Replace a chart's data, re-apply the shared time domain to time-series
    /// charts, then re-layout.
    pub fn update(
        &mut self,
        id: &ChartId,
        dataset: &ChartDataset,
        time_domain: TimeDomain,
    ) -> Result<(), DashboardError> {
        let chart = self.chart_mut(id)?;
        if dataset.is_empty() {
            tracing::trace!("Chart {} has no rows yet", id);
        } else {
            tracing::trace!("Updating chart {} with {} rows", id, dataset.len());
        }

        if id.is_time_series() {
            chart.view.set_param(TIME_DOMAIN_PARAM, json!(time_domain));
        }
        chart.view.replace_data(dataset);
        chart.view.resize();
        Ok(())
    }

    pub fn set_histogram_range(
        &mut self,
        id: &ChartId,
        range: HistogramRange,
    ) -> Result<(), DashboardError> {
        let chart = self.chart_mut(id)?;
        chart.view.set_param(LATENCY_MIN_PARAM, json!(range.latency_min_ms));
        chart.view.set_param(LATENCY_MAX_PARAM, json!(range.latency_max_ms));
        Ok(())
    }

    /// Push a whole frame. Every chart it names must already exist; nothing
    /// is touched otherwise.
    pub fn apply(&mut self, frame: &DashboardFrame) -> Result<(), DashboardError> {
        if let Some(missing) = frame.updates.iter().find(|u| !self.is_created(&u.id)) {
            return Err(not_initialized(&missing.id));
        }

        for update in &frame.updates {
            if let Some(range) = update.histogram_range {
                self.set_histogram_range(&update.id, range)?;
            }
            self.update(&update.id, &update.dataset, frame.time_domain)?;
        }
        Ok(())
    }

    pub fn show_note(&self, note: &str) {
        self.renderer.show_note(note);
    }

    fn chart_mut(&mut self, id: &ChartId) -> Result<&mut RegisteredChart, DashboardError> {
        self.charts.get_mut(id).ok_or_else(|| not_initialized(id))
    }
}

fn not_initialized(id: &ChartId) -> DashboardError {
    DashboardError::NotInitialized {
        chart: id.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SetParam(String, serde_json::Value),
        ReplaceData(usize),
        Resize,
    }

    #[derive(Debug, Clone, Default)]
    pub struct ViewLog {
        pub description: serde_json::Value,
        pub calls: Vec<Call>,
        pub data: Option<serde_json::Value>,
    }

    /// Records every call made on its views, keyed by chart id.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub views: Arc<Mutex<BTreeMap<String, ViewLog>>>,
        pub notes: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingRenderer {
        pub fn log(&self, id: &ChartId) -> ViewLog {
            self.views.lock().unwrap()[&id.to_string()].clone()
        }

        pub fn replace_count(&self, id: &ChartId) -> usize {
            self.log(id)
                .calls
                .iter()
                .filter(|c| matches!(c, Call::ReplaceData(_)))
                .count()
        }

        pub fn last_param(&self, id: &ChartId, name: &str) -> Option<serde_json::Value> {
            self.log(id).calls.iter().rev().find_map(|c| match c {
                Call::SetParam(n, v) if n == name => Some(v.clone()),
                _ => None,
            })
        }
    }

    struct RecordingView {
        key: String,
        views: Arc<Mutex<BTreeMap<String, ViewLog>>>,
    }

    impl RecordingView {
        fn record(&self, call: Call, data: Option<serde_json::Value>) {
            let mut views = self.views.lock().unwrap();
            let log = views.get_mut(&self.key).unwrap();
            log.calls.push(call);
            if data.is_some() {
                log.data = data;
            }
        }
    }

    impl ChartView for RecordingView {
        fn set_param(&mut self, name: &str, value: serde_json::Value) {
            self.record(Call::SetParam(name.to_string(), value), None);
        }

        fn replace_data(&mut self, dataset: &ChartDataset) {
            let data = serde_json::to_value(dataset).unwrap();
            self.record(Call::ReplaceData(dataset.len()), Some(data));
        }

        fn resize(&mut self) {
            self.record(Call::Resize, None);
        }
    }

    impl ChartRenderer for RecordingRenderer {
        fn create_view(&self, id: &ChartId, description: serde_json::Value) -> Box<dyn ChartView> {
            let key = id.to_string();
            self.views.lock().unwrap().insert(
                key.clone(),
                ViewLog {
                    description,
                    ..Default::default()
                },
            );
            Box::new(RecordingView {
                key,
                views: self.views.clone(),
            })
        }

        fn show_note(&self, note: &str) {
            self.notes.lock().unwrap().push(note.to_string());
        }
    }
}
