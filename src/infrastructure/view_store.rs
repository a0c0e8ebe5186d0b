// In-memory chart views - The renderer the HTTP surface reads from
use crate::application::renderer::{ChartRenderer, ChartView};
use crate::domain::chart::{ChartDataset, ChartId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything a page needs to draw one chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedChart {
    pub id: String,
    pub title: String,
    pub description: Value,
    pub params: BTreeMap<String, Value>,
    pub data: Value,
    /// Bumped on every layout pass.
    pub revision: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DashboardView {
    pub note: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub charts: Vec<RenderedChart>,
}

/// Shared store of rendered views. Views are kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct ViewStore {
    inner: Arc<RwLock<DashboardView>>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardView {
        self.read().clone()
    }

    pub fn chart(&self, id: &str) -> Option<RenderedChart> {
        self.read().charts.iter().find(|c| c.id == id).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, DashboardView> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardView> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_chart(&self, id: &str, f: impl FnOnce(&mut RenderedChart)) {
        let mut view = self.write();
        if let Some(chart) = view.charts.iter_mut().find(|c| c.id == id) {
            f(chart);
            view.updated_at = Some(Utc::now());
        }
    }
}

struct StoredView {
    id: String,
    store: ViewStore,
    // Pending changes are published on resize, like a layout pass
    pending_params: BTreeMap<String, Value>,
    pending_data: Option<Value>,
}

impl ChartView for StoredView {
    fn set_param(&mut self, name: &str, value: Value) {
        self.pending_params.insert(name.to_string(), value);
    }

    fn replace_data(&mut self, dataset: &ChartDataset) {
        match serde_json::to_value(dataset) {
            Ok(data) => self.pending_data = Some(data),
            Err(e) => tracing::error!("Failed to encode data for chart {}: {}", self.id, e),
        }
    }

    fn resize(&mut self) {
        let params = std::mem::take(&mut self.pending_params);
        let data = self.pending_data.take();
        self.store.with_chart(&self.id, |chart| {
            chart.params.extend(params);
            if let Some(data) = data {
                chart.data = data;
            }
            chart.revision += 1;
        });
    }
}

impl ChartRenderer for ViewStore {
    fn create_view(&self, id: &ChartId, description: Value) -> Box<dyn ChartView> {
        let key = id.to_string();
        {
            let mut view = self.write();
            if !view.charts.iter().any(|c| c.id == key) {
                view.charts.push(RenderedChart {
                    id: key.clone(),
                    title: id.title(),
                    description,
                    params: BTreeMap::new(),
                    data: Value::Array(Vec::new()),
                    revision: 0,
                });
            }
        }

        Box::new(StoredView {
            id: key,
            store: self.clone(),
            pending_params: BTreeMap::new(),
            pending_data: None,
        })
    }

    fn show_note(&self, note: &str) {
        self.write().note = note.to_string();
    }
}
