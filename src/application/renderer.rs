// Rendering capability - Turns a declarative chart description into a live view
use crate::domain::chart::{ChartDataset, ChartId};
use serde_json::Value;

/// A live view bound to one chart description. Every operation may be
/// repeated with the same input without visible effect.
pub trait ChartView: Send {
    fn set_param(&mut self, name: &str, value: Value);

    /// Replace the whole backing data set.
    fn replace_data(&mut self, dataset: &ChartDataset);

    /// Re-run layout after data or parameters changed.
    fn resize(&mut self);
}

pub trait ChartRenderer: Send + Sync {
    fn create_view(&self, id: &ChartId, description: Value) -> Box<dyn ChartView>;

    /// Operator-facing annotation shown next to the charts.
    fn show_note(&self, note: &str);
}
