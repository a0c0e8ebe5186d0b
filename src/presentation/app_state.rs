// Application state for HTTP handlers
use crate::infrastructure::view_store::ViewStore;

#[derive(Clone)]
pub struct AppState {
    pub views: ViewStore,
}
