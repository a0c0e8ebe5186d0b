// HTTP request handlers
use crate::infrastructure::view_store::{DashboardView, RenderedChart};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Every chart with its description, parameters and current rows
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.views.snapshot())
}

pub async fn get_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RenderedChart>, StatusCode> {
    state.views.chart(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
