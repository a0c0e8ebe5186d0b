// Presentation layer - HTTP surface over the rendered chart views
pub mod app_state;
pub mod handlers;
