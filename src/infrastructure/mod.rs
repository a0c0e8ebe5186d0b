// Infrastructure layer - External dependencies and adapters
pub mod chart_specs;
pub mod config;
pub mod status_client;
pub mod view_store;
