// Application layer - Poll, normalize, aggregate and render use cases
pub mod aggregator;
pub mod chart_registry;
pub mod normalizer;
pub mod poll_loop;
pub mod renderer;
pub mod telemetry_source;
