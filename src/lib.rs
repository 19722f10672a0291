pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;

// Application use cases and the adapters they run against
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;
