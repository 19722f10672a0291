// Observability: metrics emitted by the cleaning pipeline

pub mod metrics;
