//! Metrics for the cleaning pipeline.
//!
//! Recorded through the `metrics` facade; without an installed recorder every
//! call is a no-op, so the engine can emit them unconditionally.

use std::fmt;

/// Enum representing all metric names used by the cleaner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsRejected,
    FieldsUnparseable,
    BatchesProcessed,
    BatchInputRows,
    BatchOutputRows,
    RunsFailed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsRejected => "cleaner_rows_rejected_total",
            MetricName::FieldsUnparseable => "cleaner_fields_unparseable_total",
            MetricName::BatchesProcessed => "cleaner_batches_processed_total",
            MetricName::BatchInputRows => "cleaner_batch_input_rows",
            MetricName::BatchOutputRows => "cleaner_batch_output_rows",
            MetricName::RunsFailed => "cleaner_runs_failed_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Cleaning Metrics
// ============================================================================

pub mod cleaning {
    use super::MetricName;

    /// Record that a row was removed from a batch
    pub fn row_rejected(dataset: &str, column: &str, reason: &str) {
        ::metrics::counter!(
            MetricName::RowsRejected.as_str(),
            "dataset" => dataset.to_string(),
            "column" => column.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// Record that a field was coerced to missing
    pub fn field_unparseable(dataset: &str, column: &str) {
        ::metrics::counter!(
            MetricName::FieldsUnparseable.as_str(),
            "dataset" => dataset.to_string(),
            "column" => column.to_string()
        )
        .increment(1);
    }

    /// Record a completed batch with its size before and after cleaning
    pub fn batch_processed(dataset: &str, input_rows: usize, output_rows: usize) {
        ::metrics::counter!(
            MetricName::BatchesProcessed.as_str(),
            "dataset" => dataset.to_string()
        )
        .increment(1);
        ::metrics::histogram!(
            MetricName::BatchInputRows.as_str(),
            "dataset" => dataset.to_string()
        )
        .record(input_rows as f64);
        ::metrics::histogram!(
            MetricName::BatchOutputRows.as_str(),
            "dataset" => dataset.to_string()
        )
        .record(output_rows as f64);
    }

    /// Record a run that aborted before producing a batch
    pub fn run_failed(dataset: &str) {
        ::metrics::counter!(
            MetricName::RunsFailed.as_str(),
            "dataset" => dataset.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_follow_prometheus_conventions() {
        for name in [
            MetricName::RowsRejected,
            MetricName::FieldsUnparseable,
            MetricName::BatchesProcessed,
            MetricName::RunsFailed,
        ] {
            assert!(name.as_str().starts_with("cleaner_"));
            assert!(name.as_str().ends_with("_total"));
        }
        assert_eq!(MetricName::BatchInputRows.to_string(), "cleaner_batch_input_rows");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        cleaning::row_rejected("card", "card_provider", "vocabulary");
        cleaning::field_unparseable("user", "join_date");
        cleaning::batch_processed("user", 10, 8);
        cleaning::run_failed("product");
    }
}
