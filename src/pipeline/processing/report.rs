use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::observability::metrics;

/// Why a row was removed from a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// A cell was missing (or a null marker) after null normalization
    MissingValue,
    /// A date did not match any accepted digit-group shape
    DateShape,
    /// A categorical value is not part of the column's vocabulary
    Vocabulary,
    /// Exact copy of an earlier row
    Duplicate,
    /// Weight conversion failed and the drop policy is active
    WeightFailure,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MissingValue => "missing_value",
            RejectionReason::DateShape => "date_shape",
            RejectionReason::Vocabulary => "vocabulary",
            RejectionReason::Duplicate => "duplicate",
            RejectionReason::WeightFailure => "weight_failure",
        }
    }
}

/// Kind of field that could not be brought into canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Date,
    Weight,
}

/// A removed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub row_index: usize,
    /// Column that triggered the removal; `None` for whole-row checks such as duplicates
    pub column: Option<String>,
    pub value: Option<String>,
    pub reason: RejectionReason,
}

/// A surviving row whose field was coerced to missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unparseable {
    pub row_index: usize,
    pub column: String,
    pub value: String,
    pub kind: FieldKind,
    pub detail: Option<String>,
}

/// Per-column roll-up of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub rejected: usize,
    pub unparseable: usize,
    pub reasons: BTreeMap<RejectionReason, usize>,
    pub samples: Vec<String>,
}

/// Audit trail produced next to every cleaned batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub run_id: Uuid,
    pub dataset: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub input_rows: usize,
    pub output_rows: usize,
    pub rejections: Vec<Rejection>,
    pub unparseable: Vec<Unparseable>,
}

/// Column label used in summaries for whole-row rejections
const ROW_LEVEL: &str = "<row>";

impl DiagnosticReport {
    pub fn new(dataset: &str, input_rows: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            dataset: dataset.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            input_rows,
            output_rows: input_rows,
            rejections: Vec::new(),
            unparseable: Vec::new(),
        }
    }

    pub fn record_rejection(
        &mut self,
        row_index: usize,
        column: Option<&str>,
        value: Option<String>,
        reason: RejectionReason,
    ) {
        metrics::cleaning::row_rejected(
            &self.dataset,
            column.unwrap_or(ROW_LEVEL),
            reason.as_str(),
        );
        self.rejections.push(Rejection {
            row_index,
            column: column.map(|c| c.to_string()),
            value,
            reason,
        });
    }

    pub fn record_unparseable(
        &mut self,
        row_index: usize,
        column: &str,
        value: String,
        kind: FieldKind,
        detail: Option<String>,
    ) {
        metrics::cleaning::field_unparseable(&self.dataset, column);
        self.unparseable.push(Unparseable {
            row_index,
            column: column.to_string(),
            value,
            kind,
            detail,
        });
    }

    pub fn finish(&mut self, output_rows: usize) {
        self.output_rows = output_rows;
        self.finished_at = Some(Utc::now());
    }

    pub fn rejected_count(&self) -> usize {
        self.rejections.len()
    }

    pub fn unparseable_count(&self) -> usize {
        self.unparseable.len()
    }

    pub fn rejections_for(&self, reason: RejectionReason) -> impl Iterator<Item = &Rejection> {
        self.rejections.iter().filter(move |r| r.reason == reason)
    }

    /// Group rejections and unparseable fields per column, keeping up to
    /// `sample_size` sample values for each.
    pub fn summary(&self, sample_size: usize) -> Vec<ColumnSummary> {
        let mut by_column: BTreeMap<String, ColumnSummary> = BTreeMap::new();

        for rejection in &self.rejections {
            let column = rejection.column.as_deref().unwrap_or(ROW_LEVEL);
            let entry = by_column
                .entry(column.to_string())
                .or_insert_with(|| empty_summary(column));
            entry.rejected += 1;
            *entry.reasons.entry(rejection.reason).or_insert(0) += 1;
            if let Some(value) = &rejection.value {
                push_sample(&mut entry.samples, value, sample_size);
            }
        }

        for field in &self.unparseable {
            let entry = by_column
                .entry(field.column.clone())
                .or_insert_with(|| empty_summary(&field.column));
            entry.unparseable += 1;
            push_sample(&mut entry.samples, &field.value, sample_size);
        }

        by_column.into_values().collect()
    }
}

fn empty_summary(column: &str) -> ColumnSummary {
    ColumnSummary {
        column: column.to_string(),
        rejected: 0,
        unparseable: 0,
        reasons: BTreeMap::new(),
        samples: Vec::new(),
    }
}

fn push_sample(samples: &mut Vec<String>, value: &str, sample_size: usize) {
    if samples.len() < sample_size && !samples.iter().any(|s| s == value) {
        samples.push(value.to_string());
    }
}
