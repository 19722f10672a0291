//! Generic batch passes shared by every dataset pipeline.
//!
//! Each pass takes ownership of a batch and hands back the (possibly smaller)
//! batch, recording anything it removes in the diagnostic report.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::domain::{Record, RecordBatch, Value};
use crate::error::Result;
use crate::pipeline::processing::report::{DiagnosticReport, RejectionReason};

/// Deterministic text rewrite applied to one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFix {
    /// Replace every occurrence of `from` with `to`
    Replace { from: &'static str, to: &'static str },
    /// Strip the characters from both ends
    TrimChars(&'static [char]),
    /// Keep ASCII digits only
    DigitsOnly,
    /// Undo a doubled-letter artifact: a leading pair is removed,
    /// a trailing pair collapses to one letter
    StripStutter(char),
}

impl TextFix {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextFix::Replace { from, to } => text.replace(from, to),
            TextFix::TrimChars(chars) => {
                text.trim_matches(|c: char| chars.contains(&c)).to_string()
            }
            TextFix::DigitsOnly => text.chars().filter(|c| c.is_ascii_digit()).collect(),
            TextFix::StripStutter(letter) => {
                let pair: String = [*letter, *letter].iter().collect();
                let text = text.strip_prefix(pair.as_str()).unwrap_or(text);
                match text.strip_suffix(pair.as_str()) {
                    Some(head) => format!("{}{}", head, letter),
                    None => text.to_string(),
                }
            }
        }
    }
}

/// Drop columns that carry no information downstream; absent ones are ignored
pub fn drop_obsolete_columns(mut batch: RecordBatch, columns: &[&str]) -> RecordBatch {
    for column in columns {
        if batch.drop_column(column) {
            debug!(column, "Dropped obsolete column");
        }
    }
    batch
}

/// Replace an exact marker string with missing, in one column or in all of them.
/// Returns the number of cells replaced.
pub fn normalize_null_markers(
    batch: &mut RecordBatch,
    marker: &str,
    column: Option<&str>,
) -> usize {
    let columns: Vec<String> = match column {
        Some(c) => vec![c.to_string()],
        None => batch.columns().to_vec(),
    };

    let mut replaced = 0usize;
    for record in batch.records_mut() {
        for column in &columns {
            if record.value(column).as_text() == Some(marker) {
                record.set(column.clone(), Value::Missing);
                replaced += 1;
            }
        }
    }

    if replaced > 0 {
        debug!(marker, replaced, "Null markers replaced");
    }
    replaced
}

/// Remove every row holding a missing value in any column
pub fn drop_missing_rows(batch: RecordBatch, report: &mut DiagnosticReport) -> RecordBatch {
    let (columns, records) = batch.into_parts();

    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        match columns.iter().find(|c| record.value(c).is_missing()) {
            Some(column) => {
                warn!(
                    dataset = %report.dataset,
                    row = record.index,
                    column = %column,
                    "Removing row with missing value"
                );
                report.record_rejection(
                    record.index,
                    Some(column.as_str()),
                    None,
                    RejectionReason::MissingValue,
                );
            }
            None => kept.push(record),
        }
    }

    let batch = RecordBatch::with_records(columns, kept);
    info!(dataset = %report.dataset, rows = batch.len(), "Missing-value pass complete");
    batch
}

/// Apply a text fix to every text cell of a column
pub fn apply_text_fix(
    batch: &mut RecordBatch,
    dataset: &str,
    column: &str,
    fix: TextFix,
) -> Result<()> {
    batch.require_column(dataset, column)?;

    for record in batch.records_mut() {
        if let Value::Text(text) = record.value(column) {
            let fixed = fix.apply(text);
            record.set(column, Value::Text(fixed));
        }
    }
    Ok(())
}

/// Remove exact duplicate rows, keeping the first occurrence
pub fn drop_duplicates(batch: RecordBatch, report: &mut DiagnosticReport) -> RecordBatch {
    let (columns, records) = batch.into_parts();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();

    let mut kept: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        let key: Vec<Option<String>> = columns.iter().map(|c| row_key(record.value(c))).collect();
        if seen.insert(key) {
            kept.push(record);
        } else {
            warn!(dataset = %report.dataset, row = record.index, "Removing duplicate row");
            report.record_rejection(record.index, None, None, RejectionReason::Duplicate);
        }
    }

    RecordBatch::with_records(columns, kept)
}

/// Distinguishes text from same-looking typed values when comparing rows
fn row_key(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(format!("t:{}", s)),
        Value::Date(d) => Some(format!("d:{}", d)),
        Value::Float(f) => Some(format!("f:{}", f)),
        Value::Missing => None,
    }
}
