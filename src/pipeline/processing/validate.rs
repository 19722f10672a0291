use tracing::{info, warn};

use crate::constants::Vocabulary;
use crate::domain::{Record, RecordBatch, Value};
use crate::error::Result;
use crate::pipeline::processing::dates::DateShape;
use crate::pipeline::processing::report::{DiagnosticReport, RejectionReason};

/// Row-level check applied to one column
#[derive(Debug, Clone, Copy)]
pub enum Predicate<'a> {
    /// Value must be an exact member of the vocabulary
    Membership(&'a Vocabulary),
    /// Value must have one of the accepted date digit-group shapes
    DateShape,
}

impl<'a> Predicate<'a> {
    /// Total over every value: missing cells simply fail.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Membership(vocabulary) => match value {
                Value::Text(s) => vocabulary.contains(s),
                Value::Missing => false,
                other => other
                    .render()
                    .map(|s| vocabulary.contains(&s))
                    .unwrap_or(false),
            },
            Predicate::DateShape => match value {
                Value::Text(s) => DateShape::classify(s).is_some(),
                // Already canonical
                Value::Date(_) => true,
                _ => false,
            },
        }
    }

    pub fn reason(&self) -> RejectionReason {
        match self {
            Predicate::Membership(_) => RejectionReason::Vocabulary,
            Predicate::DateShape => RejectionReason::DateShape,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Predicate::Membership(vocabulary) => format!("member of {}", vocabulary.name),
            Predicate::DateShape => "DD-MM-YYYY | MM-YYYY-DD | YYYY-MM-DD".to_string(),
        }
    }
}

/// Result of a filter pass; `removed` keeps the input order
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub kept: RecordBatch,
    pub removed: Vec<Record>,
}

/// Splits a batch into rows that satisfy a column predicate and rows that don't
pub struct PatternValidator<'d> {
    dataset: &'d str,
}

impl<'d> PatternValidator<'d> {
    pub fn new(dataset: &'d str) -> Self {
        Self { dataset }
    }

    /// Partition `batch` on `predicate` over `column`.
    ///
    /// Failing rows are data, not errors: the only error is a schema
    /// violation when `column` is not part of the batch. Every removed row
    /// is logged before it is handed back.
    pub fn filter(
        &self,
        batch: RecordBatch,
        column: &str,
        predicate: &Predicate,
    ) -> Result<FilterOutcome> {
        batch.require_column(self.dataset, column)?;

        let (columns, records) = batch.into_parts();
        let (kept, removed): (Vec<Record>, Vec<Record>) = records
            .into_iter()
            .partition(|record| predicate.test(record.value(column)));

        if !removed.is_empty() {
            warn!(
                dataset = self.dataset,
                column,
                count = removed.len(),
                "Invalid values detected ({}), rows will be removed",
                predicate.describe()
            );
            for record in &removed {
                warn!(
                    dataset = self.dataset,
                    column,
                    row = record.index,
                    value = %record.value(column),
                    "Removing row"
                );
            }
        }

        Ok(FilterOutcome {
            kept: RecordBatch::with_records(columns, kept),
            removed,
        })
    }

    /// Filter and record every removed row in the diagnostic report
    pub fn filter_into_report(
        &self,
        batch: RecordBatch,
        column: &str,
        predicate: &Predicate,
        report: &mut DiagnosticReport,
    ) -> Result<RecordBatch> {
        let outcome = self.filter(batch, column, predicate)?;

        for record in &outcome.removed {
            report.record_rejection(
                record.index,
                Some(column),
                record.value(column).render(),
                predicate.reason(),
            );
        }

        info!(
            dataset = self.dataset,
            column,
            kept = outcome.kept.len(),
            removed = outcome.removed.len(),
            "Validation pass complete"
        );

        Ok(outcome.kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CARD_PROVIDERS, TIME_PERIODS};
    use crate::error::CleanerError;

    fn provider_batch(values: &[&str]) -> RecordBatch {
        RecordBatch::from_rows(
            vec!["card_provider".to_string()],
            values.iter().map(|v| vec![Value::text(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_membership_filter_keeps_vocabulary_values() {
        let batch = provider_batch(&["Mastercard", "Bogus Card", "Maestro"]);
        let validator = PatternValidator::new("card");

        let outcome = validator
            .filter(batch, "card_provider", &Predicate::Membership(&CARD_PROVIDERS))
            .unwrap();

        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].index, 1);
        assert_eq!(outcome.removed[0].value("card_provider"), &Value::text("Bogus Card"));
    }

    #[test]
    fn test_missing_column_is_schema_violation() {
        let batch = provider_batch(&["Mastercard"]);
        let validator = PatternValidator::new("events");

        let result = validator.filter(batch, "time_period", &Predicate::Membership(&TIME_PERIODS));
        assert!(matches!(result, Err(CleanerError::SchemaViolation { .. })));
    }

    #[test]
    fn test_predicates_are_total() {
        let membership = Predicate::Membership(&CARD_PROVIDERS);
        let shape = Predicate::DateShape;
        let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        for value in [
            Value::Missing,
            Value::Float(3.0),
            Value::text(""),
            Value::text("\u{0}weird"),
            Value::Date(date),
        ] {
            let _ = membership.test(&value);
            let _ = shape.test(&value);
        }

        assert!(shape.test(&Value::Date(date)));
        assert!(!membership.test(&Value::Missing));
        assert!(!shape.test(&Value::Missing));
    }

    #[test]
    fn test_date_shape_predicate() {
        let shape = Predicate::DateShape;
        assert!(shape.test(&Value::text("02-03-2015")));
        assert!(shape.test(&Value::text("03-2015-02")));
        assert!(shape.test(&Value::text("2015-03-02")));
        assert!(!shape.test(&Value::text("not-a-date")));
        assert!(!shape.test(&Value::text("2015-3-2")));
    }

    #[test]
    fn test_filter_into_report_records_each_removed_row_once() {
        let batch = provider_batch(&["Mastercard", "Bogus Card", "Discover", "???"]);
        let mut report = DiagnosticReport::new("card", batch.len());
        let validator = PatternValidator::new("card");

        let kept = validator
            .filter_into_report(
                batch,
                "card_provider",
                &Predicate::Membership(&CARD_PROVIDERS),
                &mut report,
            )
            .unwrap();

        assert_eq!(kept.len(), 2);
        let indices: Vec<usize> = report.rejections.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert!(report
            .rejections
            .iter()
            .all(|r| r.reason == RejectionReason::Vocabulary));
    }
}
