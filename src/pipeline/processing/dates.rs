use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::domain::{RecordBatch, Value};
use crate::error::Result;
use crate::pipeline::processing::report::{DiagnosticReport, FieldKind};
use crate::pipeline::processing::validate::{PatternValidator, Predicate};

/// English month names and the numerals they are replaced with.
/// Matching is case-sensitive and substring based.
pub const MONTH_NUMERALS: [(&str, &str); 12] = [
    ("January", "01"),
    ("February", "02"),
    ("March", "03"),
    ("April", "04"),
    ("May", "05"),
    ("June", "06"),
    ("July", "07"),
    ("August", "08"),
    ("September", "09"),
    ("October", "10"),
    ("November", "11"),
    ("December", "12"),
];

/// Accepted digit-group shapes of a separator-normalized date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// `DD-MM-YYYY`
    DayMonthYear,
    /// `MM-YYYY-DD`
    MonthYearDay,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

static SHAPES: Lazy<Vec<(DateShape, Regex)>> = Lazy::new(|| {
    [
        DateShape::DayMonthYear,
        DateShape::MonthYearDay,
        DateShape::YearMonthDay,
    ]
    .into_iter()
    .map(|shape| {
        let regex = Regex::new(shape.pattern()).expect("date shape pattern is valid");
        (shape, regex)
    })
    .collect()
});

impl DateShape {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateShape::DayMonthYear => r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$",
            DateShape::MonthYearDay => r"^[0-9]{2}-[0-9]{4}-[0-9]{2}$",
            DateShape::YearMonthDay => r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$",
        }
    }

    /// chrono format with the field order the shape implies
    fn format(&self) -> &'static str {
        match self {
            DateShape::DayMonthYear => "%d-%m-%Y",
            DateShape::MonthYearDay => "%m-%Y-%d",
            DateShape::YearMonthDay => "%Y-%m-%d",
        }
    }

    /// The shapes are mutually exclusive, so at most one matches.
    pub fn classify(normalized: &str) -> Option<DateShape> {
        SHAPES
            .iter()
            .find(|(_, regex)| regex.is_match(normalized))
            .map(|(shape, _)| *shape)
    }
}

/// Outcome of normalizing one date string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    Canonical(NaiveDate),
    /// Structural mismatch; the caller removes the row
    Rejected { normalized: String },
    /// Right shape but not a calendar date; the caller nulls the field
    Unparseable { normalized: String },
}

/// Turns free-form date text into canonical calendar dates
pub struct DateTextNormalizer;

impl DateTextNormalizer {
    /// Replace every full month name with its two-digit numeral
    pub fn replace_month_names(raw: &str) -> String {
        MONTH_NUMERALS
            .iter()
            .fold(raw.to_string(), |acc, (name, number)| acc.replace(name, number))
    }

    /// Month names to numerals, `/` to `-`, then every whitespace char to `-`
    pub fn normalize_separators(raw: &str) -> String {
        Self::replace_month_names(raw)
            .replace('/', "-")
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect()
    }

    /// Parse a string that already passed structural validation
    pub fn parse_shaped(normalized: &str, shape: DateShape) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(normalized, shape.format()).ok()
    }

    pub fn normalize(raw: &str) -> DateOutcome {
        let normalized = Self::normalize_separators(raw);

        let shape = match DateShape::classify(&normalized) {
            Some(shape) => shape,
            None => return DateOutcome::Rejected { normalized },
        };

        // Each shape parses with its own field order; MM-YYYY-DD never reaches a day-first guess
        match Self::parse_shaped(&normalized, shape) {
            Some(date) => DateOutcome::Canonical(date),
            None => DateOutcome::Unparseable { normalized },
        }
    }

    /// Normalize one date column of a batch.
    ///
    /// Rows whose value does not reach one of the accepted shapes are removed
    /// and reported; rows with the right shape but an impossible calendar date
    /// stay in the batch with the field set to missing.
    pub fn normalize_column(
        batch: RecordBatch,
        dataset: &str,
        column: &str,
        report: &mut DiagnosticReport,
    ) -> Result<RecordBatch> {
        batch.require_column(dataset, column)?;

        let mut batch = batch;
        for record in batch.records_mut() {
            if let Value::Text(raw) = record.value(column) {
                let normalized = Self::normalize_separators(raw);
                record.set(column, Value::Text(normalized));
            }
        }

        let validator = PatternValidator::new(dataset);
        let mut batch = validator.filter_into_report(batch, column, &Predicate::DateShape, report)?;

        let mut unparseable = 0usize;
        for record in batch.records_mut() {
            let text = match record.value(column) {
                Value::Text(s) => s.clone(),
                _ => continue,
            };

            let parsed =
                DateShape::classify(&text).and_then(|shape| Self::parse_shaped(&text, shape));
            match parsed {
                Some(date) => record.set(column, Value::Date(date)),
                None => {
                    debug!(
                        dataset,
                        column,
                        row = record.index,
                        value = %text,
                        "Date is not a calendar date, coercing to missing"
                    );
                    report.record_unparseable(record.index, column, text, FieldKind::Date, None);
                    record.set(column, Value::Missing);
                    unparseable += 1;
                }
            }
        }

        info!(dataset, column, rows = batch.len(), unparseable, "Date column normalized");
        Ok(batch)
    }
}
