use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, MalformedPolicy, WeightConfig};
use crate::domain::{Record, RecordBatch, Value};
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::report::{DiagnosticReport, FieldKind, RejectionReason};

/// Grams per ounce expressed as ounces per kilogram
pub const OUNCES_PER_KG: f64 = 35.274;

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("integer pattern is valid"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("number pattern is valid"));

/// Why a weight string could not be converted
#[derive(Debug, Clone, PartialEq)]
pub enum WeightError {
    /// Multipack form without exactly two integers
    MultipackArity { found: usize },
    /// Unit recognized but no number to go with it
    NoNumber,
    /// Parsed to a negative quantity
    Negative(f64),
    /// Text left over after unit stripping is not a number
    Malformed { residue: String },
}

impl WeightError {
    /// Malformed residue is handled separately from ordinary conversion failures
    pub fn is_malformed(&self) -> bool {
        matches!(self, WeightError::Malformed { .. })
    }
}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightError::MultipackArity { found } => {
                write!(f, "multipack needs exactly two integers, found {}", found)
            }
            WeightError::NoNumber => write!(f, "no numeric quantity"),
            WeightError::Negative(v) => write!(f, "negative quantity {}", v),
            WeightError::Malformed { residue } => write!(f, "non-numeric residue '{}'", residue),
        }
    }
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts metric, imperial and multipack weight strings to kilograms.
///
/// 1 ml is treated as 1 g (water density). That is a simplification for
/// grocery catalog data, not a general unit system.
#[derive(Debug, Clone)]
pub struct WeightUnitConverter {
    correction_threshold_kg: f64,
    correction_factor: f64,
}

impl Default for WeightUnitConverter {
    fn default() -> Self {
        Self::from_config(&WeightConfig::default())
    }
}

impl WeightUnitConverter {
    pub fn new(correction_threshold_kg: f64, correction_factor: f64) -> Self {
        Self {
            correction_threshold_kg,
            correction_factor,
        }
    }

    pub fn from_config(config: &WeightConfig) -> Self {
        Self::new(config.correction_threshold_kg, config.correction_factor)
    }

    /// Per-row unit dispatch. The result has not been through the post-hoc
    /// correction yet; see [`WeightUnitConverter::correct`].
    pub fn to_kilograms(&self, raw: &str) -> std::result::Result<f64, WeightError> {
        let trimmed = raw.trim();
        let text = trimmed.strip_suffix('.').unwrap_or(trimmed).trim();

        let kilograms = if text.contains("kg") {
            let residue = text.replace("kg", "");
            parse_plain(residue.trim())?
        } else if text.contains('x') {
            let numbers: Vec<f64> = INTEGER
                .find_iter(text)
                .filter_map(|m| m.as_str().parse::<f64>().ok())
                .collect();
            match numbers.as_slice() {
                [count, unit] => round2(count * unit / 1000.0),
                other => return Err(WeightError::MultipackArity { found: other.len() }),
            }
        } else if text.contains("oz") {
            let ounces = first_match(&INTEGER, text).ok_or(WeightError::NoNumber)?;
            round2(ounces / OUNCES_PER_KG)
        } else if text.contains('g') || text.contains("ml") {
            let grams = first_match(&NUMBER, text).ok_or(WeightError::NoNumber)?;
            grams / 1000.0
        } else {
            parse_plain(text)?
        };

        // Overflowing digit runs in multipack or gram values
        if !kilograms.is_finite() {
            return Err(WeightError::Malformed {
                residue: text.to_string(),
            });
        }
        if kilograms < 0.0 {
            return Err(WeightError::Negative(kilograms));
        }
        Ok(kilograms)
    }

    /// Values under the threshold were grams labeled as kilograms in the source data
    pub fn correct(&self, kilograms: f64) -> f64 {
        if kilograms < self.correction_threshold_kg {
            kilograms * self.correction_factor
        } else {
            kilograms
        }
    }

    /// Dispatch, correct and round a single value
    pub fn convert(&self, raw: &str) -> std::result::Result<f64, WeightError> {
        self.to_kilograms(raw).map(|kg| round2(self.correct(kg)))
    }

    /// Convert one weight column in two phases: every row is dispatched first,
    /// then the correction and rounding run over the whole column.
    pub fn convert_column(
        &self,
        batch: RecordBatch,
        dataset: &str,
        column: &str,
        config: &WeightConfig,
        report: &mut DiagnosticReport,
    ) -> Result<RecordBatch> {
        batch.require_column(dataset, column)?;
        let (columns, records) = batch.into_parts();

        // Phase 1: unit dispatch
        let mut dispatched: Vec<(Record, Option<f64>)> = Vec::with_capacity(records.len());
        let mut dropped = 0usize;
        for record in records {
            let raw = record.value(column).render().unwrap_or_default();

            match self.to_kilograms(&raw) {
                Ok(kg) => dispatched.push((record, Some(kg))),
                Err(WeightError::Malformed { residue }) => match config.on_malformed {
                    MalformedPolicy::Abort => {
                        return Err(CleanerError::MalformedWeight {
                            row: record.index,
                            value: raw,
                            residue,
                        });
                    }
                    MalformedPolicy::Null => {
                        warn!(
                            dataset,
                            column,
                            row = record.index,
                            value = %raw,
                            "Malformed weight, coercing to missing"
                        );
                        report.record_unparseable(
                            record.index,
                            column,
                            raw,
                            FieldKind::Weight,
                            Some(format!("non-numeric residue '{}'", residue)),
                        );
                        dispatched.push((record, None));
                    }
                },
                Err(e) => match config.on_failure {
                    FailurePolicy::Null => {
                        debug!(
                            dataset,
                            column,
                            row = record.index,
                            value = %raw,
                            error = %e,
                            "Weight conversion failed, coercing to missing"
                        );
                        report.record_unparseable(
                            record.index,
                            column,
                            raw,
                            FieldKind::Weight,
                            Some(e.to_string()),
                        );
                        dispatched.push((record, None));
                    }
                    FailurePolicy::Drop => {
                        warn!(
                            dataset,
                            column,
                            row = record.index,
                            value = %raw,
                            error = %e,
                            "Weight conversion failed, removing row"
                        );
                        report.record_rejection(
                            record.index,
                            Some(column),
                            Some(raw),
                            RejectionReason::WeightFailure,
                        );
                        dropped += 1;
                    }
                },
            }
        }

        // Phase 2: post-hoc correction over the converted column
        let mut corrected = 0usize;
        let records: Vec<Record> = dispatched
            .into_iter()
            .map(|(mut record, kg)| {
                let value = match kg {
                    Some(kg) => {
                        let fixed = self.correct(kg);
                        if fixed != kg {
                            corrected += 1;
                        }
                        Value::Float(round2(fixed))
                    }
                    None => Value::Missing,
                };
                record.set(column, value);
                record
            })
            .collect();

        info!(
            dataset,
            column,
            rows = records.len(),
            dropped,
            corrected,
            "Weights converted to kilograms"
        );
        Ok(RecordBatch::with_records(columns, records))
    }
}

fn parse_plain(text: &str) -> std::result::Result<f64, WeightError> {
    if text.is_empty() {
        return Err(WeightError::NoNumber);
    }
    // f64 parsing accepts "NaN" and "inf", which are not quantities
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(WeightError::Malformed {
            residue: text.to_string(),
        }),
    }
}

fn first_match(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
