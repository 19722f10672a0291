// Shared profile and orchestration for dataset-specific cleaners
pub mod registry;

// Individual dataset variants
pub mod card;
pub mod events;
pub mod orders;
pub mod product;
pub mod store;
pub mod user;

pub use card::CardCleaner;
pub use events::EventsCleaner;
pub use orders::OrdersCleaner;
pub use product::ProductCleaner;
pub use registry::CleanerRegistry;
pub use store::StoreCleaner;
pub use user::UserCleaner;

use tracing::info;

use crate::config::Config;
use crate::constants::{Vocabulary, NULL_MARKER};
use crate::domain::RecordBatch;
use crate::error::Result;
use crate::pipeline::processing::dates::DateTextNormalizer;
use crate::pipeline::processing::passes::{self, TextFix};
use crate::pipeline::processing::report::DiagnosticReport;
use crate::pipeline::processing::validate::{PatternValidator, Predicate};
use crate::pipeline::processing::weight::WeightUnitConverter;

/// Vocabulary check on one categorical column
#[derive(Debug, Clone, Copy)]
pub struct CategoricalRule {
    pub column: &'static str,
    pub vocabulary: Vocabulary,
    /// Rewrite applied to the raw value before the membership check
    pub prepare: Option<TextFix>,
}

/// Dataset-specific step run after validation
#[derive(Debug, Clone, Copy)]
pub enum Fixup {
    Text { column: &'static str, fix: TextFix },
    ConvertWeight { column: &'static str },
    DropDuplicates,
}

/// Fixed configuration of one dataset variant
#[derive(Debug, Clone, Copy)]
pub struct DatasetProfile {
    pub name: &'static str,
    /// Columns whose absence aborts the run
    pub required_columns: &'static [&'static str],
    /// Columns dropped when present
    pub obsolete_columns: &'static [&'static str],
    /// Whether the literal `"NULL"` becomes missing in every column
    pub normalize_null_markers: bool,
    /// Additional `(column, marker)` pairs treated as missing
    pub extra_null_markers: &'static [(&'static str, &'static str)],
    pub date_columns: &'static [&'static str],
    pub categorical: &'static [CategoricalRule],
    pub fixups: &'static [Fixup],
}

/// Cleaned rows plus the audit trail of what was removed or coerced
#[derive(Debug, Clone)]
pub struct CleanedBatch {
    pub batch: RecordBatch,
    pub report: DiagnosticReport,
}

/// Base trait for dataset-specific cleaners
pub trait DatasetCleaner: Send + Sync {
    fn profile(&self) -> &DatasetProfile;

    /// Name of the dataset this cleaner handles
    fn dataset(&self) -> &str {
        self.profile().name
    }

    fn clean(&self, batch: RecordBatch, config: &Config) -> Result<CleanedBatch> {
        run_profile(self.profile(), batch, config)
    }
}

/// Run the fixed stage order for a profile:
/// obsolete columns, null markers, missing rows, dates, categoricals, fixups.
pub fn run_profile(
    profile: &DatasetProfile,
    batch: RecordBatch,
    config: &Config,
) -> Result<CleanedBatch> {
    let span = tracing::info_span!("clean", dataset = profile.name);
    let _enter = span.enter();

    let dataset = profile.name;
    let mut report = DiagnosticReport::new(dataset, batch.len());
    info!(rows = batch.len(), columns = batch.columns().len(), "Cleaning started");

    for column in profile.required_columns {
        batch.require_column(dataset, column)?;
    }

    let mut batch = passes::drop_obsolete_columns(batch, profile.obsolete_columns);

    if profile.normalize_null_markers {
        passes::normalize_null_markers(&mut batch, NULL_MARKER, None);
    }
    for &(column, marker) in profile.extra_null_markers {
        passes::normalize_null_markers(&mut batch, marker, Some(column));
    }
    let mut batch = passes::drop_missing_rows(batch, &mut report);

    for column in profile.date_columns {
        batch = DateTextNormalizer::normalize_column(batch, dataset, column, &mut report)?;
    }

    let validator = PatternValidator::new(dataset);
    for rule in profile.categorical {
        if let Some(fix) = rule.prepare {
            passes::apply_text_fix(&mut batch, dataset, rule.column, fix)?;
        }
        batch = validator.filter_into_report(
            batch,
            rule.column,
            &Predicate::Membership(&rule.vocabulary),
            &mut report,
        )?;
    }

    for fixup in profile.fixups {
        batch = match fixup {
            Fixup::Text { column, fix } => {
                passes::apply_text_fix(&mut batch, dataset, column, *fix)?;
                batch
            }
            Fixup::ConvertWeight { column } => {
                let converter = WeightUnitConverter::from_config(&config.weight);
                converter.convert_column(batch, dataset, column, &config.weight, &mut report)?
            }
            Fixup::DropDuplicates => passes::drop_duplicates(batch, &mut report),
        };
    }

    report.finish(batch.len());
    info!(
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        rejected = report.rejected_count(),
        unparseable = report.unparseable_count(),
        "Cleaning finished"
    );

    Ok(CleanedBatch { batch, report })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{RecordBatch, Value};

    /// Build a text-only batch from string literals; `None` becomes missing
    pub fn text_batch(columns: &[&str], rows: &[&[Option<&str>]]) -> RecordBatch {
        RecordBatch::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| match cell {
                            Some(s) => Value::text(*s),
                            None => Value::Missing,
                        })
                        .collect()
                })
                .collect(),
        )
        .unwrap()
    }
}
