use crate::constants::{DATE_ADDED, PRODUCT_DATASET, REMOVED, WEIGHT};
use crate::pipeline::processing::passes::TextFix;

use super::{DatasetCleaner, DatasetProfile, Fixup};

pub static PRODUCT_PROFILE: DatasetProfile = DatasetProfile {
    name: PRODUCT_DATASET,
    required_columns: &[WEIGHT, DATE_ADDED, REMOVED],
    obsolete_columns: &["Unnamed: 0"],
    normalize_null_markers: true,
    extra_null_markers: &[],
    date_columns: &[DATE_ADDED],
    categorical: &[],
    fixups: &[
        Fixup::ConvertWeight { column: WEIGHT },
        Fixup::Text {
            column: REMOVED,
            fix: TextFix::Replace {
                from: "Still_avaliable",
                to: "Still_available",
            },
        },
    ],
};

/// Cleaner for the product catalog
pub struct ProductCleaner;

impl ProductCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for ProductCleaner {
    fn profile(&self) -> &DatasetProfile {
        &PRODUCT_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FailurePolicy};
    use crate::domain::Value;
    use crate::error::CleanerError;
    use crate::pipeline::processing::datasets::test_support::text_batch;
    use crate::pipeline::processing::report::RejectionReason;

    fn products() -> crate::domain::RecordBatch {
        text_batch(
            &["Unnamed: 0", "product_name", "weight", "date_added", "removed"],
            &[
                &[
                    Some("0"),
                    Some("Melon"),
                    Some("1.6kg"),
                    Some("2005-12-02"),
                    Some("Still_avaliable"),
                ],
                &[
                    Some("1"),
                    Some("Yogurt"),
                    Some("12 x 100g"),
                    Some("2006-01-09"),
                    Some("Still_avaliable"),
                ],
                &[Some("2"), Some("Soup"), Some("16oz"), Some("2018-12-20"), Some("Removed")],
                &[
                    Some("3"),
                    Some("Pins"),
                    Some("0.005kg"),
                    Some("2016-06-15"),
                    Some("Still_avaliable"),
                ],
                &[
                    Some("4"),
                    Some("Bundle"),
                    Some("2 x 3 x 50g"),
                    Some("2010-07-01"),
                    Some("Removed"),
                ],
            ],
        )
    }

    #[test]
    fn test_product_cleaning_converts_weights() {
        let cleaned = ProductCleaner::new().clean(products(), &Config::default()).unwrap();

        assert!(!cleaned.batch.has_column("Unnamed: 0"));
        assert_eq!(cleaned.batch.len(), 5);

        let weights: Vec<&Value> = cleaned
            .batch
            .records()
            .iter()
            .map(|r| r.value("weight"))
            .collect();
        assert_eq!(
            weights,
            vec![
                &Value::Float(1.6),
                &Value::Float(1.2),
                &Value::Float(0.45),
                &Value::Float(5.0),
                &Value::Missing,
            ]
        );
        assert_eq!(
            cleaned.batch.records()[0].value("removed"),
            &Value::text("Still_available")
        );
        assert_eq!(cleaned.report.unparseable.len(), 1);
        assert_eq!(cleaned.report.unparseable[0].row_index, 4);
    }

    #[test]
    fn test_product_cleaning_drop_policy() {
        let mut config = Config::default();
        config.weight.on_failure = FailurePolicy::Drop;

        let cleaned = ProductCleaner::new().clean(products(), &config).unwrap();
        assert_eq!(cleaned.batch.len(), 4);
        assert_eq!(cleaned.report.rejections_for(RejectionReason::WeightFailure).count(), 1);
    }

    #[test]
    fn test_product_cleaning_surfaces_malformed_weight() {
        let batch = text_batch(
            &["weight", "date_added", "removed"],
            &[&[Some("heavy kg"), Some("2005-12-02"), Some("Removed")]],
        );

        let result = ProductCleaner::new().clean(batch, &Config::default());
        assert!(matches!(result, Err(CleanerError::MalformedWeight { row: 0, .. })));
    }
}
