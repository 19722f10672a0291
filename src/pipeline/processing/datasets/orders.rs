use crate::constants::ORDERS_DATASET;

use super::{DatasetCleaner, DatasetProfile};

pub static ORDERS_PROFILE: DatasetProfile = DatasetProfile {
    name: ORDERS_DATASET,
    required_columns: &[],
    // Leftover index columns plus personal data that must not reach analytics
    obsolete_columns: &["level_0", "index", "first_name", "last_name", "1"],
    normalize_null_markers: true,
    extra_null_markers: &[],
    date_columns: &[],
    categorical: &[],
    fixups: &[],
};

/// Cleaner for the orders table
pub struct OrdersCleaner;

impl OrdersCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrdersCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for OrdersCleaner {
    fn profile(&self) -> &DatasetProfile {
        &ORDERS_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::processing::datasets::test_support::text_batch;

    #[test]
    fn test_orders_cleaning_drops_pii_columns() {
        let batch = text_batch(
            &[
                "level_0",
                "index",
                "date_uuid",
                "first_name",
                "last_name",
                "user_uuid",
                "1",
                "product_quantity",
            ],
            &[
                &[
                    Some("0"),
                    Some("0"),
                    Some("9476f17e"),
                    Some("Ann"),
                    Some("Lee"),
                    Some("93caf182"),
                    Some("x"),
                    Some("3"),
                ],
                &[
                    Some("1"),
                    Some("1"),
                    Some("0423a395"),
                    None,
                    None,
                    Some("8fe96c3a"),
                    None,
                    Some("NULL"),
                ],
            ],
        );

        let cleaned = OrdersCleaner::new().clean(batch, &Config::default()).unwrap();

        assert_eq!(
            cleaned.batch.columns(),
            &["date_uuid".to_string(), "user_uuid".to_string(), "product_quantity".to_string()]
        );
        // Missing PII no longer matters once the column is gone; the NULL quantity does
        assert_eq!(cleaned.batch.len(), 1);
        assert_eq!(cleaned.report.rejected_count(), 1);
        assert_eq!(cleaned.report.rejections[0].row_index, 1);
    }
}
