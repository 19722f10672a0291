use crate::constants::{
    CARD_DATASET, CARD_NUMBER, CARD_PROVIDER, CARD_PROVIDERS, DATE_PAYMENT_CONFIRMED,
};
use crate::pipeline::processing::passes::TextFix;

use super::{CategoricalRule, DatasetCleaner, DatasetProfile, Fixup};

pub static CARD_PROFILE: DatasetProfile = DatasetProfile {
    name: CARD_DATASET,
    required_columns: &[CARD_NUMBER, CARD_PROVIDER, DATE_PAYMENT_CONFIRMED],
    obsolete_columns: &[],
    normalize_null_markers: true,
    // PDF extraction repeats the header row on every page
    extra_null_markers: &[(CARD_NUMBER, CARD_NUMBER)],
    date_columns: &[DATE_PAYMENT_CONFIRMED],
    categorical: &[CategoricalRule {
        column: CARD_PROVIDER,
        vocabulary: CARD_PROVIDERS,
        prepare: None,
    }],
    fixups: &[
        Fixup::Text {
            column: CARD_NUMBER,
            fix: TextFix::TrimChars(&['?']),
        },
        Fixup::DropDuplicates,
    ],
};

/// Cleaner for payment card details
pub struct CardCleaner;

impl CardCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CardCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for CardCleaner {
    fn profile(&self) -> &DatasetProfile {
        &CARD_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::Value;
    use crate::pipeline::processing::datasets::test_support::text_batch;
    use crate::pipeline::processing::report::RejectionReason;

    #[test]
    fn test_card_cleaning() {
        let batch = text_batch(
            &["card_number", "expiry_date", "card_provider", "date_payment_confirmed"],
            &[
                &[
                    Some("??4971858637664481"),
                    Some("09/26"),
                    Some("Mastercard"),
                    Some("2015 November 25"),
                ],
                &[Some("30060773296197"), Some("09/26"), Some("Bogus Card"), Some("2001-06-18")],
                &[
                    Some("card_number"),
                    Some("expiry_date"),
                    Some("card_provider"),
                    Some("date_payment_confirmed"),
                ],
                &[Some("4971858637664481"), Some("09/26"), Some("Mastercard"), Some("25-11-2015")],
                &[Some("213142929492281"), Some("10/23"), Some("JCB 15 digit"), Some("2001/13/01")],
            ],
        );

        let cleaned = CardCleaner::new().clean(batch, &Config::default()).unwrap();
        let report = &cleaned.report;

        // Header row, vocabulary miss and the duplicate left after '?' stripping are gone
        assert_eq!(cleaned.batch.len(), 2);
        assert_eq!(report.rejections_for(RejectionReason::MissingValue).count(), 1);
        assert_eq!(report.rejections_for(RejectionReason::Vocabulary).count(), 1);
        assert_eq!(report.rejections_for(RejectionReason::Duplicate).count(), 1);

        let rows = cleaned.batch.records();
        assert_eq!(rows[0].value("card_number"), &Value::text("4971858637664481"));
        assert_eq!(rows[0].value("card_provider"), &Value::text("Mastercard"));
        // Month 13 has the right shape but is not a date
        assert!(rows[1].value("date_payment_confirmed").is_missing());
        assert_eq!(report.unparseable.len(), 1);
    }

    #[test]
    fn test_vocabulary_rejection_is_reported_with_value() {
        let batch = text_batch(
            &["card_number", "card_provider", "date_payment_confirmed"],
            &[
                &[Some("1"), Some("Bogus Card"), Some("2015-03-02")],
                &[Some("2"), Some("Mastercard"), Some("2015-03-02")],
            ],
        );

        let cleaned = CardCleaner::new().clean(batch, &Config::default()).unwrap();
        assert_eq!(cleaned.batch.len(), 1);
        let rejected: Vec<_> = cleaned.report.rejections_for(RejectionReason::Vocabulary).collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].value.as_deref(), Some("Bogus Card"));
        assert_eq!(rejected[0].column.as_deref(), Some("card_provider"));
    }
}
