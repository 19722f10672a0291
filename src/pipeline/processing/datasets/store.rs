use crate::constants::{ADDRESS, CONTINENT, CONTINENTS, OPENING_DATE, STAFF_NUMBERS, STORE_DATASET};
use crate::pipeline::processing::passes::TextFix;

use super::{CategoricalRule, DatasetCleaner, DatasetProfile, Fixup};

pub static STORE_PROFILE: DatasetProfile = DatasetProfile {
    name: STORE_DATASET,
    required_columns: &[OPENING_DATE, CONTINENT, ADDRESS, STAFF_NUMBERS],
    obsolete_columns: &["lat", "index"],
    normalize_null_markers: true,
    extra_null_markers: &[],
    date_columns: &[OPENING_DATE],
    categorical: &[CategoricalRule {
        column: CONTINENT,
        vocabulary: CONTINENTS,
        // Source doubles letters on some rows: "eeEurope", "Europee"
        prepare: Some(TextFix::StripStutter('e')),
    }],
    fixups: &[
        Fixup::Text {
            column: ADDRESS,
            fix: TextFix::Replace { from: "\n", to: ", " },
        },
        Fixup::Text {
            column: STAFF_NUMBERS,
            fix: TextFix::DigitsOnly,
        },
    ],
};

/// Cleaner for store details
pub struct StoreCleaner;

impl StoreCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoreCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for StoreCleaner {
    fn profile(&self) -> &DatasetProfile {
        &STORE_PROFILE
    }
}
