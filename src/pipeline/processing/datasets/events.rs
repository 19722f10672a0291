use crate::constants::{EVENTS_DATASET, TIME_PERIOD, TIME_PERIODS};

use super::{CategoricalRule, DatasetCleaner, DatasetProfile};

pub static EVENTS_PROFILE: DatasetProfile = DatasetProfile {
    name: EVENTS_DATASET,
    required_columns: &[TIME_PERIOD],
    obsolete_columns: &[],
    // "NULL" is a real time period in this dataset
    normalize_null_markers: false,
    extra_null_markers: &[],
    date_columns: &[],
    categorical: &[CategoricalRule {
        column: TIME_PERIOD,
        vocabulary: TIME_PERIODS,
        prepare: None,
    }],
    fixups: &[],
};

/// Cleaner for sale event timestamps
pub struct EventsCleaner;

impl EventsCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EventsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for EventsCleaner {
    fn profile(&self) -> &DatasetProfile {
        &EVENTS_PROFILE
    }
}
