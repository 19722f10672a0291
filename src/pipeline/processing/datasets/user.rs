use crate::constants::{DATE_OF_BIRTH, JOIN_DATE, USER_DATASET};

use super::{DatasetCleaner, DatasetProfile};

pub static USER_PROFILE: DatasetProfile = DatasetProfile {
    name: USER_DATASET,
    required_columns: &[JOIN_DATE, DATE_OF_BIRTH],
    obsolete_columns: &["index"],
    normalize_null_markers: true,
    extra_null_markers: &[],
    date_columns: &[JOIN_DATE, DATE_OF_BIRTH],
    categorical: &[],
    fixups: &[],
};

/// Cleaner for the legacy user table
pub struct UserCleaner;

impl UserCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UserCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCleaner for UserCleaner {
    fn profile(&self) -> &DatasetProfile {
        &USER_PROFILE
    }
}
