use std::collections::HashMap;

use super::{
    CardCleaner, CleanedBatch, DatasetCleaner, EventsCleaner, OrdersCleaner, ProductCleaner,
    StoreCleaner, UserCleaner,
};
use crate::config::Config;
use crate::domain::RecordBatch;
use crate::error::{CleanerError, Result};

/// Registry of dataset cleaners keyed by dataset name
pub struct CleanerRegistry {
    cleaners: HashMap<String, Box<dyn DatasetCleaner>>,
}

impl CleanerRegistry {
    /// Create a registry with every built-in dataset cleaner
    pub fn new() -> Self {
        let mut registry = Self {
            cleaners: HashMap::new(),
        };

        registry.register(Box::new(UserCleaner::new()));
        registry.register(Box::new(CardCleaner::new()));
        registry.register(Box::new(StoreCleaner::new()));
        registry.register(Box::new(ProductCleaner::new()));
        registry.register(Box::new(OrdersCleaner::new()));
        registry.register(Box::new(EventsCleaner::new()));

        registry
    }

    /// Register (or replace) the cleaner for its dataset
    pub fn register(&mut self, cleaner: Box<dyn DatasetCleaner>) {
        self.cleaners.insert(cleaner.dataset().to_string(), cleaner);
    }

    pub fn get_cleaner(&self, dataset: &str) -> Option<&dyn DatasetCleaner> {
        self.cleaners.get(dataset).map(|c| c.as_ref())
    }

    /// Clean a batch with the cleaner registered for `dataset`
    pub fn clean(
        &self,
        dataset: &str,
        batch: RecordBatch,
        config: &Config,
    ) -> Result<CleanedBatch> {
        match self.get_cleaner(dataset) {
            Some(cleaner) => cleaner.clean(batch, config),
            None => Err(CleanerError::UnknownDataset(dataset.to_string())),
        }
    }

    /// Registered dataset names, sorted
    pub fn list_datasets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cleaners.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
