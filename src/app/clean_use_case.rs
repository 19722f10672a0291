use anyhow::{Context, Result};
use tracing::{error, info};

use crate::app::ports::{RecordSinkPort, RecordSourcePort};
use crate::config::Config;
use crate::observability::metrics;
use crate::pipeline::processing::datasets::{CleanedBatch, CleanerRegistry};
use crate::pipeline::processing::report::DiagnosticReport;

/// Use case for cleaning one dataset: load, clean, store
pub struct CleanDatasetUseCase {
    source: Box<dyn RecordSourcePort>,
    sink: Box<dyn RecordSinkPort>,
    registry: CleanerRegistry,
    config: Config,
}

impl CleanDatasetUseCase {
    pub fn new(
        source: Box<dyn RecordSourcePort>,
        sink: Box<dyn RecordSinkPort>,
        registry: CleanerRegistry,
        config: Config,
    ) -> Self {
        Self {
            source,
            sink,
            registry,
            config,
        }
    }

    /// Create a use case with every built-in dataset registered
    pub fn with_default_registry(
        source: Box<dyn RecordSourcePort>,
        sink: Box<dyn RecordSinkPort>,
        config: Config,
    ) -> Self {
        Self::new(source, sink, CleanerRegistry::new(), config)
    }

    /// Clean without storing; the caller gets the cleaned batch back
    pub async fn clean(&self, dataset: &str) -> Result<CleanedBatch> {
        let batch = self
            .source
            .load()
            .await
            .with_context(|| format!("Failed to load input from {}", self.source.describe()))?;
        info!(dataset, source = %self.source.describe(), rows = batch.len(), "Loaded input batch");

        let cleaned = match self.registry.clean(dataset, batch, &self.config) {
            Ok(cleaned) => cleaned,
            Err(e) => {
                error!(dataset, "Cleaning failed: {}", e);
                metrics::cleaning::run_failed(dataset);
                return Err(e).with_context(|| format!("Failed to clean dataset '{}'", dataset));
            }
        };

        metrics::cleaning::batch_processed(
            dataset,
            cleaned.report.input_rows,
            cleaned.report.output_rows,
        );
        Ok(cleaned)
    }

    /// Clean the dataset and hand the result to the sink, returning the report
    pub async fn run(&self, dataset: &str) -> Result<DiagnosticReport> {
        let cleaned = self.clean(dataset).await?;

        self.sink
            .store(&cleaned.batch)
            .await
            .with_context(|| format!("Failed to store output to {}", self.sink.describe()))?;
        info!(
            dataset,
            sink = %self.sink.describe(),
            rows = cleaned.batch.len(),
            "Stored cleaned batch"
        );

        Ok(cleaned.report)
    }
}
