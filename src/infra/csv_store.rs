use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::app::ports::{RecordSinkPort, RecordSourcePort};
use crate::domain::{RecordBatch, Value};
use crate::error::Result;
use crate::infra::json_store::write_file;

/// Parse CSV bytes with a header row. Every cell is text; an empty cell is missing.
pub fn parse_csv_batch(bytes: &[u8]) -> Result<RecordBatch> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut batch = RecordBatch::new(columns);

    for result in reader.records() {
        let row = result?;
        let values = row
            .iter()
            .map(|cell| if cell.is_empty() { Value::Missing } else { Value::text(cell) })
            .collect();
        batch.push_row(values)?;
    }

    Ok(batch)
}

/// Render a batch as CSV with a header row; missing cells are written empty
pub fn render_csv_batch(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(batch.columns())?;

    for record in batch.records() {
        let row: Vec<String> = batch
            .row_values(record)
            .into_iter()
            .map(|v| v.render().unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::error::CleanerError::Io(e.into_error()))
}

/// Reads a batch from a CSV file
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSourcePort for CsvFileSource {
    async fn load(&self) -> anyhow::Result<RecordBatch> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let batch = parse_csv_batch(&bytes)?;
        debug!(
            path = %self.path.display(),
            rows = batch.len(),
            columns = batch.columns().len(),
            "Parsed CSV input"
        );
        Ok(batch)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes a batch to a CSV file
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSinkPort for CsvFileSink {
    async fn store(&self, batch: &RecordBatch) -> anyhow::Result<()> {
        let bytes = render_csv_batch(batch)?;
        write_file(&self.path, &bytes).await?;
        info!(path = %self.path.display(), rows = batch.len(), "Wrote CSV output");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
