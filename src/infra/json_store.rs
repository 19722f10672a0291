//! JSON file adapters.
//!
//! Two input layouts are understood: an array of row objects, and the
//! column-oriented `{"column": {"<row label>": value}}` object that pandas
//! writes by default. Output is always an array of row objects, with
//! columns kept in the order the source listed them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use crate::app::ports::{RecordSinkPort, RecordSourcePort};
use crate::domain::{Record, RecordBatch, Value};
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::report::DiagnosticReport;

/// Parse a JSON document in either supported layout
pub fn parse_json_batch(content: &str) -> Result<RecordBatch> {
    let document: JsonValue = serde_json::from_str(content)?;
    match document {
        JsonValue::Array(rows) => parse_row_array(rows),
        JsonValue::Object(columns) => parse_column_object(columns),
        other => Err(CleanerError::InvalidInput(format!(
            "expected an array of rows or a column object, found {}",
            json_kind(&other)
        ))),
    }
}

fn parse_row_array(rows: Vec<JsonValue>) -> Result<RecordBatch> {
    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(rows.len());

    for (position, row) in rows.into_iter().enumerate() {
        let object = match row {
            JsonValue::Object(object) => object,
            other => {
                return Err(CleanerError::InvalidInput(format!(
                    "row {} is {}, expected an object",
                    position,
                    json_kind(&other)
                )))
            }
        };
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(object);
    }

    let records = objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            let mut record = Record::new(index);
            for column in &columns {
                let value = object.get(column).cloned().map(Value::from).unwrap_or(Value::Missing);
                record.set(column.clone(), value);
            }
            record
        })
        .collect();

    Ok(RecordBatch::with_records(columns, records))
}

fn parse_column_object(columns: Map<String, JsonValue>) -> Result<RecordBatch> {
    let mut cells: Vec<(String, Map<String, JsonValue>)> = Vec::with_capacity(columns.len());
    let mut labels: Vec<String> = Vec::new();

    for (column, values) in columns {
        let values = match values {
            JsonValue::Object(values) => values,
            other => {
                return Err(CleanerError::InvalidInput(format!(
                    "column '{}' is {}, expected an object keyed by row label",
                    column,
                    json_kind(&other)
                )))
            }
        };
        for label in values.keys() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        cells.push((column, values));
    }

    // Row labels are stringified integers; keep numeric order when they are
    labels.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    });

    let column_names: Vec<String> = cells.iter().map(|(c, _)| c.clone()).collect();
    let records = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let mut record = Record::new(index);
            for (column, values) in &cells {
                let value = values.get(label).cloned().map(Value::from).unwrap_or(Value::Missing);
                record.set(column.clone(), value);
            }
            record
        })
        .collect();

    Ok(RecordBatch::with_records(column_names, records))
}

/// Serialize a batch as an array of row objects in schema order
pub fn render_json_batch(batch: &RecordBatch, pretty: bool) -> Result<String> {
    let rows: Vec<JsonValue> = batch
        .records()
        .iter()
        .map(|record| {
            let object: Map<String, JsonValue> = batch
                .columns()
                .iter()
                .map(|c| (c.clone(), JsonValue::from(record.value(c))))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    let rendered = if pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    Ok(rendered)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Reads a batch from a JSON file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSourcePort for JsonFileSource {
    async fn load(&self) -> anyhow::Result<RecordBatch> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let batch = parse_json_batch(&content)?;
        debug!(
            path = %self.path.display(),
            rows = batch.len(),
            columns = batch.columns().len(),
            "Parsed JSON input"
        );
        Ok(batch)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes a batch to a JSON file, creating parent directories
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }
}

#[async_trait]
impl RecordSinkPort for JsonFileSink {
    async fn store(&self, batch: &RecordBatch) -> anyhow::Result<()> {
        let rendered = render_json_batch(batch, self.pretty)?;
        write_file(&self.path, rendered.as_bytes()).await?;
        info!(path = %self.path.display(), rows = batch.len(), "Wrote JSON output");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Path of the diagnostic report written next to an output file
pub fn report_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".report.json");
    PathBuf::from(name)
}

/// Write a diagnostic report as JSON
pub async fn write_report(
    path: &Path,
    report: &DiagnosticReport,
    pretty: bool,
) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    write_file(path, rendered.as_bytes()).await?;
    info!(path = %path.display(), "Wrote diagnostic report");
    Ok(())
}

pub(crate) async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
