pub mod csv_store;
pub mod json_store;
pub mod memory;

use std::path::Path;

use crate::app::ports::{RecordSinkPort, RecordSourcePort};
use crate::error::{CleanerError, Result};

pub use csv_store::{CsvFileSink, CsvFileSource};
pub use json_store::{JsonFileSink, JsonFileSource};
pub use memory::InMemoryRecordStore;

/// On-disk formats understood by the file adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Pick the format from the file extension, case-insensitively
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("csv") => Ok(FileFormat::Csv),
            _ => Err(CleanerError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn source_for_path(path: &Path) -> Result<Box<dyn RecordSourcePort>> {
    let source: Box<dyn RecordSourcePort> = match FileFormat::from_path(path)? {
        FileFormat::Json => Box::new(JsonFileSource::new(path)),
        FileFormat::Csv => Box::new(CsvFileSource::new(path)),
    };
    Ok(source)
}

pub fn sink_for_path(path: &Path, pretty_json: bool) -> Result<Box<dyn RecordSinkPort>> {
    let sink: Box<dyn RecordSinkPort> = match FileFormat::from_path(path)? {
        FileFormat::Json => Box::new(JsonFileSink::new(path, pretty_json)),
        FileFormat::Csv => Box::new(CsvFileSink::new(path)),
    };
    Ok(sink)
}
