use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Schema violation: dataset '{dataset}' requires column '{column}'")]
    SchemaViolation { dataset: String, column: String },

    #[error("Malformed weight at row {row}: '{value}' left non-numeric residue '{residue}'")]
    MalformedWeight {
        row: usize,
        value: String,
        residue: String,
    },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV processing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CleanerError>;
