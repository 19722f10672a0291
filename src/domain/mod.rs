use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::{CleanerError, Result};

/// A single semantically typed cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    /// Canonical calendar date
    Date(NaiveDate),
    Float(f64),
    Missing,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String form used by predicates and text sinks; `None` for missing cells
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "<missing>"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Float(f),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Missing => serde_json::Value::Null,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(raw))
    }
}

/// One row of a batch.
///
/// `index` is the row's position as delivered by the source. It stays stable
/// for a single run and is only used to point at rows in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    values: HashMap<String, Value>,
}

impl Record {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            values: HashMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Cell value, treating an absent cell as missing
    pub fn value(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&Value::Missing)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }
}

/// An ordered batch of records sharing one named column schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Build a batch from positional rows; each row must match the schema width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut batch = Self::new(columns);
        for row in rows {
            batch.push_row(row)?;
        }
        Ok(batch)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CleanerError::InvalidInput(format!(
                "row {} has {} values but the schema has {} columns",
                self.records.len(),
                row.len(),
                self.columns.len()
            )));
        }

        let mut record = Record::new(self.records.len());
        for (column, value) in self.columns.iter().zip(row) {
            record.set(column.clone(), value);
        }
        self.records.push(record);
        Ok(())
    }

    /// Rebuild a batch from records that already carry their indices
    pub fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with a schema violation when `column` is absent
    pub fn require_column(&self, dataset: &str, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(CleanerError::SchemaViolation {
                dataset: dataset.to_string(),
                column: column.to_string(),
            })
        }
    }

    /// Remove a column from the schema and every record. Returns false if it was absent.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != column);
        if self.columns.len() == before {
            return false;
        }
        for record in &mut self.records {
            record.remove(column);
        }
        true
    }

    /// Cells of a record in schema order
    pub fn row_values<'a>(&'a self, record: &'a Record) -> Vec<&'a Value> {
        self.columns.iter().map(|c| record.value(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> RecordBatch {
        RecordBatch::from_rows(
            vec!["index".to_string(), "name".to_string()],
            vec![
                vec![Value::Float(0.0), Value::text("a")],
                vec![Value::Float(1.0), Value::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_assigns_positional_indices() {
        let batch = sample_batch();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records()[0].index, 0);
        assert_eq!(batch.records()[1].index, 1);
        assert_eq!(batch.records()[0].value("name"), &Value::text("a"));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = RecordBatch::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::text("only one")]],
        );
        assert!(matches!(result, Err(CleanerError::InvalidInput(_))));
    }

    #[test]
    fn test_drop_column_updates_schema_and_records() {
        let mut batch = sample_batch();
        assert!(batch.drop_column("index"));
        assert!(!batch.drop_column("index"));
        assert_eq!(batch.columns(), &["name".to_string()]);
        assert!(batch.records()[0].get("index").is_none());
    }

    #[test]
    fn test_require_column_reports_schema_violation() {
        let batch = sample_batch();
        assert!(batch.require_column("user", "name").is_ok());
        match batch.require_column("user", "join_date") {
            Err(CleanerError::SchemaViolation { dataset, column }) => {
                assert_eq!(dataset, "user");
                assert_eq!(column, "join_date");
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_value_json_conversions() {
        assert_eq!(Value::from(serde_json::json!(null)), Value::Missing);
        assert_eq!(Value::from(serde_json::json!("x")), Value::text("x"));
        assert_eq!(Value::from(serde_json::json!(2.5)), Value::Float(2.5));

        let date = NaiveDate::from_ymd_opt(2015, 3, 2).unwrap();
        assert_eq!(serde_json::to_string(&Value::Date(date)).unwrap(), "\"2015-03-02\"");
        assert_eq!(serde_json::to_string(&Value::Missing).unwrap(), "null");
    }
}
