//! Extraction results
//!
//! The remote function's output schema is opaque here. A result body is turned
//! into rows of flattened key/value pairs:
//!
//! - an object becomes one row, nested objects flattened to `parent_child` keys
//! - an array becomes one row per element
//! - any other non-null value becomes one row with a single `value` column
//! - `null` yields no rows
//!
//! Columns are the union of all row keys in first-seen order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{FLATTEN_SEPARATOR, SCALAR_COLUMN};
use crate::models::ObjectReference;

/// Structured output of one remote function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source: ObjectReference,
    pub columns: Vec<String>,
    /// One value per column; `Null` where a row has no such key.
    pub rows: Vec<Vec<Value>>,
    pub received_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Build a result from the decoded body returned by the remote function.
    pub fn from_body(source: ObjectReference, body: Value) -> Self {
        let records: Vec<Map<String, Value>> = match body {
            Value::Null => Vec::new(),
            Value::Array(items) => items.into_iter().map(into_record).collect(),
            other => vec![into_record(other)],
        };
        Self::from_records(source, records)
    }

    fn from_records(source: ObjectReference, records: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self {
            source,
            columns,
            rows,
            received_at: Utc::now(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Same source, columns and rows, ignoring when the result was received.
    pub fn same_content(&self, other: &Self) -> bool {
        self.source == other.source && self.columns == other.columns && self.rows == other.rows
    }
}

fn into_record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => flatten_object(map, FLATTEN_SEPARATOR),
        other => {
            let mut record = Map::new();
            record.insert(SCALAR_COLUMN.to_string(), other);
            record
        }
    }
}

/// Flatten nested objects into a single level, joining keys with `separator`.
///
/// Arrays are kept as single values. When two paths flatten to the same key the
/// first position is kept and the last value wins.
pub fn flatten_object(map: Map<String, Value>, separator: &str) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, "", map, separator);
    out
}

fn flatten_into(out: &mut Map<String, Value>, parent: &str, map: Map<String, Value>, sep: &str) {
    for (key, value) in map {
        let key = if parent.is_empty() {
            key
        } else {
            format!("{}{}{}", parent, sep, key)
        };
        match value {
            Value::Object(nested) => flatten_into(out, &key, nested, sep),
            other => {
                out.insert(key, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> ObjectReference {
        ObjectReference::parse("Fuji_pdfFile.pdf").unwrap()
    }

    #[test]
    fn test_object_body_is_one_flattened_row() {
        let body = json!({
            "invoice_number": "INV-001",
            "vendor": {"name": "Fuji", "address": {"city": "Tokyo"}},
            "total": 1200.5,
            "items": ["a", "b"]
        });
        let result = ExtractionResult::from_body(source(), body);

        assert_eq!(
            result.columns,
            vec![
                "invoice_number",
                "vendor_name",
                "vendor_address_city",
                "total",
                "items"
            ]
        );
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.cell(0, "vendor_address_city"), Some(&json!("Tokyo")));
        assert_eq!(result.cell(0, "items"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_flatten_collision_keeps_first_position_last_value() {
        let body = json!({"a_b": 1, "c": 2, "a": {"b": 3}});
        let result = ExtractionResult::from_body(source(), body);
        assert_eq!(result.columns, vec!["a_b", "c"]);
        assert_eq!(result.rows, vec![vec![json!(3), json!(2)]]);
    }

    #[test]
    fn test_array_body_unions_columns() {
        let body = json!([
            {"field": "date", "value": "2024-01-01"},
            {"field": "total", "confidence": 0.9},
            "stray"
        ]);
        let result = ExtractionResult::from_body(source(), body);

        assert_eq!(result.columns, vec!["field", "value", "confidence"]);
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.cell(1, "value"), Some(&Value::Null));
        assert_eq!(result.cell(2, "value"), Some(&json!("stray")));
        assert_eq!(result.cell(2, "field"), Some(&Value::Null));
    }

    #[test]
    fn test_scalar_and_null_bodies() {
        let scalar = ExtractionResult::from_body(source(), json!("plain text"));
        assert_eq!(scalar.columns, vec![SCALAR_COLUMN]);
        assert_eq!(scalar.row_count(), 1);

        let null = ExtractionResult::from_body(source(), Value::Null);
        assert!(null.is_empty());
        assert_eq!(null.column_count(), 0);
    }

    #[test]
    fn test_empty_object_is_one_empty_row() {
        let result = ExtractionResult::from_body(source(), json!({}));
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.column_count(), 0);
    }

    #[test]
    fn test_same_content_ignores_timestamp() {
        let body = json!({"k": "v"});
        let first = ExtractionResult::from_body(source(), body.clone());
        let mut second = ExtractionResult::from_body(source(), body);
        second.received_at = first.received_at + chrono::Duration::seconds(5);
        assert!(first.same_content(&second));
        assert_ne!(first, second);
    }
}
