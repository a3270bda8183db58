//! Display table built from an extraction result

use pdfproc_core::ExtractionResult;
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Largest magnitude printed without a fractional part or exponent.
const MAX_INTEGRAL: f64 = 1e15;

/// A single typed table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    /// Strings, plus nested arrays and objects as compact JSON.
    Text(String),
}

impl Cell {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < MAX_INTEGRAL => {
                write!(f, "{}", *n as i64)
            }
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Rows and columns as shown on the page and written to the workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_result(result: &ExtractionResult) -> Self {
        Self {
            columns: result.columns.clone(),
            rows: result
                .rows
                .iter()
                .map(|row| row.iter().map(Cell::from_value).collect())
                .collect(),
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfproc_core::ObjectReference;
    use serde_json::json;

    #[test]
    fn test_cells_are_typed() {
        assert_eq!(Cell::from_value(&Value::Null), Cell::Empty);
        assert_eq!(Cell::from_value(&json!(true)), Cell::Bool(true));
        assert_eq!(Cell::from_value(&json!(12.5)), Cell::Number(12.5));
        assert_eq!(Cell::from_value(&json!("x")), Cell::Text("x".into()));
        assert_eq!(
            Cell::from_value(&json!(["a", 1])),
            Cell::Text(r#"["a",1]"#.into())
        );
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(42.0).to_string(), "42");
        assert_eq!(Cell::Number(0.25).to_string(), "0.25");
        assert_eq!(Cell::Bool(false).to_string(), "false");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_table_mirrors_result() {
        let source = ObjectReference::parse("Fuji_pdfFile.pdf").unwrap();
        let result = ExtractionResult::from_body(
            source,
            json!([{"name": "Fuji", "total": 10}, {"name": "Acme", "paid": true}]),
        );
        let table = Table::from_result(&result);

        assert_eq!(table.columns, vec!["name", "total", "paid"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[1],
            vec![Cell::Text("Acme".into()), Cell::Empty, Cell::Bool(true)]
        );
    }
}
