//! xlsx workbook writer
//!
//! One worksheet, a bold header row with the column names, then one row per
//! table row. There is no index column.

use rust_xlsxwriter::{Format, Workbook};

use crate::error::{ExportError, ExportResult};
use crate::table::{Cell, Table};

/// Worksheet column limit.
pub const MAX_COLUMNS: usize = 16_384;
/// Worksheet row limit minus the header row.
pub const MAX_DATA_ROWS: usize = 1_048_575;
/// Longest string a worksheet cell holds, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// `text` cut to the cell limit on a char boundary.
fn fit_cell_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Write `table` to an in-memory xlsx workbook.
pub fn write_xlsx(table: &Table, sheet_name: &str) -> ExportResult<Vec<u8>> {
    if table.column_count() > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(table.column_count()));
    }
    if table.row_count() > MAX_DATA_ROWS {
        return Err(ExportError::TooManyRows(table.row_count()));
    }

    let start = std::time::Instant::now();
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| ExportError::InvalidSheetName(format!("{}: {}", sheet_name, e)))?;

    // Bounds checked above, so the index casts cannot truncate.
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Cell::Text(s) => {
                    let text = fit_cell_text(s);
                    if text.len() < s.len() {
                        let column = table
                            .columns
                            .get(usize::from(col))
                            .map(String::as_str)
                            .unwrap_or_default();
                        tracing::warn!(
                            row = index,
                            column = column,
                            length = s.chars().count(),
                            limit = MAX_CELL_CHARS,
                            "Cell text truncated to worksheet limit"
                        );
                    }
                    worksheet.write_string(row_num, col, text)?;
                }
            }
        }
    }

    worksheet.autofit();

    let bytes = workbook.save_to_buffer()?;

    tracing::debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        size_bytes = bytes.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Workbook written"
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    fn sample() -> Table {
        Table {
            columns: vec!["vendor".into(), "total".into(), "paid".into()],
            rows: vec![
                vec![
                    Cell::Text("Fuji".into()),
                    Cell::Number(1200.5),
                    Cell::Bool(true),
                ],
                vec![Cell::Text("Acme".into()), Cell::Empty, Cell::Bool(false)],
            ],
        }
    }

    #[test]
    fn test_workbook_matches_table() {
        let bytes = write_xlsx(&sample(), "Sheet1").unwrap();
        let rows = read_back(bytes, "Sheet1");

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec![
                Data::String("vendor".into()),
                Data::String("total".into()),
                Data::String("paid".into())
            ]
        );
        assert_eq!(rows[1][0], Data::String("Fuji".into()));
        assert_eq!(rows[1][1], Data::Float(1200.5));
        assert_eq!(rows[1][2], Data::Bool(true));
        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[2][2], Data::Bool(false));
    }

    #[test]
    fn test_custom_sheet_name() {
        let bytes = write_xlsx(&sample(), "Extracted").unwrap();
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Extracted".to_string()]);
    }

    #[test]
    fn test_invalid_sheet_name() {
        let err = write_xlsx(&sample(), "bad/name").unwrap_err();
        assert!(matches!(err, ExportError::InvalidSheetName(_)));
    }

    #[test]
    fn test_too_many_columns() {
        let table = Table {
            columns: (0..=MAX_COLUMNS).map(|i| format!("c{}", i)).collect(),
            rows: Vec::new(),
        };
        assert!(matches!(
            write_xlsx(&table, "Sheet1"),
            Err(ExportError::TooManyColumns(_))
        ));
    }

    #[test]
    fn test_long_text_is_truncated() {
        let table = Table {
            columns: vec!["text".into(), "pages".into()],
            rows: vec![vec![Cell::Text("é".repeat(40_000)), Cell::Number(3.0)]],
        };
        let rows = read_back(write_xlsx(&table, "Sheet1").unwrap(), "Sheet1");

        match &rows[1][0] {
            Data::String(text) => {
                assert_eq!(text.chars().count(), MAX_CELL_CHARS);
                assert!(text.chars().all(|c| c == 'é'));
            }
            other => panic!("unexpected cell: {other:?}"),
        }
        assert_eq!(rows[1][1], Data::Float(3.0));
    }

    #[test]
    fn test_fit_cell_text_keeps_short_text() {
        assert_eq!(fit_cell_text("Fuji"), "Fuji");
        let exact = "a".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell_text(&exact).len(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_empty_table_is_valid_workbook() {
        let bytes = write_xlsx(&Table::default(), "Sheet1").unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert!(range.is_empty());
    }
}
