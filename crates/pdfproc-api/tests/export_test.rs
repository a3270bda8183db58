//! Spreadsheet export integration tests.
//!
//! Run with: `cargo test -p pdfproc-api --test export_test`

mod helpers;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use helpers::{api_path, setup_test_app};
use pdfproc_invoker::MockInvoker;
use serde_json::{json, Value};
use std::io::Cursor;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn read_sheet(bytes: &[u8], sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).expect("valid xlsx");
    let range = workbook.worksheet_range(sheet).expect("sheet exists");
    range.rows().map(|row| row.to_vec()).collect()
}

fn cell_as_json(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => json!(s),
        Data::Float(f) => json!(f),
        Data::Int(i) => json!(i),
        Data::Bool(b) => json!(b),
        other => json!(other.to_string()),
    }
}

#[tokio::test]
async fn test_export_matches_displayed_table() {
    let app = setup_test_app(MockInvoker::with_body(json!([
        {"field": "invoice_number", "value": "INV-001", "verified": true},
        {"field": "total", "value": 1200.5},
        {"field": "line_items", "value": ["a", "b"]}
    ])));

    let processed: Value = app
        .client()
        .post(&api_path("/process"))
        .json(&json!({}))
        .await
        .json();
    let export_url = processed["export_url"].as_str().unwrap().to_string();

    let response = app.client().get(&export_url).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        XLSX_CONTENT_TYPE
    );
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains("extracted_info.xlsx"));

    let rows = read_sheet(response.as_bytes(), "Sheet1");

    // Header row, then exactly the displayed rows.
    let columns: Vec<Value> = processed["columns"].as_array().unwrap().clone();
    let header: Vec<Value> = rows[0].iter().map(cell_as_json).collect();
    assert_eq!(header, columns);
    assert_eq!(rows.len() - 1, processed["row_count"].as_u64().unwrap() as usize);

    let displayed = processed["rows"].as_array().unwrap();
    assert_eq!(cell_as_json(&rows[1][0]), displayed[0][0]);
    assert_eq!(cell_as_json(&rows[1][2]), json!(true));
    assert_eq!(cell_as_json(&rows[2][1]), json!(1200.5));
    assert_eq!(rows[2][2], Data::Empty);
    // Nested arrays are written as compact JSON text.
    assert_eq!(cell_as_json(&rows[3][1]), json!(r#"["a","b"]"#));

    // Export reads the stored result; the remote function ran once.
    assert_eq!(app.invoker.calls(), 1);
}

#[tokio::test]
async fn test_page_download_link_serves_same_workbook() {
    let app = setup_test_app(MockInvoker::with_body(json!({"vendor": "Fuji", "total": 10})));

    let processed: Value = app
        .client()
        .post(&api_path("/process"))
        .json(&json!({}))
        .await
        .json();
    let id = processed["result_id"].as_str().unwrap();

    let api = app
        .client()
        .get(&api_path(&format!("/results/{}/export", id)))
        .await;
    let page = app.client().get(&format!("/results/{}/export", id)).await;

    assert_eq!(page.status_code(), 200);
    assert_eq!(
        read_sheet(api.as_bytes(), "Sheet1"),
        read_sheet(page.as_bytes(), "Sheet1")
    );
}

#[tokio::test]
async fn test_export_of_unknown_result_is_not_found() {
    let app = setup_test_app(MockInvoker::with_body(json!({})));

    let response = app
        .client()
        .get(&api_path(
            "/results/5f0c8a4e-1d2b-4c3d-9e8f-0a1b2c3d4e5f/export",
        ))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.invoker.calls(), 0);
}

#[tokio::test]
async fn test_export_of_empty_result_has_no_rows() {
    let app = setup_test_app(MockInvoker::with_body(Value::Null));

    let processed: Value = app
        .client()
        .post(&api_path("/process"))
        .json(&json!({}))
        .await
        .json();
    assert_eq!(processed["row_count"], 0);

    let response = app
        .client()
        .get(processed["export_url"].as_str().unwrap())
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(read_sheet(response.as_bytes(), "Sheet1").is_empty());
}

#[tokio::test]
async fn test_export_truncates_oversized_text() {
    let page_text = "x".repeat(40_000);
    let app = setup_test_app(MockInvoker::with_body(json!({"text": page_text, "pages": 12})));

    let processed: Value = app
        .client()
        .post(&api_path("/process"))
        .json(&json!({}))
        .await
        .json();
    // The displayed table keeps the full text.
    assert_eq!(processed["rows"][0][0].as_str().unwrap().len(), 40_000);

    let response = app
        .client()
        .get(processed["export_url"].as_str().unwrap())
        .await;
    assert_eq!(response.status_code(), 200);

    let rows = read_sheet(response.as_bytes(), "Sheet1");
    match &rows[1][0] {
        Data::String(text) => assert_eq!(text.len(), pdfproc_export::MAX_CELL_CHARS),
        other => panic!("unexpected cell: {other:?}"),
    }
    assert_eq!(cell_as_json(&rows[1][1]), json!(12.0));
}
