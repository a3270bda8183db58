//! Server-rendered HTML page

use pdfproc_core::{AppError, ErrorMetadata};
use pdfproc_export::{Cell, Table};
use uuid::Uuid;

use crate::constants::PAGE_TITLE;

/// What the page shows below the form.
pub enum Outcome<'a> {
    Success { result_id: Uuid, table: &'a Table },
    Failure { error: &'a AppError },
}

pub struct PageView<'a> {
    /// Value pre-filled in the reference field.
    pub file_name: &'a str,
    pub outcome: Option<Outcome<'a>>,
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// User-facing lines for a failed run.
pub fn failure_lines(error: &AppError) -> Vec<String> {
    match error {
        AppError::RemoteFunction {
            status_code,
            message,
        } => vec![
            format!(
                "Lambda function execution failed with status code: {}",
                status_code
            ),
            format!("Error message: {}", message),
        ],
        AppError::Invocation(_) | AppError::MalformedResponse(_) => vec![
            format!("Error executing Lambda function: {}", error.client_message()),
            format!("Error details: {}", error.error_type()),
        ],
        other => vec![other.client_message()],
    }
}

fn render_table(table: &Table) -> String {
    if table.column_count() == 0 {
        return r#"<p class="empty">No fields were extracted.</p>"#.to_string();
    }

    let header = table
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(c)))
        .collect::<String>();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| match cell {
                    Cell::Number(_) => format!(r#"<td class="num">{}</td>"#, cell),
                    other => format!("<td>{}</td>", html_escape(&other.to_string())),
                })
                .collect::<String>();
            format!("<tr>{}</tr>", cells)
        })
        .collect::<String>();

    format!(
        r#"<table><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table>"#,
        header = header,
        rows = rows,
    )
}

fn render_outcome(outcome: &Outcome<'_>) -> String {
    match outcome {
        Outcome::Success { result_id, table } => format!(
            r#"<div class="success">Lambda function executed successfully</div>
<h2>Extracted Information:</h2>
{table}
<p><a class="download" href="/results/{id}/export">📥 Download Excel file</a></p>"#,
            table = render_table(table),
            id = result_id,
        ),
        Outcome::Failure { error } => {
            let lines = failure_lines(error)
                .iter()
                .map(|line| format!("<div class=\"error\">{}</div>", html_escape(line)))
                .collect::<String>();
            let action = error
                .suggested_action()
                .map(|a| format!("<p class=\"hint\">{}</p>", html_escape(a)))
                .unwrap_or_default();
            format!("{}{}", lines, action)
        }
    }
}

pub fn render_page(view: &PageView<'_>) -> String {
    let outcome = view.outcome.as_ref().map(render_outcome).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }}
form {{ display: flex; gap: 0.5rem; margin-bottom: 1rem; }}
input[type=text] {{ flex: 1; padding: 0.5rem; }}
button {{ padding: 0.5rem 1rem; background: #ff4b4b; color: #fff; border: 0; border-radius: 4px; cursor: pointer; }}
table {{ border-collapse: collapse; width: 100%; overflow-x: auto; display: block; }}
th, td {{ border: 1px solid #e5e7eb; padding: 0.35rem 0.6rem; text-align: left; white-space: nowrap; }}
td.num {{ text-align: right; }}
.success {{ background: #dcfce7; padding: 0.75rem; border-radius: 4px; }}
.error {{ background: #fee2e2; padding: 0.75rem; border-radius: 4px; margin-bottom: 0.5rem; }}
.hint {{ color: #6b7280; }}
</style>
</head>
<body>
<h1>{title}</h1>
<form method="post" action="/process">
<input type="text" name="file_name" value="{file_name}" aria-label="PDF object">
<button type="submit">Process PDF</button>
</form>
{outcome}
<p class="hint">Click 'Process PDF' to start processing {file_name}</p>
</body>
</html>"#,
        title = PAGE_TITLE,
        file_name = html_escape(view.file_name),
        outcome = outcome,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_initial_page_has_form_and_hint() {
        let html = render_page(&PageView {
            file_name: "Fuji_pdfFile.pdf",
            outcome: None,
        });
        assert!(html.contains("<title>PDF Processor</title>"));
        assert!(html.contains("Process PDF"));
        assert!(html.contains("Click 'Process PDF' to start processing Fuji_pdfFile.pdf"));
        assert!(!html.contains("Extracted Information:"));
    }

    #[test]
    fn test_success_renders_table_and_download_link() {
        let table = Table {
            columns: vec!["vendor".into(), "total".into()],
            rows: vec![vec![Cell::Text("<Fuji>".into()), Cell::Number(12.0)]],
        };
        let id = Uuid::new_v4();
        let html = render_page(&PageView {
            file_name: "Fuji_pdfFile.pdf",
            outcome: Some(Outcome::Success {
                result_id: id,
                table: &table,
            }),
        });
        assert!(html.contains("Lambda function executed successfully"));
        assert!(html.contains("<th>vendor</th>"));
        assert!(html.contains("<td>&lt;Fuji&gt;</td>"));
        assert!(html.contains(r#"<td class="num">12</td>"#));
        assert!(html.contains(&format!("/results/{}/export", id)));
    }

    #[test]
    fn test_remote_failure_lines() {
        let err = AppError::RemoteFunction {
            status_code: 500,
            message: "boom".into(),
        };
        assert_eq!(
            failure_lines(&err),
            vec![
                "Lambda function execution failed with status code: 500".to_string(),
                "Error message: boom".to_string()
            ]
        );

        let err = AppError::Invocation("connection refused".into());
        let lines = failure_lines(&err);
        assert!(lines[0].starts_with("Error executing Lambda function:"));
        assert_eq!(lines[1], "Error details: Invocation");

        let err = AppError::MalformedResponse("body is not valid JSON".into());
        assert_eq!(failure_lines(&err)[1], "Error details: MalformedResponse");
    }
}
