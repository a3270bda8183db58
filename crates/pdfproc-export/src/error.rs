use pdfproc_core::AppError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),

    #[error("Table has {0} rows, more than a worksheet can hold")]
    TooManyRows(usize),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err.to_string())
    }
}
