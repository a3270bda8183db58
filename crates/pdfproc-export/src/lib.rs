//! PDF Processor Export Library
//!
//! Turns extraction results into a display table and writes that table to an
//! xlsx workbook with the same rows and columns.

pub mod error;
pub mod table;
pub mod xlsx;

pub use error::{ExportError, ExportResult};
pub use table::{Cell, Table};
pub use xlsx::{write_xlsx, MAX_CELL_CHARS, MAX_COLUMNS, MAX_DATA_ROWS};
