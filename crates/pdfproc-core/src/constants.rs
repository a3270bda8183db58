//! Defaults shared across crates.

/// Remote function invoked for every processing request.
pub const DEFAULT_FUNCTION_NAME: &str = "genaipocpdf";

/// Object reference pre-filled in the UI.
pub const DEFAULT_FILE_NAME: &str = "Fuji_pdfFile.pdf";

pub const DEFAULT_EXPORT_FILE_NAME: &str = "extracted_info.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Joins nested keys when flattening a result body (`parent_child`).
pub const FLATTEN_SEPARATOR: &str = "_";

/// Column used for rows that are not JSON objects.
pub const SCALAR_COLUMN: &str = "value";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Table in the secrets file that carries the AWS credentials.
pub const SECRETS_SECTION: &str = "aws_credentials";
pub const DEFAULT_SECRETS_FILE: &str = ".streamlit/secrets.toml";

/// S3 object keys are limited to 1024 bytes.
pub const MAX_OBJECT_KEY_LEN: usize = 1024;
