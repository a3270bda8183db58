//! Object storage references
//!
//! A reference is either a bare key (`Fuji_pdfFile.pdf`, `invoices/a.pdf`)
//! or a full `s3://bucket/key` URI.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::MAX_OBJECT_KEY_LEN;
use crate::error::AppError;

const S3_SCHEME: &str = "s3://";

/// Reference to a PDF object in cloud storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    /// Bucket named explicitly by the caller, if any.
    pub bucket: Option<String>,
    pub key: String,
}

impl ObjectReference {
    /// Parse and validate a user-supplied reference.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::InvalidInput(
                "Object reference must not be empty".to_string(),
            ));
        }

        let (bucket, key) = match input.strip_prefix(S3_SCHEME) {
            Some(stripped) => {
                let (bucket, key) = stripped.split_once('/').ok_or_else(|| {
                    AppError::InvalidInput(format!("Invalid S3 URI format: {}", input))
                })?;
                if bucket.is_empty() {
                    return Err(AppError::InvalidInput(format!(
                        "S3 URI is missing a bucket: {}",
                        input
                    )));
                }
                (Some(bucket.to_string()), key.to_string())
            }
            None => (None, input.to_string()),
        };

        validate_key(&key)?;

        Ok(Self { bucket, key })
    }

    /// File name sent to the remote function (the object key).
    pub fn file_name(&self) -> &str {
        &self.key
    }

    /// Last path segment of the key.
    pub fn base_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        return Err(AppError::InvalidInput(
            "Object key must not be empty".to_string(),
        ));
    }
    if key.len() > MAX_OBJECT_KEY_LEN {
        return Err(AppError::InvalidInput(format!(
            "Object key exceeds {} bytes",
            MAX_OBJECT_KEY_LEN
        )));
    }
    if key.starts_with('/') {
        return Err(AppError::InvalidInput(
            "Object key must not start with '/'".to_string(),
        ));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(AppError::InvalidInput(
            "Object key must not contain '..' segments".to_string(),
        ));
    }
    if !key.to_lowercase().ends_with(".pdf") {
        return Err(AppError::InvalidInput(format!(
            "Object key must reference a PDF file: {}",
            key
        )));
    }
    Ok(())
}

impl FromStr for ObjectReference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ObjectReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.bucket {
            Some(bucket) => write!(f, "{}{}/{}", S3_SCHEME, bucket, self.key),
            None => write!(f, "{}", self.key),
        }
    }
}
