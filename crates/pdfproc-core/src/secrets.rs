//! AWS credential loading
//!
//! The three required secrets (access key id, secret access key, region) are
//! read from the environment and from a TOML secrets file carrying an
//! `[aws_credentials]` table:
//!
//! ```toml
//! [aws_credentials]
//! AWS_ACCESS_KEY_ID = "..."
//! AWS_SECRET_ACCESS_KEY = "..."
//! AWS_REGION = "ap-south-1"
//! ```
//!
//! Environment values win over the file. Empty values count as missing. A
//! missing file is not an error; an unreadable or malformed one is.

use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::SECRETS_SECTION;
use crate::error::AppError;

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION: &str = "AWS_REGION";

/// Secrets loading errors
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Missing required secret(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Failed to read secrets file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to read secrets from environment: {0}")]
    Env(#[from] envy::Error),
}

impl From<SecretsError> for AppError {
    fn from(err: SecretsError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Validated AWS credentials.
///
/// `Debug` never prints the secret and only the last four characters of the
/// access key id.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: String,
    region: String,
}

impl AwsCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn masked_access_key_id(&self) -> String {
        let chars: Vec<char> = self.access_key_id.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl Debug for AwsCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.masked_access_key_id())
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Outcome of loading credentials at startup.
///
/// Missing credentials do not stop the process: every request that needs the
/// remote function fails with the recorded reason instead.
#[derive(Clone, Debug)]
pub enum CredentialState {
    Loaded(AwsCredentials),
    Unavailable(String),
}

impl CredentialState {
    /// Load from the environment and the given secrets file.
    pub fn load(secrets_file: &Path) -> Self {
        match load_credentials(secrets_file) {
            Ok(credentials) => CredentialState::Loaded(credentials),
            Err(e) => CredentialState::Unavailable(e.to_string()),
        }
    }

    pub fn get(&self) -> Result<&AwsCredentials, AppError> {
        match self {
            CredentialState::Loaded(credentials) => Ok(credentials),
            CredentialState::Unavailable(reason) => Err(AppError::Configuration(reason.clone())),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CredentialState::Loaded(_))
    }
}

/// Raw, possibly partial credentials from one source.
///
/// Field names match lowercased environment variables (envy) and the aliases
/// match the upper-case keys used in the secrets file.
#[derive(Default, Deserialize)]
pub(crate) struct RawCredentials {
    #[serde(default, alias = "AWS_ACCESS_KEY_ID")]
    aws_access_key_id: Option<String>,
    #[serde(default, alias = "AWS_SECRET_ACCESS_KEY")]
    aws_secret_access_key: Option<String>,
    #[serde(default, alias = "AWS_REGION")]
    aws_region: Option<String>,
}

/// Load credentials from the environment, falling back to the secrets file.
pub fn load_credentials(secrets_file: &Path) -> Result<AwsCredentials, SecretsError> {
    let from_env: RawCredentials = envy::from_env()?;
    let from_file = read_secrets_file(secrets_file)?;
    resolve_credentials(from_env, from_file)
}

pub(crate) fn read_secrets_file(path: &Path) -> Result<Option<RawCredentials>, SecretsError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| SecretsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let table: toml::Table = toml::from_str(&content).map_err(|source| SecretsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match table.get(SECRETS_SECTION) {
        Some(section) => section
            .clone()
            .try_into::<RawCredentials>()
            .map(Some)
            .map_err(|source| SecretsError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn resolve_credentials(
    from_env: RawCredentials,
    from_file: Option<RawCredentials>,
) -> Result<AwsCredentials, SecretsError> {
    let from_file = from_file.unwrap_or_default();

    let access_key_id =
        non_empty(from_env.aws_access_key_id).or_else(|| non_empty(from_file.aws_access_key_id));
    let secret_access_key = non_empty(from_env.aws_secret_access_key)
        .or_else(|| non_empty(from_file.aws_secret_access_key));
    let region = non_empty(from_env.aws_region).or_else(|| non_empty(from_file.aws_region));

    match (access_key_id, secret_access_key, region) {
        (Some(access_key_id), Some(secret_access_key), Some(region)) => Ok(AwsCredentials {
            access_key_id,
            secret_access_key,
            region,
        }),
        (access_key_id, secret_access_key, region) => {
            let mut missing = Vec::new();
            if access_key_id.is_none() {
                missing.push(ACCESS_KEY_ID);
            }
            if secret_access_key.is_none() {
                missing.push(SECRET_ACCESS_KEY);
            }
            if region.is_none() {
                missing.push(REGION);
            }
            Err(SecretsError::Missing(missing))
        }
    }
}
