//! Configuration module
//!
//! Server, remote function, export and logging settings read from the
//! environment (a `.env` file is honoured), plus the AWS credentials loaded
//! through [`crate::secrets`].

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_EXPORT_FILE_NAME, DEFAULT_FILE_NAME, DEFAULT_FUNCTION_NAME, DEFAULT_SECRETS_FILE,
    DEFAULT_SHEET_NAME,
};
use crate::error::AppError;
use crate::models::ObjectReference;
use crate::secrets::{AwsCredentials, CredentialState};

// Common constants
const SERVER_PORT: u16 = 8501;
const RESULT_CACHE_CAPACITY: usize = 64;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const MAX_SHEET_NAME_LEN: usize = 31;

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
    // Remote function
    pub function_name: String,
    pub default_file_name: String,
    // Optional pre-flight existence check against this bucket
    pub pdf_bucket: Option<String>,
    // Custom endpoint for AWS-compatible emulators (LocalStack etc.)
    pub aws_endpoint_url: Option<String>,
    pub secrets_file: PathBuf,
    pub credentials: CredentialState,
    // Result store and export
    pub result_cache_capacity: usize,
    pub export_file_name: String,
    pub export_sheet_name: String,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| LogFormat::Compact.to_string())
            .parse()?;

        let secrets_file = PathBuf::from(
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string()),
        );
        let credentials = CredentialState::load(&secrets_file);

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format,
            function_name: env::var("LAMBDA_FUNCTION_NAME")
                .unwrap_or_else(|_| DEFAULT_FUNCTION_NAME.to_string()),
            default_file_name: env::var("DEFAULT_FILE_NAME")
                .unwrap_or_else(|_| DEFAULT_FILE_NAME.to_string()),
            pdf_bucket: env::var("PDF_BUCKET")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            aws_endpoint_url: env::var("AWS_ENDPOINT_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            secrets_file,
            credentials,
            result_cache_capacity: env::var("RESULT_CACHE_CAPACITY")
                .unwrap_or_else(|_| RESULT_CACHE_CAPACITY.to_string())
                .parse()
                .unwrap_or(RESULT_CACHE_CAPACITY),
            export_file_name: env::var("EXPORT_FILE_NAME")
                .unwrap_or_else(|_| DEFAULT_EXPORT_FILE_NAME.to_string()),
            export_sheet_name: env::var("EXPORT_SHEET_NAME")
                .unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration with defaults and the given credentials, without reading
    /// the environment.
    pub fn with_credentials(credentials: CredentialState) -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: LogFormat::Compact,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            pdf_bucket: None,
            aws_endpoint_url: None,
            secrets_file: PathBuf::from(DEFAULT_SECRETS_FILE),
            credentials,
            result_cache_capacity: RESULT_CACHE_CAPACITY,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.function_name.trim().is_empty() {
            return Err(anyhow::anyhow!("LAMBDA_FUNCTION_NAME must not be empty"));
        }

        ObjectReference::parse(&self.default_file_name)
            .map_err(|e| anyhow::anyhow!("DEFAULT_FILE_NAME is not a valid reference: {}", e))?;

        if self.result_cache_capacity == 0 {
            return Err(anyhow::anyhow!(
                "RESULT_CACHE_CAPACITY must be greater than zero"
            ));
        }

        if !self.export_file_name.to_lowercase().ends_with(".xlsx") {
            return Err(anyhow::anyhow!("EXPORT_FILE_NAME must end with .xlsx"));
        }

        let sheet_len = self.export_sheet_name.chars().count();
        if sheet_len == 0 || sheet_len > MAX_SHEET_NAME_LEN {
            return Err(anyhow::anyhow!(
                "EXPORT_SHEET_NAME must be between 1 and {} characters",
                MAX_SHEET_NAME_LEN
            ));
        }
        if self
            .export_sheet_name
            .chars()
            .any(|c| matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        {
            return Err(anyhow::anyhow!(
                "EXPORT_SHEET_NAME must not contain any of []:*?/\\"
            ));
        }

        Ok(())
    }

    /// Credentials for the remote function, or the configuration error that
    /// prevented loading them.
    pub fn credentials(&self) -> Result<&AwsCredentials, AppError> {
        self.credentials.get()
    }

    pub fn credentials_loaded(&self) -> bool {
        self.credentials.is_loaded()
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn default_file_name(&self) -> &str {
        &self.default_file_name
    }

    pub fn pdf_bucket(&self) -> Option<&str> {
        self.pdf_bucket.as_deref()
    }

    pub fn aws_endpoint_url(&self) -> Option<&str> {
        self.aws_endpoint_url.as_deref()
    }

    pub fn result_cache_capacity(&self) -> usize {
        self.result_cache_capacity
    }

    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }

    pub fn export_sheet_name(&self) -> &str {
        &self.export_sheet_name
    }
}
