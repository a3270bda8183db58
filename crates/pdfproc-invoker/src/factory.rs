#[cfg(feature = "lambda")]
use crate::LambdaInvoker;
#[cfg(feature = "s3-locator")]
use crate::S3ObjectLocator;
use crate::{FunctionInvoker, InvokeError, InvokeResult, ObjectLocator};
use pdfproc_core::{AwsCredentials, Config, CredentialState};
use std::sync::Arc;

fn require_credentials(config: &Config) -> InvokeResult<&AwsCredentials> {
    match &config.credentials {
        CredentialState::Loaded(credentials) => Ok(credentials),
        CredentialState::Unavailable(reason) => Err(InvokeError::ConfigError(reason.clone())),
    }
}

/// Create the remote function invoker based on configuration
pub async fn create_invoker(config: &Config) -> InvokeResult<Arc<dyn FunctionInvoker>> {
    let credentials = require_credentials(config)?;

    #[cfg(feature = "lambda")]
    {
        let invoker = LambdaInvoker::new(
            credentials,
            config.function_name().to_string(),
            config.aws_endpoint_url().map(String::from),
        )
        .await?;
        Ok(Arc::new(invoker))
    }

    #[cfg(not(feature = "lambda"))]
    {
        let _ = credentials;
        Err(InvokeError::ConfigError(
            "Lambda invoker not available (lambda feature not enabled)".to_string(),
        ))
    }
}

/// Create the pre-flight object locator, if a bucket is configured
pub fn create_locator(config: &Config) -> InvokeResult<Option<Arc<dyn ObjectLocator>>> {
    let bucket = match config.pdf_bucket() {
        Some(bucket) => bucket.to_string(),
        None => return Ok(None),
    };
    let credentials = require_credentials(config)?;

    #[cfg(feature = "s3-locator")]
    {
        let locator = S3ObjectLocator::new(
            credentials,
            bucket,
            config.aws_endpoint_url().map(String::from),
        )?;
        Ok(Some(Arc::new(locator)))
    }

    #[cfg(not(feature = "s3-locator"))]
    {
        let _ = (credentials, bucket);
        Err(InvokeError::ConfigError(
            "S3 locator not available (s3-locator feature not enabled)".to_string(),
        ))
    }
}
