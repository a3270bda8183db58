use crate::traits::{FunctionInvoker, InvocationResponse, InvokeError, InvokeResult};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_lambda::config::Credentials;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::operation::invoke::InvokeError as LambdaInvokeError;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client;
use bytes::Bytes;
use pdfproc_core::AwsCredentials;

const CREDENTIALS_PROVIDER_NAME: &str = "pdfproc-secrets";

/// Service error codes that mean the configured credentials were rejected.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "AccessDeniedException",
    "ExpiredTokenException",
];

/// AWS Lambda backed invoker
#[derive(Clone)]
pub struct LambdaInvoker {
    client: Client,
    function_name: String,
}

impl LambdaInvoker {
    /// Create a new LambdaInvoker
    ///
    /// # Arguments
    /// * `credentials` - Static access key, secret and region from the secrets store
    /// * `function_name` - Name or ARN of the target function
    /// * `endpoint_url` - Optional custom endpoint (e.g. "http://localhost:4566" for LocalStack)
    pub async fn new(
        credentials: &AwsCredentials,
        function_name: String,
        endpoint_url: Option<String>,
    ) -> InvokeResult<Self> {
        if function_name.trim().is_empty() {
            return Err(InvokeError::ConfigError(
                "Function name must not be empty".to_string(),
            ));
        }

        let static_credentials = Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        // One call per request; failures are reported, not retried.
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(credentials.region().to_string()))
            .credentials_provider(static_credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(ref endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        tracing::debug!(
            function_name = %function_name,
            region = %credentials.region(),
            endpoint = ?endpoint_url,
            "Lambda client configured"
        );

        Ok(LambdaInvoker {
            client: Client::new(&config),
            function_name,
        })
    }
}

fn classify_error(function_name: &str, err: SdkError<LambdaInvokeError>) -> InvokeError {
    match &err {
        SdkError::ServiceError(service_err) => classify_service_error(
            function_name,
            service_err.err(),
            service_err.raw().status().as_u16(),
        ),
        _ => InvokeError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

/// Map a modeled Lambda error to the invoker taxonomy.
fn classify_service_error(
    function_name: &str,
    err: &LambdaInvokeError,
    status: u16,
) -> InvokeError {
    if err.is_resource_not_found_exception() {
        return InvokeError::FunctionNotFound(function_name.to_string());
    }

    let code = err.code().unwrap_or("Unknown");
    let message = format!("{}: {}", code, err.message().unwrap_or("Unknown error"));
    if is_credential_error(code) {
        InvokeError::Credentials(message)
    } else {
        InvokeError::Remote {
            status_code: i32::from(status),
            message,
        }
    }
}

fn is_credential_error(code: &str) -> bool {
    CREDENTIAL_ERROR_CODES.contains(&code)
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke(&self, payload: Bytes) -> InvokeResult<InvocationResponse> {
        let start = std::time::Instant::now();
        let size = payload.len();

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await
            .map_err(|e| {
                let err = classify_error(&self.function_name, e);
                tracing::error!(
                    error = %err,
                    function_name = %self.function_name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Lambda invocation failed"
                );
                err
            })?;

        let response = InvocationResponse {
            status_code: output.status_code(),
            function_error: output.function_error().map(String::from),
            payload: output
                .payload()
                .map(|blob| Bytes::copy_from_slice(blob.as_ref()))
                .unwrap_or_default(),
            executed_version: output.executed_version().map(String::from),
        };

        tracing::info!(
            function_name = %self.function_name,
            status_code = response.status_code,
            function_error = ?response.function_error,
            executed_version = ?response.executed_version,
            response_bytes = response.payload.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Lambda invocation completed"
        );

        Ok(response)
    }

    fn function_name(&self) -> &str {
        &self.function_name
    }
}
