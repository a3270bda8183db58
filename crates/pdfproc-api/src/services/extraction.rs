//! PDF extraction service
//!
//! Runs one extraction: credentials check, reference parsing, the optional
//! existence check, then a single synchronous call to the remote function whose
//! body becomes an [`ExtractionResult`].

use pdfproc_core::{AppError, Config, CredentialState, ExtractionResult, ObjectReference};
use pdfproc_invoker::{
    create_invoker, create_locator, decode_response, encode_request, FunctionInvoker,
    ObjectLocator,
};
use std::sync::Arc;

/// Remote function client, or the reason it could not be built.
#[derive(Clone)]
enum InvokerHandle {
    Ready(Arc<dyn FunctionInvoker>),
    Unavailable(String),
}

#[derive(Clone)]
pub struct ExtractionService {
    invoker: InvokerHandle,
    locator: Option<Arc<dyn ObjectLocator>>,
}

impl ExtractionService {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, locator: Option<Arc<dyn ObjectLocator>>) -> Self {
        Self {
            invoker: InvokerHandle::Ready(invoker),
            locator,
        }
    }

    /// A service whose every request fails with a configuration error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            invoker: InvokerHandle::Unavailable(reason.into()),
            locator: None,
        }
    }

    /// Build the service from configuration.
    ///
    /// Missing credentials are not an error here: the service starts in the
    /// unavailable state and reports the reason on each request.
    pub async fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        if let CredentialState::Unavailable(reason) = &config.credentials {
            tracing::warn!(
                reason = %reason,
                secrets_file = %config.secrets_file.display(),
                "AWS credentials unavailable; processing requests will fail"
            );
            return Ok(Self::unavailable(reason.clone()));
        }

        let invoker = create_invoker(config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create remote function client: {}", e))?;
        let locator = create_locator(config)
            .map_err(|e| anyhow::anyhow!("Failed to create object locator: {}", e))?;

        tracing::info!(
            function_name = %invoker.function_name(),
            pdf_bucket = ?locator.as_ref().map(|l| l.bucket().to_string()),
            "Extraction service ready"
        );

        Ok(Self::new(invoker, locator))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.invoker, InvokerHandle::Ready(_))
    }

    /// Reason the service cannot process requests, if any.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.invoker {
            InvokerHandle::Ready(_) => None,
            InvokerHandle::Unavailable(reason) => Some(reason),
        }
    }

    #[tracing::instrument(skip(self), fields(operation = "process_pdf"))]
    pub async fn process(&self, raw_reference: &str) -> Result<ExtractionResult, AppError> {
        let invoker = match &self.invoker {
            InvokerHandle::Ready(invoker) => invoker,
            InvokerHandle::Unavailable(reason) => {
                return Err(AppError::Configuration(reason.clone()))
            }
        };

        let reference = ObjectReference::parse(raw_reference)?;

        if let Some(locator) = &self.locator {
            if !locator.exists(&reference).await? {
                return Err(AppError::ObjectNotFound(format!(
                    "{} (bucket {})",
                    reference,
                    reference.bucket.as_deref().unwrap_or(locator.bucket())
                )));
            }
        }

        let start = std::time::Instant::now();
        let payload = encode_request(&reference)?;
        let response = invoker.invoke(payload).await?;
        let body = decode_response(&reference, &response)?;
        let result = ExtractionResult::from_body(reference, body);

        tracing::info!(
            function_name = %invoker.function_name(),
            object_key = %result.source.key,
            rows = result.row_count(),
            columns = result.column_count(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote function executed successfully"
        );

        Ok(result)
    }
}
