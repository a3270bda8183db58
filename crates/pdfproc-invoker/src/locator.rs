use crate::traits::{InvokeError, InvokeResult, ObjectLocator};
use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::ObjectStoreExt;
use pdfproc_core::{AwsCredentials, ObjectReference};

/// S3 existence check for PDF objects
#[derive(Clone)]
pub struct S3ObjectLocator {
    store: AmazonS3,
    bucket: String,
}

impl S3ObjectLocator {
    /// Create a new S3ObjectLocator
    ///
    /// # Arguments
    /// * `credentials` - Same static credentials used for the remote function
    /// * `bucket` - Bucket holding the PDFs
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    pub fn new(
        credentials: &AwsCredentials,
        bucket: String,
        endpoint_url: Option<String>,
    ) -> InvokeResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_region(credentials.region())
            .with_bucket_name(bucket.clone())
            .with_access_key_id(credentials.access_key_id())
            .with_secret_access_key(credentials.secret_access_key());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| InvokeError::ConfigError(e.to_string()))?;

        Ok(S3ObjectLocator { store, bucket })
    }
}

/// Bucket named by `reference` when it differs from the configured one.
///
/// Only the configured bucket is checked; other buckets are left to the
/// remote function.
fn foreign_bucket<'a>(reference: &'a ObjectReference, configured: &str) -> Option<&'a str> {
    reference.bucket.as_deref().filter(|bucket| *bucket != configured)
}

#[async_trait]
impl ObjectLocator for S3ObjectLocator {
    async fn exists(&self, reference: &ObjectReference) -> InvokeResult<bool> {
        if let Some(other) = foreign_bucket(reference, &self.bucket) {
            tracing::debug!(
                bucket = %other,
                configured_bucket = %self.bucket,
                "Skipping existence check for foreign bucket"
            );
            return Ok(true);
        }

        let start = std::time::Instant::now();
        let location = Path::from(reference.key.clone());
        let result = match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(InvokeError::Transport(e.to_string())),
        };

        tracing::debug!(
            bucket = %self.bucket,
            key = %reference.key,
            found = ?result.as_ref().ok(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 existence check"
        );

        result
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
