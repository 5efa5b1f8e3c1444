//! Object store destinations (S3, R2, GCS, Azure)

use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// URL schemes routed to an object store
const CLOUD_SCHEMES: [&str; 4] = ["s3://", "r2://", "gs://", "az://"];

/// Whether a destination string names an object store location
pub fn is_cloud_url(url: &str) -> bool {
    CLOUD_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// A single object in a bucket or container
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Object key within the bucket/container
    key: String,
    /// URL scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/results.json` - AWS S3
    /// - `r2://bucket/path/results.json` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/results.json` - Google Cloud Storage
    /// - `az://container/path/results.json` - Azure Blob Storage
    ///
    /// Credentials and region come from the environment.
    pub fn parse(url: &str) -> Result<Self> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| Error::config(format!("Invalid object store URL: {url}")))?;

        let (bucket, key) = split_bucket(rest)
            .ok_or_else(|| Error::config(format!("Object store URL needs bucket and key: {url}")))?;

        let store: Arc<dyn ObjectStore> = match scheme {
            "s3" | "r2" => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
                if scheme == "r2" {
                    if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                        builder = builder.with_endpoint(endpoint);
                    }
                }
                Arc::new(builder.build().map_err(|e| {
                    Error::config(format!("Failed to create {scheme} client: {e}"))
                })?)
            }
            "gs" => Arc::new(
                GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?,
            ),
            "az" => Arc::new(
                MicrosoftAzureBuilder::from_env()
                    .with_container_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?,
            ),
            other => {
                return Err(Error::config(format!(
                    "Unsupported object store scheme: {other}"
                )))
            }
        };

        Ok(Self::with_store(store, scheme, key))
    }

    /// Wrap an already-built store
    pub(crate) fn with_store(
        store: Arc<dyn ObjectStore>,
        scheme: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            scheme: scheme.into(),
        }
    }

    /// Get the scheme (s3, r2, gs, az)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Object key within the bucket
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the object with `data`
    pub async fn put(&self, data: Bytes) -> Result<String> {
        let path = ObjectPath::from(self.key.as_str());

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{path}", self.scheme))
    }
}

/// Split `bucket/key/parts` into bucket and a non-empty key
fn split_bucket(rest: &str) -> Option<(&str, &str)> {
    let (bucket, key) = rest.split_once('/')?;
    let key = key.trim_matches('/');
    if bucket.is_empty() || key.is_empty() {
        None
    } else {
        Some((bucket, key))
    }
}
