//! Result sink
//!
//! Serializes an [`AggregatedResult`] to JSON and writes it out in full,
//! replacing whatever was at the destination.

use super::cloud::{is_cloud_url, CloudDestination};
use crate::error::Result;
use crate::pagination::AggregatedResult;
use bytes::Bytes;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where to write a result
#[derive(Debug, Clone)]
pub enum Destination {
    /// Local file
    File(PathBuf),
    /// Object in S3, R2, GCS or Azure
    Cloud(CloudDestination),
}

impl Destination {
    /// Parse an object store URL or a local path (`file://` prefix optional)
    pub fn parse(destination: &str) -> Result<Self> {
        if is_cloud_url(destination) {
            return Ok(Self::Cloud(CloudDestination::parse(destination)?));
        }

        let path = destination.strip_prefix("file://").unwrap_or(destination);
        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Writes results as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultSink {
    pretty: bool,
}

impl ResultSink {
    /// Create a sink writing compact JSON
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print the JSON
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize the result to bytes
    pub fn to_bytes(&self, result: &AggregatedResult) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(result)?
        } else {
            serde_json::to_vec(result)?
        };
        Ok(bytes)
    }

    /// Write the result to any destination
    pub async fn write(&self, destination: &Destination, result: &AggregatedResult) -> Result<()> {
        match destination {
            Destination::File(path) => self.write_file(path, result),
            Destination::Cloud(cloud) => {
                let bytes = self.to_bytes(result)?;
                let location = cloud.put(Bytes::from(bytes)).await?;
                info!("Wrote {} items to {}", result.len(), location);
                Ok(())
            }
        }
    }

    /// Write the result to a local file, truncating existing content
    pub fn write_file(&self, path: impl AsRef<Path>, result: &AggregatedResult) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(result)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;

        info!("Wrote {} items to {}", result.len(), path.display());
        Ok(())
    }

    /// Write the result to a stream and flush it
    pub fn write_to<W: Write>(&self, mut writer: W, result: &AggregatedResult) -> Result<()> {
        let bytes = self.to_bytes(result)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}
