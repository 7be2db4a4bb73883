//! `file.*` calls and direct uploads

use crate::{CloudKey, CloudKeyError, Media, Result, UploadOptions, UploadTicket};
use bytes::Bytes;
use std::path::Path;
use tracing::{debug, instrument};

/// File operations, borrowed from a [`CloudKey`]
pub struct FileApi<'a> {
    client: &'a CloudKey,
}

impl<'a> FileApi<'a> {
    pub(crate) fn new(client: &'a CloudKey) -> Self {
        Self { client }
    }

    /// Request a signed upload URL
    #[instrument(skip(self))]
    pub async fn upload(&self) -> Result<UploadTicket> {
        self.upload_with(UploadOptions::default()).await
    }

    /// Request a signed upload URL with options.
    ///
    /// The URL carries fresh `seal` and `uuid` parameters and, when given,
    /// the `target` unchanged.
    #[instrument(skip(self))]
    pub async fn upload_with(&self, options: UploadOptions) -> Result<UploadTicket> {
        self.client.call("file.upload", &options).await
    }

    /// Upload a local file and return the resulting media
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<Media> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CloudKeyError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("No usable file name in {}", path.display()),
                ))
            })?
            .to_string();

        let data = tokio::fs::read(path).await?;
        debug!(size = data.len(), "Read upload source");

        let ticket = self.upload().await?;
        let reply = self
            .client
            .transport()
            .upload(&ticket.url, &file_name, Bytes::from(data))
            .await?;

        serde_json::from_value(reply).map_err(|e| {
            CloudKeyError::InvalidResponse(format!("Upload returned an unexpected payload: {}", e))
        })
    }
}
