//! `media.*` calls: CRUD and per-media metadata

use crate::{
    CloudKey, CloudKeyError, CreateMediaOptions, Media, MediaId, MetaValue, Result,
    SetMetaRequest,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Media operations, borrowed from a [`CloudKey`]
pub struct MediaApi<'a> {
    client: &'a CloudKey,
}

impl<'a> MediaApi<'a> {
    pub(crate) fn new(client: &'a CloudKey) -> Self {
        Self { client }
    }

    // ==================== Media Operations ====================

    /// Create an empty media
    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<Media> {
        self.create_with(CreateMediaOptions::default()).await
    }

    /// Create a media with options
    #[instrument(skip(self))]
    pub async fn create_with(&self, options: CreateMediaOptions) -> Result<Media> {
        let media: Media = self.client.call("media.create", &options).await?;
        debug!(id = %media.id, "Media created");
        Ok(media)
    }

    /// Get a media
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn info(&self, id: impl Into<MediaId>) -> Result<Media> {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());
        self.client.call("media.info", json!({ "id": id })).await
    }

    /// Delete a media. Deleting an unknown or already deleted id fails with
    /// `NotFound`.
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn delete(&self, id: impl Into<MediaId>) -> Result<()> {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());
        self.client.call_unit("media.delete", json!({ "id": id })).await
    }

    /// Delete every media of the effective user
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        self.client.call_unit("media.reset", json!({})).await
    }

    // ==================== Metadata Operations ====================

    /// Create or overwrite a metadata entry
    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn set_meta(&self, request: SetMetaRequest) -> Result<()> {
        let missing = request.missing_params();
        if !missing.is_empty() {
            debug!(?missing, "Refusing set_meta with omitted parameters");
            return Err(CloudKeyError::MissingParam(missing.join(", ")));
        }
        self.client.call_unit("media.set_meta", &request).await
    }

    /// Get a metadata entry
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn get_meta(&self, id: impl Into<MediaId>, key: &str) -> Result<MetaValue> {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());
        self.client
            .call("media.get_meta", json!({ "id": id, "key": key }))
            .await
    }

    /// List every metadata entry of a media
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn list_meta(&self, id: impl Into<MediaId>) -> Result<BTreeMap<String, MetaValue>> {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());
        let value: Value = self.client.call("media.list_meta", json!({ "id": id })).await?;
        decode_meta_listing(value)
    }

    /// Remove a metadata entry. Removing a key that is not set fails with
    /// `NotFound`.
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn remove_meta(&self, id: impl Into<MediaId>, key: &str) -> Result<()> {
        let id = id.into();
        tracing::Span::current().record("id", id.as_str());
        self.client
            .call_unit("media.remove_meta", json!({ "id": id, "key": key }))
            .await
    }
}

// An empty listing may come back as `null` or `[]`
fn decode_meta_listing(value: Value) -> Result<BTreeMap<String, MetaValue>> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
        other => serde_json::from_value(other).map_err(|e| {
            CloudKeyError::InvalidResponse(format!("media.list_meta returned an unexpected payload: {}", e))
        }),
    }
}
