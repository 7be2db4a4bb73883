//! `user.*` calls

use crate::{CloudKey, Result, User};
use serde_json::json;
use tracing::instrument;

/// User operations, borrowed from a [`CloudKey`]
pub struct UserApi<'a> {
    client: &'a CloudKey,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a CloudKey) -> Self {
        Self { client }
    }

    /// The effective user of the session.
    ///
    /// With impersonation active this is the impersonated user when the
    /// server grants it.
    #[instrument(skip(self))]
    pub async fn whoami(&self) -> Result<User> {
        self.client.call("user.whoami", json!({})).await
    }
}
