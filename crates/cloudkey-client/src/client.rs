//! Main client implementation

use crate::{
    CloudKeyError, Config, Credentials, FileApi, HttpTransport, MediaApi, Result, Session,
    Transport, UserApi,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// CloudKey API client.
///
/// Owns one [`Session`]; the resource groups are reached through
/// [`user`](Self::user), [`media`](Self::media) and [`file`](Self::file).
#[derive(Clone)]
pub struct CloudKey {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl CloudKey {
    /// Create a client for a named user with the default configuration.
    ///
    /// No request is sent; credentials are checked by the first call.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::default(), Credentials::new(username, password))
    }

    /// Create an anonymous client with the default configuration
    pub fn anonymous() -> Result<Self> {
        Self::with_config(Config::default(), Credentials::anonymous())
    }

    /// Create a client over HTTP with the given configuration
    pub fn with_config(config: Config, credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            Session::from_credentials(credentials),
        ))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    /// The current calling context
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Impersonate `username` on every subsequent call.
    ///
    /// This is a local change only. An unknown or forbidden target surfaces as
    /// `AuthenticationFailed` on the next call.
    pub fn act_as_user(&mut self, username: impl Into<String>) {
        self.session = self.session.act_as_user(username);
        debug!(acting_as = self.session.acting_as(), "Impersonation set");
    }

    /// Stop impersonating
    pub fn act_as_self(&mut self) {
        self.session = self.session.act_as_self();
    }

    /// A new client sharing this one's transport, impersonating `username`
    pub fn as_user(&self, username: impl Into<String>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: self.session.act_as_user(username),
        }
    }

    /// User operations
    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    /// Media operations
    pub fn media(&self) -> MediaApi<'_> {
        MediaApi::new(self)
    }

    /// File operations
    pub fn file(&self) -> FileApi<'_> {
        FileApi::new(self)
    }

    // ==================== Helper Methods ====================

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Run a call and decode its result
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        name: &str,
        args: impl Serialize,
    ) -> Result<T> {
        let args = serde_json::to_value(args)?;
        let value = self.transport.execute(name, args, &self.session).await?;
        serde_json::from_value(value).map_err(|e| {
            CloudKeyError::InvalidResponse(format!("{} returned an unexpected payload: {}", name, e))
        })
    }

    /// Run a call whose result carries nothing
    pub(crate) async fn call_unit(&self, name: &str, args: impl Serialize) -> Result<()> {
        let args = serde_json::to_value(args)?;
        self.transport.execute(name, args, &self.session).await?;
        Ok(())
    }
}

impl std::fmt::Debug for CloudKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudKey")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
