//! Credentials and the per-call context

use serde_json::{Map, Value};

/// Login credentials. Both fields absent means anonymous.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Credentials for a named user
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// No credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build from optional parts
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// The username, if any
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password, if any
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// True when no username is set
    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The context every call is issued under: who is calling and who they act as.
///
/// A `Session` is immutable. Deriving a new impersonation context returns a
/// new value, so a context captured by an in-flight call can never change
/// underneath it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Credentials,
    acting_as: Option<String>,
}

impl Session {
    /// Session for a named user
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::from_credentials(Credentials::new(username, password))
    }

    /// Session without credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session over existing credentials
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            acting_as: None,
        }
    }

    /// A copy of this session that impersonates `username`.
    ///
    /// Nothing is checked locally; the server validates the target and the
    /// caller's privilege on the next authenticated call.
    pub fn act_as_user(&self, username: impl Into<String>) -> Self {
        Self {
            credentials: self.credentials.clone(),
            acting_as: Some(username.into()),
        }
    }

    /// A copy of this session acting as the authenticated user
    pub fn act_as_self(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            acting_as: None,
        }
    }

    /// The impersonated username, if any
    pub fn acting_as(&self) -> Option<&str> {
        self.acting_as.as_deref()
    }

    /// The session credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// True when the session carries no credentials
    pub fn is_anonymous(&self) -> bool {
        self.credentials.is_anonymous()
    }

    /// Build the JSON body for a call
    pub fn envelope(&self, call: &str, args: Value) -> Value {
        let mut body = Map::new();
        body.insert("call".to_string(), Value::String(call.to_string()));
        let args = match args {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        body.insert("args".to_string(), args);
        if let Some(user) = &self.acting_as {
            body.insert("act_as_user".to_string(), Value::String(user.clone()));
        }
        Value::Object(body)
    }
}
