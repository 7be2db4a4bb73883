//! In-memory CloudKey backend for tests
//!
//! Implements `Transport` with the server's documented behavior: credential
//! checks, impersonation that only a root account can use, 24-hex media ids,
//! per-media metadata, and signed upload tickets.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use cloudkey_client::{CloudKey, CloudKeyError, ErrorKind, MediaId, Result, Session, Transport};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "alice-password";
pub const ROOT_USERNAME: &str = "root";
pub const ROOT_PASSWORD: &str = "root-password";
pub const SWITCH_USER: &str = "bob";

const UPLOAD_ENDPOINT: &str = "http://upload.cloudkey.test/upload";

struct Account {
    id: String,
    password: String,
    is_root: bool,
}

struct MediaRecord {
    owner: String,
    size: Option<u64>,
    name: Option<String>,
    url: Option<String>,
    meta: BTreeMap<String, String>,
}

impl MediaRecord {
    fn to_json(&self, id: &str) -> Value {
        let mut media = Map::new();
        media.insert("id".into(), json!(id));
        if let Some(size) = self.size {
            media.insert("size".into(), json!(size));
        }
        if let Some(name) = &self.name {
            media.insert("name".into(), json!(name));
        }
        if let Some(url) = &self.url {
            media.insert("url".into(), json!(url));
        }
        Value::Object(media)
    }
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    media: HashMap<String, MediaRecord>,
    // upload uuid -> owner
    pending_uploads: HashMap<String, String>,
    calls: Vec<String>,
}

/// An in-memory backend shared by every client built from it
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    /// A backend with a normal user, a root user and a switch target
    pub fn new() -> Self {
        let backend = Self::default();
        backend.add_account(USERNAME, PASSWORD, false);
        backend.add_account(ROOT_USERNAME, ROOT_PASSWORD, true);
        backend.add_account(SWITCH_USER, "bob-password", false);
        backend
    }

    pub fn add_account(&self, username: &str, password: &str, is_root: bool) {
        self.state.lock().accounts.insert(
            username.to_string(),
            Account {
                id: new_id(),
                password: password.to_string(),
                is_root,
            },
        );
    }

    /// A client for `session` talking to this backend
    pub fn client(&self, session: Session) -> CloudKey {
        CloudKey::with_transport(Arc::new(self.clone()), session)
    }

    /// Names of the calls received so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Number of media stored, across owners
    pub fn media_count(&self) -> usize {
        self.state.lock().media.len()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..24].to_string()
}

fn fault(kind: ErrorKind, message: impl Into<String>) -> CloudKeyError {
    CloudKeyError::from_kind(kind, message)
}

fn str_arg<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

impl State {
    /// Resolve the effective principal of a session
    fn principal(&self, session: &Session) -> Result<String> {
        let credentials = session.credentials();
        let username = credentials
            .username()
            .ok_or_else(|| fault(ErrorKind::AuthorizationRequired, "authentication required"))?;
        let account = self
            .accounts
            .get(username)
            .filter(|a| Some(a.password.as_str()) == credentials.password())
            .ok_or_else(|| fault(ErrorKind::AuthenticationFailed, "invalid credentials"))?;

        match session.acting_as() {
            None => Ok(username.to_string()),
            Some(target) => {
                if !self.accounts.contains_key(target) {
                    return Err(fault(
                        ErrorKind::AuthenticationFailed,
                        format!("cannot act as {}", target),
                    ));
                }
                // Only root may switch identity; others keep their own
                if account.is_root {
                    Ok(target.to_string())
                } else {
                    Ok(username.to_string())
                }
            }
        }
    }

    /// Validate the `id` argument and find the caller's media
    fn media_id(&self, args: &Value, owner: &str) -> Result<String> {
        let id = str_arg(args, "id").ok_or_else(|| fault(ErrorKind::MissingParam, "id"))?;
        if !MediaId::from(id).is_well_formed() {
            return Err(fault(ErrorKind::InvalidParam, format!("invalid media id: {}", id)));
        }
        match self.media.get(id) {
            Some(record) if record.owner == owner => Ok(id.to_string()),
            _ => Err(fault(ErrorKind::NotFound, format!("media not found: {}", id))),
        }
    }

    fn dispatch(&mut self, call: &str, args: &Value, session: &Session) -> Result<Value> {
        let owner = self.principal(session)?;

        match call {
            "user.whoami" => {
                let account = &self.accounts[&owner];
                Ok(json!({ "id": account.id, "username": owner }))
            }
            "media.create" => {
                let id = new_id();
                let meta: BTreeMap<String, String> = args
                    .get("meta")
                    .and_then(Value::as_object)
                    .map(|m| {
                        m.iter()
                            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                            .collect()
                    })
                    .unwrap_or_default();
                let record = MediaRecord {
                    owner,
                    size: None,
                    name: None,
                    url: str_arg(args, "url").map(str::to_string),
                    meta,
                };
                let media = record.to_json(&id);
                self.media.insert(id, record);
                Ok(media)
            }
            "media.info" => {
                let id = self.media_id(args, &owner)?;
                Ok(self.media[&id].to_json(&id))
            }
            "media.delete" => {
                let id = self.media_id(args, &owner)?;
                self.media.remove(&id);
                Ok(Value::Null)
            }
            "media.reset" => {
                self.media.retain(|_, record| record.owner != owner);
                Ok(Value::Null)
            }
            "media.set_meta" => {
                let key = str_arg(args, "key");
                let value = str_arg(args, "value");
                let (key, value) = match (key, value) {
                    (Some(k), Some(v)) => (k.to_string(), v.to_string()),
                    _ => return Err(fault(ErrorKind::MissingParam, "key and value are required")),
                };
                let id = self.media_id(args, &owner)?;
                if let Some(record) = self.media.get_mut(&id) {
                    record.meta.insert(key, value);
                }
                Ok(Value::Null)
            }
            "media.get_meta" => {
                let key = str_arg(args, "key").ok_or_else(|| fault(ErrorKind::MissingParam, "key"))?;
                let id = self.media_id(args, &owner)?;
                self.media[&id]
                    .meta
                    .get(key)
                    .map(|value| json!({ "value": value }))
                    .ok_or_else(|| fault(ErrorKind::NotFound, format!("meta not found: {}", key)))
            }
            "media.list_meta" => {
                let id = self.media_id(args, &owner)?;
                let meta = &self.media[&id].meta;
                if meta.is_empty() {
                    // The server encodes an empty mapping as a list
                    return Ok(json!([]));
                }
                Ok(Value::Object(
                    meta.iter()
                        .map(|(k, v)| (k.clone(), json!({ "value": v })))
                        .collect(),
                ))
            }
            "media.remove_meta" => {
                let key = str_arg(args, "key").ok_or_else(|| fault(ErrorKind::MissingParam, "key"))?;
                let id = self.media_id(args, &owner)?;
                self.media
                    .get_mut(&id)
                    .and_then(|r| r.meta.remove(key))
                    .map(|_| Value::Null)
                    .ok_or_else(|| fault(ErrorKind::NotFound, format!("meta not found: {}", key)))
            }
            "file.upload" => {
                let upload_id = uuid::Uuid::new_v4().to_string();
                let mut url = url::Url::parse(UPLOAD_ENDPOINT)
                    .map_err(|e| CloudKeyError::InvalidResponse(e.to_string()))?;
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("seal", &new_id());
                    query.append_pair("uuid", &upload_id);
                    if let Some(target) = str_arg(args, "target") {
                        query.append_pair("target", target);
                    }
                }
                self.pending_uploads.insert(upload_id, owner);
                Ok(json!({ "url": url.to_string() }))
            }
            other => Err(CloudKeyError::Server {
                code: 200,
                message: format!("unknown method: {}", other),
            }),
        }
    }

    fn receive_upload(&mut self, url: &str, file_name: &str, data: &[u8]) -> Result<Value> {
        let url = url::Url::parse(url).map_err(|e| CloudKeyError::InvalidResponse(e.to_string()))?;
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        if !query.contains_key("seal") || !query.contains_key("uuid") {
            return Err(fault(ErrorKind::AuthenticationFailed, "unsigned upload"));
        }
        let owner = self
            .pending_uploads
            .remove(&query["uuid"])
            .ok_or_else(|| fault(ErrorKind::AuthenticationFailed, "unknown upload"))?;

        let id = new_id();
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string();
        let record = MediaRecord {
            owner,
            size: Some(data.len() as u64),
            name: Some(stem),
            url: Some(format!("http://cdn.cloudkey.test/{}/{}", id, file_name)),
            meta: BTreeMap::new(),
        };
        let media = record.to_json(&id);
        self.media.insert(id, record);
        Ok(media)
    }
}

#[async_trait]
impl Transport for MemoryBackend {
    async fn execute(&self, call: &str, args: Value, session: &Session) -> Result<Value> {
        let mut state = self.state.lock();
        state.calls.push(call.to_string());
        state.dispatch(call, &args, session)
    }

    async fn upload(&self, url: &str, file_name: &str, data: Bytes) -> Result<Value> {
        let mut state = self.state.lock();
        state.calls.push("upload".to_string());
        state.receive_upload(url, file_name, &data)
    }
}
