//! Transport seam between the resource clients and the wire

use crate::{error::Fault, CloudKeyError, Config, Result, Session};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, multipart, Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// Executes API calls on behalf of a [`Session`].
///
/// Implementations return the decoded `result` payload of a call, or the
/// mapped [`CloudKeyError`] for a server fault.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run `call` (e.g. `media.info`) with `args` under `session`
    async fn execute(&self, call: &str, args: Value, session: &Session) -> Result<Value>;

    /// Post file bytes to a signed upload URL and return the server's reply
    async fn upload(&self, url: &str, file_name: &str, data: Bytes) -> Result<Value>;
}

/// HTTP transport over `reqwest`
pub struct HttpTransport {
    config: Config,
    http: Client,
}

impl HttpTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| CloudKeyError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        let http = builder.build().map_err(CloudKeyError::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn authorize(&self, req: RequestBuilder, session: &Session) -> RequestBuilder {
        let credentials = session.credentials();
        match credentials.username() {
            Some(username) => req.basic_auth(username, Some(credentials.password().unwrap_or(""))),
            None => req,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, call: &str, args: Value, session: &Session) -> Result<Value> {
        let url = self.config.api_url();
        let body = session.envelope(call, args);

        debug!(
            call,
            acting_as = session.acting_as(),
            anonymous = session.is_anonymous(),
            "Sending API call to {}",
            url
        );
        let response = self
            .authorize(self.http.post(&url), session)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_call_response(status, &text)
    }

    async fn upload(&self, url: &str, file_name: &str, data: Bytes) -> Result<Value> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let size = data.len();
        let part = multipart::Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())?;
        let form = multipart::Form::new().part("file", part);

        debug!(file_name, size, "Uploading file to {}", url);
        let response = self.http.post(url).multipart(form).send().await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_upload_response(status, &text)
    }
}

/// Decode a `{"result": ...}` / `{"error": ...}` call response
pub(crate) fn decode_call_response(status: u16, body: &str) -> Result<Value> {
    let value = decode_json(status, body)?;
    match value {
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error").filter(|e| !e.is_null()) {
                return Err(fault_from_value(error));
            }
            Ok(map.remove("result").unwrap_or(Value::Null))
        }
        Value::Null => Ok(Value::Null),
        other => Err(CloudKeyError::InvalidResponse(format!(
            "Expected a JSON object, got: {}",
            other
        ))),
    }
}

/// Decode the upload server's reply, which is not wrapped in `result`
pub(crate) fn decode_upload_response(status: u16, body: &str) -> Result<Value> {
    let value = decode_json(status, body)?;
    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(fault_from_value(error.clone()));
    }
    Ok(value)
}

fn decode_json(status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        let error = CloudKeyError::from_http_body(status, body);
        debug!(status, kind = ?error.kind(), "Call failed: {}", error);
        return Err(error);
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| CloudKeyError::InvalidResponse(format!("Undecodable body: {}", e)))
}

fn fault_from_value(error: Value) -> CloudKeyError {
    match serde_json::from_value::<Fault>(error.clone()) {
        Ok(fault) => {
            let error = fault.into_error();
            debug!(kind = ?error.kind(), "Server fault: {}", error);
            error
        }
        Err(_) => CloudKeyError::InvalidResponse(format!("Malformed error object: {}", error)),
    }
}
