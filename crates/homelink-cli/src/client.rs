//! HTTP client for the control API.

use homelink_core::{Device, PowerState};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

/// Default API base when neither flag nor environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001/api/v1/";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with `{"error": ...}`
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Thin wrapper over `reqwest` for the `/api/v1` routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// WebSocket URL of the controller channel.
    pub fn controller_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        format!("{ws_base}/ws")
    }

    pub async fn status(&self, device: Device) -> ClientResult<bool> {
        let body = self.get(&format!("{device}/status")).await?;
        body.get(device.as_str())
            .and_then(Value::as_bool)
            .ok_or_else(|| ClientError::UnexpectedResponse(body.to_string()))
    }

    pub async fn set_power(&self, device: Device, state: PowerState) -> ClientResult<Value> {
        self.post(device.as_str(), json!({ "state": state.as_str() }))
            .await
    }

    pub async fn volume(&self, device: Device) -> ClientResult<i64> {
        let body = self.get(&format!("{device}/volume")).await?;
        body.get(format!("{device}_volume"))
            .and_then(Value::as_i64)
            .ok_or_else(|| ClientError::UnexpectedResponse(body.to_string()))
    }

    pub async fn change_volume(&self, device: Device, delta: f64) -> ClientResult<Value> {
        self.post(&format!("{device}/volume"), json!({ "change": delta }))
            .await
    }

    async fn get(&self, path: &str) -> ClientResult<Value> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.http.get(&url).send().await?;
        read_body(response).await
    }

    async fn post(&self, path: &str, payload: Value) -> ClientResult<Value> {
        let url = self.url(path);
        debug!(url = %url, payload = %payload, "POST");
        let response = self.http.post(&url).json(&payload).send().await?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();
    if status.is_success() {
        return body.ok_or(ClientError::UnexpectedResponse(text));
    }
    // Non-JSON bodies (proxy, wrong base URL) are reported verbatim.
    let message = body
        .as_ref()
        .and_then(|b| b.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
