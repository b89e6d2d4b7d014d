//! Shared JSON-RPC 2.0 call machinery for the daemon and wallet
//! endpoints. Both speak the same envelope on `POST /json_rpc`; a few
//! daemon methods live on plain HTTP paths instead.

use crate::error::{Result, RpcError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Optional HTTP basic-auth credentials.
#[derive(Debug, Clone)]
pub struct RpcAuth {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// One authenticated JSON-RPC endpoint.
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    base_url: String,
    auth: Option<RpcAuth>,
    request_id: AtomicU64,
}

impl JsonRpcClient {
    /// Build a client for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, auth: Option<RpcAuth>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            request_id: AtomicU64::new(0),
        })
    }

    fn next_id(&self) -> String {
        self.request_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Invoke `method` on `/json_rpc` and decode its `result`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id(),
            method,
            params,
        };
        debug!(method, url = %self.base_url, "json-rpc call");

        let mut builder = self
            .http
            .post(format!("{}/json_rpc", self.base_url))
            .json(&request);
        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let response: JsonRpcResponse<T> =
            builder.send().await?.error_for_status()?.json().await?;

        if let Some(err) = response.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response
            .result
            .ok_or_else(|| RpcError::Malformed(format!("{method}: missing result")))
    }

    /// GET a plain (non-enveloped) HTTP endpoint like `/get_height`.
    pub async fn get_plain<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut builder = self.http.get(format!("{}{path}", self.base_url));
        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        Ok(builder.send().await?.error_for_status()?.json().await?)
    }
}
