// Copyright 2025 The Kappital Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! One-shot HTTP request envelope.
//!
//! Every subcommand funnels through [`execute`]: build a request, build a
//! matching client (plain or mutual TLS from base64 PEM blobs), perform
//! exactly one round trip, and hand back status and raw body. The envelope
//! never interprets status codes; the body carries the server's error
//! detail on non-2xx and callers format it into their own messages.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Certificate, Client, Identity, Method};
use tracing::debug;

use crate::domain::config::ManagerConfig;
use crate::shared::error::{KappError, Result};

/// Request body: a value to JSON-encode, or a pre-assembled binary buffer
/// (package archives). The distinction is carried in the type, so a
/// mislabeled body cannot be constructed.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    File(Vec<u8>),
}

/// TLS material carried from the connection profile.
#[derive(Debug, Clone, Default)]
pub struct TlsMaterial {
    pub ca_data: String,
    pub cert_data: String,
    pub key_data: String,
    pub skip_verify: bool,
}

impl From<&ManagerConfig> for TlsMaterial {
    fn from(cfg: &ManagerConfig) -> Self {
        TlsMaterial {
            ca_data: cfg.ca_data.clone(),
            cert_data: cfg.client_cert_data.clone(),
            key_data: cfg.client_key_data.clone(),
            skip_verify: cfg.skip_verify,
        }
    }
}

/// One-shot request description.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub url: String,
    pub body: Option<RequestBody>,
    /// Appended header values (multi-valued).
    pub header_add: Vec<(String, String)>,
    /// Replacing header values, applied after `header_add`.
    pub header_set: Vec<(String, String)>,
    pub tls: TlsMaterial,
}

impl RequestInfo {
    pub fn new(method: Method, url: impl Into<String>, tls: TlsMaterial) -> Self {
        RequestInfo {
            method,
            url: url.into(),
            body: None,
            header_add: Vec::new(),
            header_set: Vec::new(),
            tls,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Perform the round trip described by `info`. Returns the response status
/// and the fully-read body. Client-construction failures (bad base64, a
/// cert/key pair that does not parse) surface before any request is sent.
pub async fn execute(info: &RequestInfo) -> Result<(u16, Vec<u8>)> {
    let client = build_client(&info.tls, &info.url)?;

    let mut request = client.request(info.method.clone(), &info.url);
    match &info.body {
        Some(RequestBody::Json(value)) => {
            request = request.json(value);
        }
        Some(RequestBody::File(buf)) => {
            request = request.body(buf.clone());
        }
        None => {}
    }
    for (name, value) in &info.header_add {
        request = request.header(name, value);
    }
    if !info.header_set.is_empty() {
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in &info.header_set {
            let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| KappError::input(format!("invalid header name [{}]: {}", name, e)))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| KappError::input(format!("invalid header value: {}", e)))?;
            headers.insert(name, value);
        }
        request = request.headers(headers);
    }

    debug!(method = %info.method, url = %info.url, "sending manager request");
    let response = request.send().await.map_err(|e| KappError::Transport {
        op: "request".to_string(),
        name: info.url.clone(),
        source: e,
    })?;

    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| KappError::Transport {
            op: "read response of".to_string(),
            name: info.url.clone(),
            source: e,
        })?
        .to_vec();
    Ok((status, body))
}

/// Build the HTTP client for a request. Plain requests and profiles
/// without CA material use a stock verification-enabled client; anything
/// else gets the mutual-TLS client assembled from the profile's blobs.
/// The skip flag is honored even when a CA is configured.
fn build_client(tls: &TlsMaterial, url: &str) -> Result<Client> {
    if tls.ca_data.is_empty() || url.starts_with("http://") {
        return Ok(Client::new());
    }

    let ca = decode_blob(&tls.ca_data, "manager-ca")?;
    let cert = decode_blob(&tls.cert_data, "manager-client-certificate-data")?;
    let key = decode_blob(&tls.key_data, "manager-client-key-data")?;

    let ca = Certificate::from_pem(&ca)
        .map_err(|e| KappError::TlsMaterial(format!("failed to parse manager-ca: {}", e)))?;
    // rustls wants the certificate and key in a single PEM bundle.
    let mut identity_pem = cert;
    identity_pem.push(b'\n');
    identity_pem.extend_from_slice(&key);
    let identity = Identity::from_pem(&identity_pem).map_err(|e| {
        KappError::TlsMaterial(format!("failed to build client keypair: {}", e))
    })?;

    Client::builder()
        .use_rustls_tls()
        .add_root_certificate(ca)
        .identity(identity)
        .danger_accept_invalid_certs(tls.skip_verify)
        .build()
        .map_err(|e| KappError::TlsMaterial(format!("failed to build HTTPS client: {}", e)))
}

fn decode_blob(data: &str, field: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| KappError::TlsMaterial(format!("failed to decode {}: {}", field, e)))
}
