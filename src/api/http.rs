//! Blocking HTTP transport.
//!
//! One client per run, built with a fixed request timeout so an unresponsive
//! server fails the step instead of hanging the run.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::TransportError;

const USER_AGENT: &str = concat!("ieclub-smoke/", env!("CARGO_PKG_VERSION"));

pub struct HttpTransport {
    client: Client,
    root: String,
}

impl HttpTransport {
    /// Create a transport rooted at `root` (e.g. `https://host/api`).
    ///
    /// `timeout` bounds both the connection attempt and the whole request.
    pub fn new(root: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| TransportError::Request {
                url: root.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            root: root.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    fn build(&self, request: &ApiRequest, url: &str) -> RequestBuilder {
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);
        if !request.path.starts_with('/') {
            return Err(TransportError::InvalidUrl(url));
        }

        debug!(method = %request.method, url = %url, "sending request");

        let response = self
            .build(request, &url)
            .send()
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|source| TransportError::Request {
            url: url.clone(),
            source,
        })?;

        debug!(url = %url, status, bytes = text.len(), "received response");

        let body: Value = serde_json::from_str(&text).map_err(|e| TransportError::Decode {
            url,
            status,
            reason: e.to_string(),
        })?;

        Ok(ApiResponse::new(status, body))
    }
}
