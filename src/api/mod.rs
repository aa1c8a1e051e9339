//! The API surface the runner talks to.
//!
//! `Transport` is the seam between the step logic and the network: the
//! runner builds `ApiRequest`s and reads `ApiResponse`s, and never sees the
//! HTTP client itself.

pub mod fields;
pub mod http;

use serde_json::Value;

use crate::error::TransportError;

pub use http::HttpTransport;

pub const HEALTH_PATH: &str = "/health";
pub const SEND_CODE_PATH: &str = "/auth/send-verify-code";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const PROFILE_PATH: &str = "/user/profile";
pub const ACTIVITIES_PATH: &str = "/activities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path including any query string, e.g. `/activities?page=1&pageSize=10`.
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Status code plus the decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `message` field, rendered the way it is shown to the operator.
    pub fn message(&self) -> String {
        fields::display(self.body.get("message"))
    }

    /// Body pretty-printed for failure diagnostics.
    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}

/// Sends one request and returns the decoded response.
///
/// Implementations must not retry; every error is surfaced to the caller.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

/// Query string for the activity listing.
pub fn activities_path(page: u32, page_size: u32) -> String {
    format!("{ACTIVITIES_PATH}?page={page}&pageSize={page_size}")
}
