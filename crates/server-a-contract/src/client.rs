// crates/server-a-contract/src/client.rs
// ============================================================================
// Module: Server A Client
// Description: Blocking HTTP client for the Server A process endpoint.
// Purpose: Send process requests and return raw or decoded responses.
// Dependencies: reqwest, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`ServerAClient`] wraps a base URL and issues synchronous
//! `POST {base}/api/process` calls. The raw path returns whatever the service
//! replied with; the strict path requires `200` before decoding. The client
//! keeps no per-call state, so one instance can serve concurrent scenarios.
//! Invariants:
//! - No retries, backoff, or cancellation; transport failures surface at once.
//! - Without a configured timeout, the transport default applies.
//! - Response bodies larger than `max_response_bytes` fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::error::ClientError;
use crate::model::ProcessRequest;
use crate::model::ProcessResponse;
use crate::model::RawResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Path of the process endpoint relative to the base URL.
pub const PROCESS_PATH: &str = "/api/process";
/// Response header carrying the service environment name.
pub const ENVIRONMENT_HEADER: &str = "X-Environment";
/// Default upper bound on response body size.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for [`ServerAClient`].
///
/// # Invariants
/// - `base_url` must be an `http` or `https` URL without credentials.
/// - `timeout = None` leaves the transport default in place.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the service under test.
    pub base_url: String,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
    /// Maximum response size accepted, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: "server-a-contract/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Client for the Server A process API.
///
/// # Invariants
/// - The process URL is resolved once at construction.
/// - Sending never mutates the client.
#[derive(Debug, Clone)]
pub struct ServerAClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Resolved process endpoint.
    process_url: Url,
    /// Blocking HTTP client.
    client: Client,
    /// Response size limit.
    max_response_bytes: usize,
}

impl ServerAClient {
    /// Creates a client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] when the URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// Creates a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] when the URL is invalid or the
    /// HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let process_url = resolve_process_url(&base_url)?;
        let client = build_http_client(&config)?;
        Ok(Self {
            base_url,
            process_url,
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the process endpoint URL.
    #[must_use]
    pub const fn process_url(&self) -> &Url {
        &self.process_url
    }

    /// Sends a process request and returns the raw response.
    ///
    /// Non-2xx statuses are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingUserId`] for an empty user identifier,
    /// [`ClientError::Encode`] when the payload cannot be serialized, and
    /// [`ClientError::Transport`] when the exchange fails.
    pub fn send_process_request(
        &self,
        request: &ProcessRequest,
    ) -> Result<RawResponse, ClientError> {
        if request.has_empty_user_id() {
            return Err(ClientError::MissingUserId);
        }
        let payload =
            serde_json::to_value(request).map_err(|err| ClientError::Encode(err.to_string()))?;
        self.exchange(&payload)
    }

    /// Sends a process request, requires status `200`, and decodes the body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] before any decode when the
    /// status is not `200`, [`ClientError::Decode`] when the payload does not
    /// match the model, and any error from [`Self::send_process_request`].
    pub fn send_process_request_and_get_response(
        &self,
        request: &ProcessRequest,
    ) -> Result<ProcessResponse, ClientError> {
        self.send_process_request(request)?.decode_ok()
    }

    /// Returns the `X-Environment` header value, or `None` when absent.
    #[allow(clippy::unused_self, reason = "Header lookup is part of the client surface.")]
    #[must_use]
    pub fn get_environment<'a>(&self, response: &'a RawResponse) -> Option<&'a str> {
        response.header(ENVIRONMENT_HEADER)
    }

    /// Performs one POST and reads the full response.
    fn exchange(&self, payload: &Value) -> Result<RawResponse, ClientError> {
        debug!(url = %self.process_url, "sending process request");
        let mut response =
            self.client.post(self.process_url.clone()).json(payload).send().map_err(|err| {
                warn!(url = %self.process_url, error = %err, "process request failed");
                self.transport_error(err.to_string())
            })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = read_response_limited(&mut response, self.max_response_bytes)
            .map_err(|message| self.transport_error(message))?;
        let raw = RawResponse::new(status, headers, body);
        debug!(
            status = raw.status_code(),
            environment = raw.header(ENVIRONMENT_HEADER).unwrap_or("<absent>"),
            body_bytes = raw.body().len(),
            "process response received"
        );
        Ok(raw)
    }

    /// Builds a transport error for the process URL.
    fn transport_error(&self, message: String) -> ClientError {
        ClientError::Transport {
            url: self.process_url.to_string(),
            message,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the base URL and appends the process path.
fn resolve_process_url(base_url: &str) -> Result<Url, ClientError> {
    let base = Url::parse(base_url)
        .map_err(|err| ClientError::InvalidConfig(format!("invalid base url {base_url}: {err}")))?;
    match base.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidConfig(format!("unsupported url scheme: {other}")));
        }
    }
    if !base.username().is_empty() || base.password().is_some() {
        return Err(ClientError::InvalidConfig("url credentials are not allowed".to_string()));
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(ClientError::InvalidConfig(
            "base url must not carry a query or fragment".to_string(),
        ));
    }
    Url::parse(&format!("{base_url}{PROCESS_PATH}"))
        .map_err(|err| ClientError::InvalidConfig(format!("invalid process url: {err}")))
}

/// Builds the blocking HTTP client.
fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| ClientError::InvalidConfig(format!("http client build failed: {err}")))
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, String> {
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| "response size limit exceeds u64".to_string())?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(format!("response declares {expected} bytes, limit is {max_bytes}"));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| format!("failed to read response body: {err}"))?;
    if buf.len() > max_bytes {
        return Err(format!("response exceeds {max_bytes} bytes"));
    }
    Ok(buf)
}
