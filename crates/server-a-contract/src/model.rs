// crates/server-a-contract/src/model.rs
// ============================================================================
// Module: Process API Model
// Description: Request, response, and raw exchange types for the process API.
// Purpose: Define the wire contract shared by the client and test scenarios.
// Dependencies: reqwest, serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`ProcessRequest`] is the unit of work submitted to `POST /api/process`.
//! [`ProcessResponse`] is decoded from the service reply and tolerates unknown
//! keys. [`RawResponse`] keeps the full exchange result (status, headers, and
//! body) so callers can inspect it before, or instead of, decoding.
//! Invariants:
//! - Wire field names are camelCase; absent optional request fields are omitted.
//! - `result` and `success` are required on decode; incompatible types fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;
use serde::de::Visitor;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ClientError;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Process request submitted to the service under test.
///
/// # Invariants
/// - No validation happens here; an empty `query` is valid and sent unchanged.
/// - `user_id` must be non-empty before sending (checked by the client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Identifier of the requesting user.
    pub user_id: String,
    /// Free-text query.
    pub query: String,
    /// Optional RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Optional caller-chosen request identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Optional version tag of the calling server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
}

impl ProcessRequest {
    /// Creates a request with no optional metadata.
    #[must_use]
    pub fn new(user_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            query: query.into(),
            timestamp: None,
            request_id: None,
            server_version: None,
        }
    }

    /// Attaches a timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Stamps the request with the current UTC time in RFC 3339 format.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encode`] when the clock value cannot be formatted.
    pub fn with_current_timestamp(self) -> Result<Self, ClientError> {
        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| ClientError::Encode(format!("timestamp formatting failed: {err}")))?;
        Ok(self.with_timestamp(now))
    }

    /// Attaches a request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attaches a server version tag.
    #[must_use]
    pub fn with_server_version(mut self, server_version: impl Into<String>) -> Self {
        self.server_version = Some(server_version.into());
        self
    }

    /// Returns true when the user identifier is empty.
    #[must_use]
    pub fn has_empty_user_id(&self) -> bool {
        self.user_id.is_empty()
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Process response decoded from the service payload.
///
/// # Invariants
/// - Unknown payload keys are ignored.
/// - `success` accepts booleans, the strings `true`, `True`, `TRUE`, `false`,
///   `False`, `FALSE`, and `0`/`1`; anything else (including `null`) is a
///   decode failure.
/// - `request_id` is read from `requestId`, else from a string `request_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WirePayload")]
pub struct ProcessResponse {
    /// Result text produced by the service.
    pub result: String,
    /// Whether the service processed the request successfully.
    pub success: bool,
    /// Service-issued request identifier, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Payload shape as emitted by either service flavor.
#[derive(Deserialize)]
struct WirePayload {
    /// Result text.
    result: String,
    /// Boolean-like success flag.
    #[serde(deserialize_with = "deserialize_boolean_like")]
    success: bool,
    /// camelCase request identifier.
    #[serde(default, rename = "requestId")]
    request_id: Option<String>,
    /// snake_case request identifier; non-string values are dropped.
    #[serde(default, rename = "request_id", deserialize_with = "deserialize_string_or_none")]
    snake_request_id: Option<String>,
}

impl From<WirePayload> for ProcessResponse {
    fn from(wire: WirePayload) -> Self {
        Self {
            result: wire.result,
            success: wire.success,
            request_id: wire.request_id.or(wire.snake_request_id),
        }
    }
}

impl ProcessResponse {
    /// Decodes a response from raw payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the payload is not a compatible
    /// JSON object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClientError> {
        serde_json::from_slice(bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Decodes a response from payload text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the payload is not a compatible
    /// JSON object.
    pub fn from_json_str(text: &str) -> Result<Self, ClientError> {
        Self::from_slice(text.as_bytes())
    }
}

/// Accepts boolean-like JSON scalars for `success`.
fn deserialize_boolean_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(BooleanLikeVisitor)
}

/// Keeps string values and drops everything else.
fn deserialize_string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Visitor backing [`deserialize_boolean_like`].
struct BooleanLikeVisitor;

impl Visitor<'_> for BooleanLikeVisitor {
    type Value = bool;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a boolean, a true/false string, or 0/1")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Unsigned(value), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Signed(value), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
        match value {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        }
    }
}

// ============================================================================
// SECTION: Raw Response
// ============================================================================

/// Unmediated HTTP reply: status, headers, and fully-read body.
///
/// # Invariants
/// - The body is read completely before the value is handed out.
/// - Readers never mutate the exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    status: StatusCode,
    /// Response headers.
    headers: HeaderMap,
    /// Response body bytes.
    body: Vec<u8>,
}

impl RawResponse {
    /// Creates a raw response from its parts.
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a number.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns all response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value, or `None` when absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decodes the body into a [`ProcessResponse`] regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the body does not match the model.
    pub fn decode(&self) -> Result<ProcessResponse, ClientError> {
        ProcessResponse::from_slice(&self.body)
    }

    /// Requires status `200`, then decodes the body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] before any decode when the
    /// status is not `200`, and [`ClientError::Decode`] when the body does not
    /// match the model.
    pub fn decode_ok(&self) -> Result<ProcessResponse, ClientError> {
        if self.status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                expected: StatusCode::OK.as_u16(),
                actual: self.status.as_u16(),
                body: self.body_text().into_owned(),
            });
        }
        self.decode()
    }
}
