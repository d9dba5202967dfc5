// crates/server-a-contract/src/expectations.rs
// ============================================================================
// Module: Response Expectations
// Description: Independent contract criteria checked against a raw response.
// Purpose: Verify status, environment header, payload shape, and content.
// Dependencies: crate::model, crate::error
// ============================================================================

//! ## Overview
//! A [`ResponseExpectation`] lists what a scenario requires of a reply. The
//! criteria are checked in a fixed order (status, environment header, payload
//! decode, success flag, result substring) and verification stops at the first
//! failure, reporting expected and actual values. Unset criteria are skipped,
//! so a scenario asserts only what it cares about.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::StatusCode;

use crate::client::ENVIRONMENT_HEADER;
use crate::error::ContractViolation;
use crate::model::ProcessResponse;
use crate::model::RawResponse;

// ============================================================================
// SECTION: Expectation
// ============================================================================

/// Contract criteria for a process response.
///
/// # Invariants
/// - `status` is always checked and is checked before anything else.
/// - The payload is decoded only after the status and header checks pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseExpectation {
    /// Required status code.
    pub status: u16,
    /// Required `X-Environment` header value.
    pub environment: Option<String>,
    /// Required `success` flag.
    pub success: Option<bool>,
    /// Substring the `result` text must contain.
    pub result_contains: Option<String>,
}

impl Default for ResponseExpectation {
    fn default() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            environment: None,
            success: None,
            result_contains: None,
        }
    }
}

impl ResponseExpectation {
    /// Requires status `200` and `success == true`.
    #[must_use]
    pub fn successful() -> Self {
        Self {
            success: Some(true),
            ..Self::default()
        }
    }

    /// Requires a specific status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Requires the `X-Environment` header to equal `environment`.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Requires the `result` text to contain `needle`.
    #[must_use]
    pub fn with_result_containing(mut self, needle: impl Into<String>) -> Self {
        self.result_contains = Some(needle.into());
        self
    }

    /// Verifies `response` and returns the decoded payload on success.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContractViolation`] encountered.
    pub fn verify(&self, response: &RawResponse) -> Result<ProcessResponse, ContractViolation> {
        if response.status_code() != self.status {
            return Err(ContractViolation::new(
                "status",
                self.status.to_string(),
                response.status_code().to_string(),
            ));
        }
        if let Some(expected) = &self.environment {
            let actual = response.header(ENVIRONMENT_HEADER);
            if actual != Some(expected.as_str()) {
                return Err(ContractViolation::new(
                    "environment",
                    expected.clone(),
                    actual.unwrap_or("<absent>"),
                ));
            }
        }
        let decoded = response.decode().map_err(|err| {
            ContractViolation::new("payload", "a process response object", err.to_string())
        })?;
        if let Some(expected) = self.success
            && decoded.success != expected
        {
            return Err(ContractViolation::new(
                "success",
                expected.to_string(),
                decoded.success.to_string(),
            ));
        }
        if let Some(needle) = &self.result_contains
            && !decoded.result.contains(needle.as_str())
        {
            return Err(ContractViolation::new(
                "result",
                format!("text containing \"{needle}\""),
                format!("\"{}\"", decoded.result),
            ));
        }
        Ok(decoded)
    }
}
