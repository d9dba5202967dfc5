// crates/server-a-contract/src/error.rs
// ============================================================================
// Module: Contract Errors
// Description: Error taxonomy for process API calls and contract checks.
// Purpose: Report transport, status, decode, and expectation failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] covers everything that can go wrong while issuing a process
//! request: bad configuration, an unsendable request, transport failures, an
//! unexpected status on the strict path, and payload decode failures.
//! [`ContractViolation`] is raised when a scenario-level criterion is not met
//! and always carries the expected and actual values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors returned by [`crate::ServerAClient`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - No variant is produced by a retried or recovered call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client configuration is invalid (for example, an unparsable base URL).
    #[error("invalid client config: {0}")]
    InvalidConfig(String),
    /// The request has no user identifier.
    #[error("process request requires a non-empty userId")]
    MissingUserId,
    /// The request could not be serialized.
    #[error("failed to encode process request: {0}")]
    Encode(String),
    /// Connection, DNS, timeout, or body read failure.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// Target URL of the failed exchange.
        url: String,
        /// Transport failure description.
        message: String,
    },
    /// Status code differed from the one required by the strict call path.
    #[error("unexpected status: expected {expected}, got {actual}; body: {body}")]
    UnexpectedStatus {
        /// Required status code.
        expected: u16,
        /// Status code returned by the service.
        actual: u16,
        /// Response body text for diagnosis.
        body: String,
    },
    /// Payload did not match the response model.
    #[error("failed to decode process response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Returns true for connection-level failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true when the strict path rejected the status code.
    #[must_use]
    pub const fn is_status(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. })
    }

    /// Returns true when the payload failed to decode.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

// ============================================================================
// SECTION: Contract Violations
// ============================================================================

/// A scenario-level expectation that was not met.
///
/// # Invariants
/// - `criterion` names the first failing check.
/// - `expected` and `actual` are rendered for human diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{criterion} mismatch: expected {expected}, got {actual}")]
pub struct ContractViolation {
    /// Name of the failing criterion (`status`, `environment`, ...).
    pub criterion: &'static str,
    /// Expected value.
    pub expected: String,
    /// Observed value.
    pub actual: String,
}

impl ContractViolation {
    /// Creates a violation for the named criterion.
    #[must_use]
    pub fn new(
        criterion: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            criterion,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
