// crates/server-a-contract/src/lib.rs
// ============================================================================
// Module: Server A Contract
// Description: Request/response contract model and client for the process API.
// Purpose: Provide typed access to `POST /api/process` for contract tests.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate models the Server A process API contract: the request a caller
//! submits, the response the service returns, and the raw HTTP exchange in
//! between. [`ServerAClient`] sends requests synchronously and either hands
//! back the [`RawResponse`] untouched or enforces a `200` status and decodes
//! a [`ProcessResponse`]. [`ResponseExpectation`] bundles the independent
//! criteria (status, environment header, payload shape, payload content) a
//! test scenario verifies.
//! Invariants:
//! - Non-2xx statuses are never treated as errors by the raw send path.
//! - Response decoding ignores unknown keys but never defaults typed fields.
//! - No request is retried; every failure is surfaced to the caller.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod expectations;
pub mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientConfig;
pub use client::DEFAULT_BASE_URL;
pub use client::ENVIRONMENT_HEADER;
pub use client::PROCESS_PATH;
pub use client::ServerAClient;
pub use error::ClientError;
pub use error::ContractViolation;
pub use expectations::ResponseExpectation;
pub use model::ProcessRequest;
pub use model::ProcessResponse;
pub use model::RawResponse;
