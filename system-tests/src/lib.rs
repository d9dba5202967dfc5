// system-tests/src/lib.rs
// ============================================================================
// Module: Server A System Tests Library
// Description: Shared configuration for Server A contract scenarios.
// Purpose: Provide common settings for the system-test binaries.
// Dependencies: server-a-contract
// ============================================================================

//! ## Overview
//! This crate hosts the configuration shared by the Server A system-test
//! binaries in `system-tests/tests`. The service under test is managed
//! externally; nothing here starts or stops it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
