// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: server-a-contract
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed, as does a variable that is set
//! but empty. Unset variables fall back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use server_a_contract::ClientConfig;
use server_a_contract::DEFAULT_BASE_URL;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment name the service is expected to report by default.
pub const DEFAULT_EXPECTED_ENVIRONMENT: &str = "qa";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional base URL of the service under test.
    BaseUrl,
    /// Optional expected `X-Environment` header value.
    ExpectedEnvironment,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "SERVER_A_SYSTEM_TEST_BASE_URL",
            Self::ExpectedEnvironment => "SERVER_A_SYSTEM_TEST_EXPECTED_ENV",
            Self::TimeoutSeconds => "SERVER_A_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }

    /// Returns every key, in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::BaseUrl, Self::ExpectedEnvironment, Self::TimeoutSeconds]
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Base URL of the service under test.
    pub base_url: String,
    /// Expected `X-Environment` header value.
    pub expected_environment: String,
    /// Optional timeout override; `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            expected_environment: DEFAULT_EXPECTED_ENVIRONMENT.to_string(),
            timeout: None,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout).
    pub fn load() -> Result<Self, String> {
        let defaults = Self::default();
        let base_url =
            read_env_nonempty(SystemTestEnv::BaseUrl.as_str())?.unwrap_or(defaults.base_url);
        let expected_environment = read_env_nonempty(SystemTestEnv::ExpectedEnvironment.as_str())?
            .unwrap_or(defaults.expected_environment);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        Ok(Self {
            base_url,
            expected_environment,
            timeout,
        })
    }

    /// Maps the settings into a client configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            ..ClientConfig::default()
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
