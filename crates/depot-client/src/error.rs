//! # Client Error Types
//!
//! Error types for gateway calls, the inventory store and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Network      │  │   Validation    │  │      Lookup             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Validation     │  │  NotFound               │ │
//! │  │  Timeout        │  │  (local)        │  │                         │ │
//! │  │  Http           │  │  Rejected       │  │                         │ │
//! │  │                 │  │  (backend 4xx)  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │    Payload      │  │           Configuration                     │  │
//! │  │                 │  │                                             │  │
//! │  │  InvalidPayload │  │  InvalidConfig   InvalidUrl                 │  │
//! │  │                 │  │  ConfigLoadFailed ConfigSaveFailed          │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ClientError` is `Clone`: a load outcome is shared with every caller that
//! was coalesced into the same fetch.

use depot_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every failure a store or gateway operation can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    // =========================================================================
    // Network Errors
    // =========================================================================
    /// Transport failure: connection refused, reset, DNS, TLS.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the client timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-success status not covered by a more specific variant.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Input rejected locally, before any gateway call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Input rejected by the backend (HTTP 400/422).
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// Unknown warehouse, or nothing to select from.
    #[error("Not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The backend answered with data that breaks a domain invariant.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ClientError::Validation(v),
            CoreError::NoWarehouses => ClientError::NotFound(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_decode() {
            ClientError::InvalidPayload(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidPayload(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if repeating the same request may succeed.
    ///
    /// ## Retryable Errors
    /// - Transport failures and timeouts
    /// - 5xx and 429 responses
    ///
    /// ## Non-Retryable Errors
    /// - Validation, rejection, not-found
    /// - Bad payloads and configuration problems
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout(_) => true,
            ClientError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true for the network class (transport, timeout, bad status).
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Timeout(_) | ClientError::Http { .. }
        )
    }

    /// Returns true when the input was rejected, locally or by the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Rejected(_))
    }

    /// Returns true for unknown warehouses and empty selections.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}
