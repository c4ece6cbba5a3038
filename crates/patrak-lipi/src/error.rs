//! # Lipi Error Types
//!
//! Error types for transliteration configuration and the external backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Lipi Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Backend       │  │     Transport           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  BackendDisabled│  │  Http                   │ │
//! │  │  InvalidUrl     │  │  LoadFailed     │  │  BackendRejected        │ │
//! │  │  ConfigLoad/Save│  │  Load/CallTimeout │ InvalidResponse        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  None of these reach the invoice: the engine logs them and falls back   │
//! │  to the local phonetic rules.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for lipi operations.
pub type LipiResult<T> = Result<T, LipiError>;

/// Error type for configuration loading and backend access.
#[derive(Debug, Clone, Error)]
pub enum LipiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid lipi configuration.
    #[error("Invalid transliteration configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// No backend is configured, or there is no async runtime to load it on.
    #[error("Transliteration backend is disabled")]
    BackendDisabled,

    /// Loading the backend failed. Terminal for the process lifetime.
    #[error("Transliteration backend failed to load: {0}")]
    LoadFailed(String),

    /// The caller stopped waiting for the shared load.
    #[error("Transliteration backend not ready after {0} ms")]
    LoadTimeout(u64),

    /// A single transliteration call took too long.
    #[error("Transliteration call timed out after {0} ms")]
    CallTimeout(u64),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("Backend rejected request with status {status}: {body}")]
    BackendRejected { status: u16, body: String },

    /// The backend answered with something we could not read.
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for LipiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LipiError::InvalidResponse(err.to_string())
        } else {
            LipiError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LipiError {
    fn from(err: serde_json::Error) -> Self {
        LipiError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for LipiError {
    fn from(err: std::io::Error) -> Self {
        LipiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for LipiError {
    fn from(err: toml::de::Error) -> Self {
        LipiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for LipiError {
    fn from(err: toml::ser::Error) -> Self {
        LipiError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl LipiError {
    /// Returns true if this error came from the external backend or the
    /// transport to it.
    ///
    /// These are logged at debug level and answered with the phonetic
    /// fallback.
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            LipiError::BackendDisabled
                | LipiError::LoadFailed(_)
                | LipiError::LoadTimeout(_)
                | LipiError::CallTimeout(_)
                | LipiError::Http(_)
                | LipiError::BackendRejected { .. }
                | LipiError::InvalidResponse(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LipiError::InvalidConfig(_)
                | LipiError::InvalidUrl(_)
                | LipiError::ConfigLoadFailed(_)
                | LipiError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if a later caller may still succeed.
    ///
    /// A timed-out wait leaves the shared load running; a failed load does
    /// not come back.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LipiError::LoadTimeout(_) | LipiError::CallTimeout(_) | LipiError::Http(_)
        )
    }
}
