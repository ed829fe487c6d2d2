//! Error types for the crumbs CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use crate::restart::ReleaseError;
use thiserror::Error;

/// Main error type for crumbs operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum CrumbsError {
    /// User provided invalid arguments.
    #[error("{0}")]
    UserError(String),

    /// The configuration file could not be read or is invalid.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Browser profile directories could not be located.
    #[error("Cookie store discovery failed: {0}")]
    DiscoveryError(String),

    /// A file lock could not be released.
    #[error("Lock release failed: {0}")]
    Release(#[from] ReleaseError),
}

impl CrumbsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrumbsError::UserError(_) => exit_codes::USER_ERROR,
            CrumbsError::ConfigError(_) => exit_codes::USER_ERROR,
            CrumbsError::DiscoveryError(_) => exit_codes::DISCOVERY_FAILURE,
            CrumbsError::Release(ReleaseError::NoHoldersFound) => exit_codes::NO_HOLDERS,
            CrumbsError::Release(_) => exit_codes::RELEASE_FAILURE,
        }
    }
}

/// Result type alias for crumbs operations.
pub type Result<T> = std::result::Result<T, CrumbsError>;
