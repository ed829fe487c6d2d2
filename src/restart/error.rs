//! Failure taxonomy for a lock release attempt.
//!
//! Every failure is collapsed to `false` at the boolean boundary, but the
//! structured reason survives here for logging and for callers that want it.

use super::types::{MAX_SESSION_KEY_LEN, RmStatus};
use thiserror::Error;

/// Why a single step failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// The resource manager returned a non-success status.
    #[error("{0}")]
    Status(RmStatus),

    #[error("session key is {len} UTF-16 code units long (limit is {MAX_SESSION_KEY_LEN})")]
    SessionKeyTooLong { len: usize },

    #[error("no resources to register")]
    EmptyResourceList,

    #[error("resource path is empty")]
    EmptyPath,

    #[error("session is already closed")]
    SessionClosed,

    /// The holder count grew on every sizing round.
    #[error("holder list kept growing after {attempts} sizing attempts")]
    ListKeptGrowing { attempts: u32 },

    /// The process is gone, or its pid now belongs to another process.
    #[error("process exited before it could be terminated")]
    ProcessExited,
}

/// Error returned by a lock release attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("failed to start a restart manager session: {0}")]
    StartFailed(Cause),

    #[error("failed to register the file with the session: {0}")]
    RegisterFailed(Cause),

    #[error("failed to list processes holding the file: {0}")]
    QueryFailed(Cause),

    #[error("failed to terminate process {pid}: {cause}")]
    ShutdownFailed { pid: u32, cause: Cause },

    /// Nothing holds the file. Reported as a failure on purpose.
    #[error("no process is holding the file")]
    NoHoldersFound,
}

impl ReleaseError {
    /// Stable identifier used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ReleaseError::StartFailed(_) => "start_failed",
            ReleaseError::RegisterFailed(_) => "register_failed",
            ReleaseError::QueryFailed(_) => "query_failed",
            ReleaseError::ShutdownFailed { .. } => "shutdown_failed",
            ReleaseError::NoHoldersFound => "no_holders_found",
        }
    }
}
