//! One-shot lock release: open, register, query, terminate, close.

use super::adapter::ResourceManager;
use super::error::ReleaseError;
use super::session::Session;
use super::types::{ProcessHolder, SessionKey, SessionKeyPolicy, ShutdownFlags};
use std::path::Path;

/// Default number of sizing rounds when listing holders.
pub const DEFAULT_QUERY_ATTEMPTS: u32 = 3;

/// Tunables for a release attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub key_policy: SessionKeyPolicy,
    pub query_attempts: u32,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            key_policy: SessionKeyPolicy::default(),
            query_attempts: DEFAULT_QUERY_ATTEMPTS,
        }
    }
}

/// A successful release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Released {
    /// The holder that was terminated.
    pub holder: ProcessHolder,
    /// Other holders of the same file. They were left running.
    pub untouched: Vec<ProcessHolder>,
}

/// Release the lock on `path` with default options.
///
/// Returns `true` only if a holder was terminated. A file nobody holds
/// yields `false`, the same as any failure.
pub fn release_file_lock<M: ResourceManager + ?Sized>(manager: &M, path: &Path) -> bool {
    release_file_lock_with(manager, path, &ReleaseOptions::default())
}

/// Boolean form of [`try_release_file_lock`]; the failure reason is logged.
pub fn release_file_lock_with<M: ResourceManager + ?Sized>(
    manager: &M,
    path: &Path,
    options: &ReleaseOptions,
) -> bool {
    match try_release_file_lock(manager, path, options) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                kind = e.kind(),
                error = %e,
                "file lock not released"
            );
            false
        }
    }
}

/// Release the lock on `path`, reporting why it failed.
///
/// Only the first holder listed is terminated. The session is always ended
/// before returning, once it has been opened.
pub fn try_release_file_lock<M: ResourceManager + ?Sized>(
    manager: &M,
    path: &Path,
    options: &ReleaseOptions,
) -> Result<Released, ReleaseError> {
    let key = SessionKey::for_path(path, options.key_policy).map_err(ReleaseError::StartFailed)?;
    let mut session = Session::open(manager, key)?;

    let outcome = terminate_first_holder(&mut session, path, options);

    // A failed close is logged by the session and does not change the outcome.
    let _ = session.close();
    outcome
}

fn terminate_first_holder<M: ResourceManager + ?Sized>(
    session: &mut Session<'_, M>,
    path: &Path,
    options: &ReleaseOptions,
) -> Result<Released, ReleaseError> {
    session.register(&[path])?;

    let mut holders = session.query(options.query_attempts)?.into_iter();
    let holder = holders.next().ok_or(ReleaseError::NoHoldersFound)?;
    let untouched: Vec<ProcessHolder> = holders.collect();

    if !untouched.is_empty() {
        let pids: Vec<u32> = untouched.iter().map(|h| h.pid).collect();
        tracing::warn!(
            path = %path.display(),
            terminating = holder.pid,
            untouched = ?pids,
            "file has several holders; only the first is terminated"
        );
    }

    session.shutdown(&holder, ShutdownFlags::FORCE)?;
    tracing::info!(
        path = %path.display(),
        session = %session.key(),
        pid = holder.pid,
        holder = %holder.label(),
        "terminated process holding file"
    );

    Ok(Released { holder, untouched })
}
