//! File-lock release through the Windows Restart Manager.
//!
//! A release attempt is one short-lived session:
//!
//! 1. start a session keyed by the file path
//! 2. register the file as a resource
//! 3. list the processes holding it (two-phase buffer sizing)
//! 4. terminate the first holder
//! 5. end the session, whatever happened before
//!
//! # Adapter
//!
//! Session logic talks to the OS only through [`ResourceManager`].
//! [`RestartManager`] is the real binding; tests substitute a fake. Build the
//! adapter once and pass it down; it carries no state.
//!
//! # Results
//!
//! [`release_file_lock`] returns a plain `bool`. "Nobody holds the file"
//! is `false` too. It is the entry point for library callers such as
//! cookie readers; the CLI commands use [`try_release_file_lock`] so they
//! can report the reason.
//!
//! # Limitations
//!
//! Only the first holder is terminated even when several processes hold the
//! file; the others are reported in [`Released::untouched`]. Calls block
//! until the OS answers and cannot be cancelled.

mod adapter;
mod error;
mod native;
mod release;
mod session;
mod types;


// Re-export public API
pub use adapter::{ResourceManager, SessionStart};
pub use error::{Cause, ReleaseError};
pub use native::RestartManager;
pub use release::{
    DEFAULT_QUERY_ATTEMPTS, ReleaseOptions, Released, release_file_lock, release_file_lock_with,
    try_release_file_lock,
};
pub use session::Session;
pub use types::{
    FileTime, ListResponse, MAX_SESSION_KEY_LEN, ProcessHolder, RmStatus, SessionHandle,
    SessionKey, SessionKeyPolicy, ShutdownFlags,
};
