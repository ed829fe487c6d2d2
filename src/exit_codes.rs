//! Exit code constants for the crumbs CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Lock release failed
//! - 3: No process holds the file
//! - 4: Cookie store discovery failed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// The file lock could not be released.
pub const RELEASE_FAILURE: i32 = 2;

/// Nothing holds the file, so there was no lock to release.
pub const NO_HOLDERS: i32 = 3;

/// Browser profile directories could not be located.
pub const DISCOVERY_FAILURE: i32 = 4;
