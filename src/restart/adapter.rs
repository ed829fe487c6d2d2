//! The seam between session logic and the operating system.

use super::error::Cause;
use super::types::{ListResponse, ProcessHolder, SessionHandle, SessionKey, ShutdownFlags};
use std::path::Path;

/// Result of starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    pub handle: SessionHandle,
    /// Key as reported back by the resource manager.
    pub key: SessionKey,
}

/// The five resource-manager entry points a release attempt needs.
///
/// Implemented by [`RestartManager`](super::RestartManager) for the real
/// system and by an instrumented fake in tests. Implementations hold no
/// per-session state; the handle is passed on every call.
pub trait ResourceManager {
    /// Open a new session.
    fn start_session(&self, key: &SessionKey) -> Result<SessionStart, Cause>;

    /// Register files as resources of the session.
    fn register_resources(&self, handle: SessionHandle, files: &[&Path]) -> Result<(), Cause>;

    /// List processes holding the registered resources.
    ///
    /// `capacity` is how many records the caller can accept; zero asks only
    /// for the required count.
    fn get_list(&self, handle: SessionHandle, capacity: usize) -> Result<ListResponse, Cause>;

    /// Terminate one holder.
    fn shutdown(
        &self,
        handle: SessionHandle,
        holder: &ProcessHolder,
        flags: ShutdownFlags,
    ) -> Result<(), Cause>;

    /// Close the session.
    fn end_session(&self, handle: SessionHandle) -> Result<(), Cause>;
}
