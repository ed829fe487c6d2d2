//! RAII guard over one resource-manager session.

use super::adapter::ResourceManager;
use super::error::{Cause, ReleaseError};
use super::types::{ListResponse, ProcessHolder, SessionHandle, SessionKey, ShutdownFlags};
use std::marker::PhantomData;
use std::path::Path;

/// Lifecycle state of a [`Session`].
///
/// A `Session` value only exists once the resource manager has started it,
/// so it begins `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Closed,
}

/// An open resource-manager session.
///
/// The session is ended exactly once: by [`Session::close`], or on drop if
/// it was never closed explicitly. Failing to end it is logged, never
/// returned to the caller of the release attempt.
#[derive(Debug)]
pub struct Session<'m, M: ResourceManager + ?Sized> {
    manager: &'m M,
    handle: SessionHandle,
    key: SessionKey,
    state: SessionState,
    // Sessions stay on the thread that opened them.
    _not_send: PhantomData<*const ()>,
}

impl<'m, M: ResourceManager + ?Sized> Session<'m, M> {
    /// Start a session under `key`.
    pub fn open(manager: &'m M, key: SessionKey) -> Result<Self, ReleaseError> {
        let start = manager
            .start_session(&key)
            .map_err(ReleaseError::StartFailed)?;

        // Keep the requested key if the resource manager did not echo one back.
        let key = if start.key.is_empty() { key } else { start.key };
        tracing::debug!(handle = %start.handle, key = %key, "restart manager session started");

        Ok(Self {
            manager,
            handle: start.handle,
            key,
            state: SessionState::Active,
            _not_send: PhantomData,
        })
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    fn ensure_active(&self) -> Result<(), Cause> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Closed => Err(Cause::SessionClosed),
        }
    }

    /// Register files; later queries cover exactly the registered set.
    pub fn register(&mut self, paths: &[&Path]) -> Result<(), ReleaseError> {
        self.ensure_active().map_err(ReleaseError::RegisterFailed)?;
        if paths.is_empty() {
            return Err(ReleaseError::RegisterFailed(Cause::EmptyResourceList));
        }
        if paths.iter().any(|path| path.as_os_str().is_empty()) {
            return Err(ReleaseError::RegisterFailed(Cause::EmptyPath));
        }

        self.manager
            .register_resources(self.handle, paths)
            .map_err(ReleaseError::RegisterFailed)?;

        tracing::debug!(handle = %self.handle, count = paths.len(), "resources registered");
        Ok(())
    }

    /// List the processes holding the registered files.
    ///
    /// Sizing protocol: ask for the count with no room for records, then ask
    /// again with room for that many. If the count grew in between, size up
    /// and ask again, for at most `attempts` rounds. An empty list means the
    /// files are not locked.
    pub fn query(&self, attempts: u32) -> Result<Vec<ProcessHolder>, ReleaseError> {
        self.ensure_active().map_err(ReleaseError::QueryFailed)?;
        let attempts = attempts.max(1);

        let mut needed = match self.list(0)? {
            ListResponse::Complete(holders) => return Ok(fit(holders, 0)),
            ListResponse::MoreData { needed } => needed,
        };

        for attempt in 1..=attempts {
            if needed == 0 {
                return Ok(Vec::new());
            }
            match self.list(needed)? {
                ListResponse::Complete(holders) => return Ok(fit(holders, needed)),
                ListResponse::MoreData { needed: grown } => {
                    tracing::debug!(
                        handle = %self.handle,
                        attempt,
                        capacity = needed,
                        needed = grown,
                        "holder list grew between sizing calls"
                    );
                    needed = grown;
                }
            }
        }

        Err(ReleaseError::QueryFailed(Cause::ListKeptGrowing { attempts }))
    }

    fn list(&self, capacity: usize) -> Result<ListResponse, ReleaseError> {
        self.manager
            .get_list(self.handle, capacity)
            .map_err(ReleaseError::QueryFailed)
    }

    /// Terminate one holder.
    pub fn shutdown(
        &self,
        holder: &ProcessHolder,
        flags: ShutdownFlags,
    ) -> Result<(), ReleaseError> {
        let shutdown_failed = |cause: Cause| ReleaseError::ShutdownFailed {
            pid: holder.pid,
            cause,
        };

        self.ensure_active().map_err(shutdown_failed)?;
        self.manager
            .shutdown(self.handle, holder, flags)
            .map_err(shutdown_failed)
    }

    /// End the session. Only the first call reaches the resource manager.
    pub fn close(&mut self) -> Result<(), Cause> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;

        let result = self.manager.end_session(self.handle);
        match &result {
            Ok(()) => tracing::debug!(handle = %self.handle, "restart manager session ended"),
            Err(e) => tracing::warn!(
                handle = %self.handle,
                error = %e,
                "failed to end restart manager session"
            ),
        }
        result
    }
}

impl<M: ResourceManager + ?Sized> Drop for Session<'_, M> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Never hand back more records than there was room for.
fn fit(mut holders: Vec<ProcessHolder>, capacity: usize) -> Vec<ProcessHolder> {
    if holders.len() > capacity {
        tracing::warn!(
            returned = holders.len(),
            capacity,
            "resource manager returned more holders than requested; extra entries dropped"
        );
        holders.truncate(capacity);
    }
    holders
}
