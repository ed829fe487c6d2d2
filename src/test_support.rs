use crate::restart::{
    Cause, FileTime, ListResponse, ProcessHolder, ResourceManager, SessionHandle, SessionKey,
    SessionStart, ShutdownFlags,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Calls observed by a [`FakeResourceManager`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Calls {
    pub starts: usize,
    pub ends: usize,
    pub keys: Vec<SessionKey>,
    pub registered: Vec<PathBuf>,
    pub list_capacities: Vec<usize>,
    pub shutdowns: Vec<(u32, ShutdownFlags)>,
}

/// Scripted, instrumented stand-in for the Restart Manager.
///
/// `get_list` pops scripted answers in order and answers "nothing held"
/// once the script runs out.
#[derive(Debug, Default)]
pub(crate) struct FakeResourceManager {
    start_error: Option<Cause>,
    register_error: Option<Cause>,
    end_error: Option<Cause>,
    shutdown_errors: HashMap<u32, Cause>,
    blank_echo: bool,
    list_script: RefCell<VecDeque<Result<ListResponse, Cause>>>,
    calls: RefCell<Calls>,
}

impl FakeResourceManager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A file held by `holders`, answered with the usual two-phase exchange.
    pub(crate) fn holding(holders: Vec<ProcessHolder>) -> Self {
        let fake = Self::new();
        if holders.is_empty() {
            return fake.answer(Ok(ListResponse::Complete(Vec::new())));
        }
        fake.answer(Ok(ListResponse::MoreData {
            needed: holders.len(),
        }))
        .answer(Ok(ListResponse::Complete(holders)))
    }

    pub(crate) fn answer(self, response: Result<ListResponse, Cause>) -> Self {
        self.list_script.borrow_mut().push_back(response);
        self
    }

    pub(crate) fn fail_start(mut self, cause: Cause) -> Self {
        self.start_error = Some(cause);
        self
    }

    pub(crate) fn fail_register(mut self, cause: Cause) -> Self {
        self.register_error = Some(cause);
        self
    }

    pub(crate) fn fail_end(mut self, cause: Cause) -> Self {
        self.end_error = Some(cause);
        self
    }

    /// Report an empty session key back from `start_session`.
    pub(crate) fn echo_blank_key(mut self) -> Self {
        self.blank_echo = true;
        self
    }

    pub(crate) fn fail_shutdown(mut self, pid: u32, cause: Cause) -> Self {
        self.shutdown_errors.insert(pid, cause);
        self
    }

    pub(crate) fn calls(&self) -> Calls {
        self.calls.borrow().clone()
    }
}

/// The handle every fake session gets.
pub(crate) const FAKE_HANDLE: SessionHandle = SessionHandle(7);

impl ResourceManager for FakeResourceManager {
    fn start_session(&self, key: &SessionKey) -> Result<SessionStart, Cause> {
        let mut calls = self.calls.borrow_mut();
        calls.keys.push(key.clone());
        if let Some(cause) = &self.start_error {
            return Err(cause.clone());
        }
        calls.starts += 1;
        let echoed = if self.blank_echo {
            SessionKey::from_units(&[])
        } else {
            key.clone()
        };
        Ok(SessionStart {
            handle: FAKE_HANDLE,
            key: echoed,
        })
    }

    fn register_resources(&self, _handle: SessionHandle, files: &[&Path]) -> Result<(), Cause> {
        if let Some(cause) = &self.register_error {
            return Err(cause.clone());
        }
        self.calls
            .borrow_mut()
            .registered
            .extend(files.iter().map(|f| f.to_path_buf()));
        Ok(())
    }

    fn get_list(&self, _handle: SessionHandle, capacity: usize) -> Result<ListResponse, Cause> {
        self.calls.borrow_mut().list_capacities.push(capacity);
        self.list_script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(ListResponse::Complete(Vec::new())))
    }

    fn shutdown(
        &self,
        _handle: SessionHandle,
        holder: &ProcessHolder,
        flags: ShutdownFlags,
    ) -> Result<(), Cause> {
        self.calls.borrow_mut().shutdowns.push((holder.pid, flags));
        match self.shutdown_errors.get(&holder.pid) {
            Some(cause) => Err(cause.clone()),
            None => Ok(()),
        }
    }

    fn end_session(&self, _handle: SessionHandle) -> Result<(), Cause> {
        self.calls.borrow_mut().ends += 1;
        match &self.end_error {
            Some(cause) => Err(cause.clone()),
            None => Ok(()),
        }
    }
}

pub(crate) fn holder(pid: u32, start: u64) -> ProcessHolder {
    ProcessHolder::new(pid, FileTime(start))
}

/// Sets an environment variable for the life of the guard.
///
/// The process environment is global; tests using this must be `#[serial]`.
pub(crate) struct EnvGuard {
    name: OsString,
    original: Option<OsString>,
}

impl EnvGuard {
    pub(crate) fn set(name: &str, value: impl AsRef<OsStr>) -> Self {
        let original = std::env::var_os(name);
        unsafe { std::env::set_var(name, value) };
        Self {
            name: name.into(),
            original,
        }
    }

    pub(crate) fn unset(name: &str) -> Self {
        let original = std::env::var_os(name);
        unsafe { std::env::remove_var(name) };
        Self {
            name: name.into(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(value) => unsafe { std::env::set_var(&self.name, value) },
            None => unsafe { std::env::remove_var(&self.name) },
        }
    }
}
