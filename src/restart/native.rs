//! Binding to the Windows Restart Manager (`rstrtmgr.dll`).
//!
//! The four session entry points map one-to-one onto `RmStartSession`,
//! `RmRegisterResources`, `RmGetList` and `RmEndSession`. Shutdown targets a
//! single holder: `RmShutdown` would stop every process using the registered
//! files, so the process is opened directly, its creation time compared with
//! the holder record, and only then terminated.
//!
//! On other platforms every entry point reports
//! `ERROR_CALL_NOT_IMPLEMENTED`, so release attempts fail at session start.

use super::adapter::{ResourceManager, SessionStart};
use super::error::Cause;
use super::types::{
    ListResponse, ProcessHolder, RmStatus, SessionHandle, SessionKey, ShutdownFlags,
};
use std::path::Path;

/// The system resource manager.
///
/// Stateless; construct it once and pass it to whatever needs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RestartManager {
    _private: (),
}

impl RestartManager {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(windows)]
mod ffi {
    #![allow(non_snake_case, non_camel_case_types)]

    use std::ffi::c_void;

    pub const CCH_RM_MAX_APP_NAME: usize = 255;
    pub const CCH_RM_MAX_SVC_NAME: usize = 63;

    pub const PROCESS_TERMINATE: u32 = 0x0001;
    pub const PROCESS_QUERY_LIMITED_INFORMATION: u32 = 0x1000;

    pub type HANDLE = *mut c_void;

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    pub struct FILETIME {
        pub dwLowDateTime: u32,
        pub dwHighDateTime: u32,
    }

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    pub struct RM_UNIQUE_PROCESS {
        pub dwProcessId: u32,
        pub ProcessStartTime: FILETIME,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    pub struct RM_PROCESS_INFO {
        pub Process: RM_UNIQUE_PROCESS,
        pub strAppName: [u16; CCH_RM_MAX_APP_NAME + 1],
        pub strServiceShortName: [u16; CCH_RM_MAX_SVC_NAME + 1],
        pub ApplicationType: i32,
        pub AppStatus: u32,
        pub TSSessionId: u32,
        pub bRestartable: i32,
    }

    impl RM_PROCESS_INFO {
        pub const EMPTY: Self = Self {
            Process: RM_UNIQUE_PROCESS {
                dwProcessId: 0,
                ProcessStartTime: FILETIME {
                    dwLowDateTime: 0,
                    dwHighDateTime: 0,
                },
            },
            strAppName: [0; CCH_RM_MAX_APP_NAME + 1],
            strServiceShortName: [0; CCH_RM_MAX_SVC_NAME + 1],
            ApplicationType: 0,
            AppStatus: 0,
            TSSessionId: 0,
            bRestartable: 0,
        };
    }

    #[link(name = "rstrtmgr")]
    unsafe extern "system" {
        pub fn RmStartSession(
            pSessionHandle: *mut u32,
            dwSessionFlags: u32,
            strSessionKey: *mut u16,
        ) -> u32;

        pub fn RmRegisterResources(
            dwSessionHandle: u32,
            nFiles: u32,
            rgsFileNames: *const *const u16,
            nApplications: u32,
            rgApplications: *const RM_UNIQUE_PROCESS,
            nServices: u32,
            rgsServiceNames: *const *const u16,
        ) -> u32;

        pub fn RmGetList(
            dwSessionHandle: u32,
            pnProcInfoNeeded: *mut u32,
            pnProcInfo: *mut u32,
            rgAffectedApps: *mut RM_PROCESS_INFO,
            lpdwRebootReasons: *mut u32,
        ) -> u32;

        pub fn RmEndSession(dwSessionHandle: u32) -> u32;
    }

    #[link(name = "kernel32")]
    unsafe extern "system" {
        pub fn OpenProcess(dwDesiredAccess: u32, bInheritHandle: i32, dwProcessId: u32) -> HANDLE;

        pub fn GetProcessTimes(
            hProcess: HANDLE,
            lpCreationTime: *mut FILETIME,
            lpExitTime: *mut FILETIME,
            lpKernelTime: *mut FILETIME,
            lpUserTime: *mut FILETIME,
        ) -> i32;

        pub fn TerminateProcess(hProcess: HANDLE, uExitCode: u32) -> i32;

        pub fn CloseHandle(hObject: HANDLE) -> i32;

        pub fn GetLastError() -> u32;
    }
}

#[cfg(windows)]
mod imp {
    use super::ffi;
    use super::*;
    use crate::restart::types::{FileTime, MAX_SESSION_KEY_LEN};
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;

    /// Exit code given to terminated holders.
    const TERMINATED_EXIT_CODE: u32 = 1;

    fn check(status: u32) -> Result<(), Cause> {
        let status = RmStatus(status);
        if status.is_success() {
            Ok(())
        } else {
            Err(Cause::Status(status))
        }
    }

    fn last_error() -> RmStatus {
        RmStatus(unsafe { ffi::GetLastError() })
    }

    fn to_wide(path: &Path) -> Vec<u16> {
        path.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    fn from_wide(units: &[u16]) -> Option<String> {
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
        if end == 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&units[..end]))
    }

    impl From<&ffi::RM_PROCESS_INFO> for ProcessHolder {
        fn from(info: &ffi::RM_PROCESS_INFO) -> Self {
            let start = info.Process.ProcessStartTime;
            ProcessHolder {
                pid: info.Process.dwProcessId,
                start_time: FileTime::from_parts(start.dwLowDateTime, start.dwHighDateTime),
                app_name: from_wide(&info.strAppName),
                service_name: from_wide(&info.strServiceShortName),
            }
        }
    }

    /// Process handle closed on drop.
    struct OwnedProcess(ffi::HANDLE);

    impl OwnedProcess {
        fn open(pid: u32) -> Result<Self, Cause> {
            let access = ffi::PROCESS_TERMINATE | ffi::PROCESS_QUERY_LIMITED_INFORMATION;
            let handle = unsafe { ffi::OpenProcess(access, 0, pid) };
            if handle.is_null() {
                // OpenProcess reports a pid with no live process as an invalid parameter.
                return Err(match last_error() {
                    RmStatus::INVALID_PARAMETER => Cause::ProcessExited,
                    status => Cause::Status(status),
                });
            }
            Ok(Self(handle))
        }

        fn creation_time(&self) -> Result<FileTime, Cause> {
            let mut creation = ffi::FILETIME::default();
            let mut exit = ffi::FILETIME::default();
            let mut kernel = ffi::FILETIME::default();
            let mut user = ffi::FILETIME::default();
            let ok = unsafe {
                ffi::GetProcessTimes(self.0, &mut creation, &mut exit, &mut kernel, &mut user)
            };
            if ok == 0 {
                return Err(Cause::Status(last_error()));
            }
            Ok(FileTime::from_parts(
                creation.dwLowDateTime,
                creation.dwHighDateTime,
            ))
        }

        fn terminate(&self) -> Result<(), Cause> {
            let ok = unsafe { ffi::TerminateProcess(self.0, TERMINATED_EXIT_CODE) };
            if ok == 0 {
                return Err(Cause::Status(last_error()));
            }
            Ok(())
        }
    }

    impl Drop for OwnedProcess {
        fn drop(&mut self) {
            unsafe {
                ffi::CloseHandle(self.0);
            }
        }
    }

    impl ResourceManager for RestartManager {
        fn start_session(&self, key: &SessionKey) -> Result<SessionStart, Cause> {
            // The resource manager overwrites this buffer with the key it assigns.
            let mut buffer = [0u16; MAX_SESSION_KEY_LEN + 1];
            buffer[..key.len()].copy_from_slice(key.as_units());

            let mut handle = 0u32;
            check(unsafe { ffi::RmStartSession(&mut handle, 0, buffer.as_mut_ptr()) })?;

            Ok(SessionStart {
                handle: SessionHandle(handle),
                key: SessionKey::from_units(&buffer),
            })
        }

        fn register_resources(&self, handle: SessionHandle, files: &[&Path]) -> Result<(), Cause> {
            let wide: Vec<Vec<u16>> = files.iter().map(|path| to_wide(path)).collect();
            let pointers: Vec<*const u16> = wide.iter().map(|w| w.as_ptr()).collect();
            let count = u32::try_from(pointers.len())
                .map_err(|_| Cause::Status(RmStatus::BAD_ARGUMENTS))?;

            check(unsafe {
                ffi::RmRegisterResources(
                    handle.0,
                    count,
                    pointers.as_ptr(),
                    0,
                    ptr::null(),
                    0,
                    ptr::null(),
                )
            })
        }

        fn get_list(&self, handle: SessionHandle, capacity: usize) -> Result<ListResponse, Cause> {
            let mut buffer = vec![ffi::RM_PROCESS_INFO::EMPTY; capacity];
            let mut needed = 0u32;
            let mut filled =
                u32::try_from(capacity).map_err(|_| Cause::Status(RmStatus::BAD_ARGUMENTS))?;
            let mut reboot_reasons = 0u32;
            let apps = if capacity == 0 {
                ptr::null_mut()
            } else {
                buffer.as_mut_ptr()
            };

            let status = RmStatus(unsafe {
                ffi::RmGetList(
                    handle.0,
                    &mut needed,
                    &mut filled,
                    apps,
                    &mut reboot_reasons,
                )
            });
            if status == RmStatus::MORE_DATA {
                return Ok(ListResponse::MoreData {
                    needed: needed as usize,
                });
            }
            check(status.code())?;

            let filled = (filled as usize).min(capacity);
            Ok(ListResponse::Complete(
                buffer[..filled].iter().map(ProcessHolder::from).collect(),
            ))
        }

        fn shutdown(
            &self,
            _handle: SessionHandle,
            holder: &ProcessHolder,
            flags: ShutdownFlags,
        ) -> Result<(), Cause> {
            if !flags.contains(ShutdownFlags::FORCE) {
                return Err(Cause::Status(RmStatus::NOT_SUPPORTED));
            }

            let process = OwnedProcess::open(holder.pid)?;
            if process.creation_time()? != holder.start_time {
                return Err(Cause::ProcessExited);
            }
            process.terminate()
        }

        fn end_session(&self, handle: SessionHandle) -> Result<(), Cause> {
            check(unsafe { ffi::RmEndSession(handle.0) })
        }
    }
}

#[cfg(not(windows))]
impl ResourceManager for RestartManager {
    fn start_session(&self, _key: &SessionKey) -> Result<SessionStart, Cause> {
        Err(Cause::Status(RmStatus::CALL_NOT_IMPLEMENTED))
    }

    fn register_resources(&self, _handle: SessionHandle, _files: &[&Path]) -> Result<(), Cause> {
        Err(Cause::Status(RmStatus::CALL_NOT_IMPLEMENTED))
    }

    fn get_list(&self, _handle: SessionHandle, _capacity: usize) -> Result<ListResponse, Cause> {
        Err(Cause::Status(RmStatus::CALL_NOT_IMPLEMENTED))
    }

    fn shutdown(
        &self,
        _handle: SessionHandle,
        _holder: &ProcessHolder,
        _flags: ShutdownFlags,
    ) -> Result<(), Cause> {
        Err(Cause::Status(RmStatus::CALL_NOT_IMPLEMENTED))
    }

    fn end_session(&self, _handle: SessionHandle) -> Result<(), Cause> {
        Err(Cause::Status(RmStatus::CALL_NOT_IMPLEMENTED))
    }
}
