//! Value types exchanged with the resource manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::error::Cause;

/// Maximum length of a session key, in UTF-16 code units.
pub const MAX_SESSION_KEY_LEN: usize = 64;

/// What to do with a session key longer than [`MAX_SESSION_KEY_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionKeyPolicy {
    /// Keep the first 64 code units and continue (default).
    #[default]
    Truncate,
    /// Refuse to start the session.
    Reject,
}

/// Opaque handle of an open resource-manager session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub u32);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session key, held as UTF-16 code units without a terminator.
///
/// Always at most [`MAX_SESSION_KEY_LEN`] units long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    units: Vec<u16>,
}

impl SessionKey {
    /// Build a key from text, applying `policy` when it is too long.
    ///
    /// Truncation never splits a surrogate pair: a pair straddling the limit
    /// is dropped whole, so the result may be 63 units long.
    pub fn new(raw: &str, policy: SessionKeyPolicy) -> Result<Self, Cause> {
        let mut units: Vec<u16> = raw.encode_utf16().collect();
        if units.len() <= MAX_SESSION_KEY_LEN {
            return Ok(Self { units });
        }

        match policy {
            SessionKeyPolicy::Reject => Err(Cause::SessionKeyTooLong { len: units.len() }),
            SessionKeyPolicy::Truncate => {
                let mut end = MAX_SESSION_KEY_LEN;
                if is_high_surrogate(units[end - 1]) {
                    end -= 1;
                }
                units.truncate(end);
                Ok(Self { units })
            }
        }
    }

    /// Derive the key for a file path: the path's own text.
    pub fn for_path(path: &Path, policy: SessionKeyPolicy) -> Result<Self, Cause> {
        Self::new(&path.to_string_lossy(), policy)
    }

    /// Build a key from units reported back by the resource manager.
    ///
    /// Stops at the first NUL and at the length limit.
    pub fn from_units(units: &[u16]) -> Self {
        let units = units
            .iter()
            .copied()
            .take_while(|&u| u != 0)
            .take(MAX_SESSION_KEY_LEN)
            .collect();
        Self { units }
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.units))
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Windows FILETIME: 100-nanosecond ticks since 1601-01-01 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct FileTime(pub u64);

/// Ticks between 1601-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i128 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i128 = 10_000_000;

impl FileTime {
    pub fn from_parts(low: u32, high: u32) -> Self {
        Self((u64::from(high) << 32) | u64::from(low))
    }

    /// Convert to a UTC timestamp, if representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let since_unix = i128::from(self.0) - UNIX_EPOCH_TICKS;
        let secs = i64::try_from(since_unix.div_euclid(TICKS_PER_SECOND)).ok()?;
        let nanos = u32::try_from(since_unix.rem_euclid(TICKS_PER_SECOND) * 100).ok()?;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// A process currently holding a registered resource open.
///
/// `pid` and `start_time` together identify the process; the pid alone may
/// have been reused by the time the record is acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessHolder {
    pub pid: u32,
    pub start_time: FileTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

impl ProcessHolder {
    pub fn new(pid: u32, start_time: FileTime) -> Self {
        Self {
            pid,
            start_time,
            app_name: None,
            service_name: None,
        }
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Best human-readable name: application, then service, then pid.
    pub fn label(&self) -> String {
        self.app_name
            .as_deref()
            .or(self.service_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("pid {}", self.pid))
    }
}

impl fmt::Display for ProcessHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pid {})", self.label(), self.pid)
    }
}

/// Flags passed to a shutdown request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownFlags(u32);

impl ShutdownFlags {
    /// Terminate the process without asking it to close.
    pub const FORCE: Self = Self(0x1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Answer to one `get_list` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    /// Every holder fit in the requested capacity.
    Complete(Vec<ProcessHolder>),
    /// The capacity was too small; `needed` entries are required.
    MoreData { needed: usize },
}

/// Win32 status code returned by the resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RmStatus(pub u32);

impl RmStatus {
    pub const SUCCESS: Self = Self(0);
    pub const ACCESS_DENIED: Self = Self(5);
    pub const INVALID_HANDLE: Self = Self(6);
    pub const OUTOFMEMORY: Self = Self(14);
    pub const WRITE_FAULT: Self = Self(29);
    pub const NOT_SUPPORTED: Self = Self(50);
    pub const INVALID_PARAMETER: Self = Self(87);
    pub const CALL_NOT_IMPLEMENTED: Self = Self(120);
    pub const SEM_TIMEOUT: Self = Self(121);
    pub const BAD_ARGUMENTS: Self = Self(160);
    pub const MORE_DATA: Self = Self(234);
    pub const FAIL_NOACTION_REBOOT: Self = Self(350);
    pub const FAIL_SHUTDOWN: Self = Self(351);
    pub const MAX_SESSIONS_REACHED: Self = Self(353);
    pub const CANCELLED: Self = Self(1223);

    pub fn code(self) -> u32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Symbolic name for the codes the resource manager documents.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "ERROR_SUCCESS",
            Self::ACCESS_DENIED => "ERROR_ACCESS_DENIED",
            Self::INVALID_HANDLE => "ERROR_INVALID_HANDLE",
            Self::OUTOFMEMORY => "ERROR_OUTOFMEMORY",
            Self::WRITE_FAULT => "ERROR_WRITE_FAULT",
            Self::NOT_SUPPORTED => "ERROR_NOT_SUPPORTED",
            Self::INVALID_PARAMETER => "ERROR_INVALID_PARAMETER",
            Self::CALL_NOT_IMPLEMENTED => "ERROR_CALL_NOT_IMPLEMENTED",
            Self::SEM_TIMEOUT => "ERROR_SEM_TIMEOUT",
            Self::BAD_ARGUMENTS => "ERROR_BAD_ARGUMENTS",
            Self::MORE_DATA => "ERROR_MORE_DATA",
            Self::FAIL_NOACTION_REBOOT => "ERROR_FAIL_NOACTION_REBOOT",
            Self::FAIL_SHUTDOWN => "ERROR_FAIL_SHUTDOWN",
            Self::MAX_SESSIONS_REACHED => "ERROR_MAX_SESSIONS_REACHED",
            Self::CANCELLED => "ERROR_CANCELLED",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for RmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "error code {}", self.0),
        }
    }
}
