//! Cookie store discovery for Chromium-family browsers.
//!
//! Each browser keeps one or more user-data roots. A root holds a
//! `Local State` JSON file listing profiles, and each profile directory holds
//! a `Cookies` SQLite file (under `Network/` since Chrome 96).
//!
//! Discovery only builds candidate paths; it never opens the cookie files.
//! Unlocking a discovered store goes through [`crate::restart`].

mod find;
mod local_state;
mod registry;
mod roots;


use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// Re-export public API
pub use find::{LOCAL_STATE_FILE, find_cookie_store_files};
pub use local_state::{Profile, parse_profiles};
pub use registry::{ChromiumFinder, CookieStore, CookieStoreFinder, FinderRegistry};
pub use roots::{default_roots, roots_under};

/// Browsers with a registered finder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Chromium,
    Brave,
    /// Apps embedding Microsoft Edge WebView2; roots come from configuration.
    #[value(name = "webview2")]
    WebView2,
}

impl Browser {
    /// Every browser, in registration order.
    pub const ALL: [Browser; 4] = [
        Browser::Chrome,
        Browser::Chromium,
        Browser::Brave,
        Browser::WebView2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Chromium => "chromium",
            Browser::Brave => "brave",
            Browser::WebView2 => "webview2",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate cookie store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieStoreFile {
    /// Path to the `Cookies` database. May not exist.
    pub path: PathBuf,
    pub browser: Browser,
    /// Human-readable profile name from `Local State`.
    pub profile: String,
    /// Operating system the path was built for.
    pub os: String,
    pub is_default_profile: bool,
}

impl CookieStoreFile {
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
