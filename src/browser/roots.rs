//! Default user-data roots per browser and operating system.

use super::Browser;
use crate::error::{CrumbsError, Result};
use std::path::{Path, PathBuf};

/// Roots for `browser` on `os`, relative to the platform base directory.
///
/// `base` is `%LOCALAPPDATA%` on Windows, `~/Library/Application Support`
/// on macOS and `~/.config` elsewhere. WebView2 has no fixed location.
pub fn roots_under(browser: Browser, os: &str, base: &Path) -> Vec<PathBuf> {
    let segments: &[&str] = match (browser, os) {
        (Browser::WebView2, _) => return Vec::new(),
        (Browser::Chrome, "windows") => &["Google", "Chrome", "User Data"],
        (Browser::Chrome, "macos") => &["Google", "Chrome"],
        (Browser::Chrome, _) => &["google-chrome"],
        (Browser::Chromium, "windows") => &["Chromium", "User Data"],
        (Browser::Chromium, "macos") => &["Chromium"],
        (Browser::Chromium, _) => &["chromium"],
        (Browser::Brave, "windows") => &["BraveSoftware", "Brave-Browser", "User Data"],
        (Browser::Brave, _) => &["BraveSoftware", "Brave-Browser"],
    };

    vec![segments.iter().fold(base.to_path_buf(), |p, s| p.join(s))]
}

/// Roots for `browser` on the running system.
pub fn default_roots(browser: Browser) -> Result<Vec<PathBuf>> {
    if browser == Browser::WebView2 {
        return Ok(Vec::new());
    }

    let os = std::env::consts::OS;
    let base = if os == "windows" {
        dirs::data_local_dir()
    } else {
        dirs::config_dir()
    };
    let base = base.ok_or_else(|| {
        CrumbsError::DiscoveryError(format!(
            "could not determine the user data directory for {}",
            browser
        ))
    })?;

    Ok(roots_under(browser, os, &base))
}
