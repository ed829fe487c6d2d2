//! Candidate cookie store files under a set of user-data roots.

use super::local_state::{Profile, fallback_profile, parse_profiles};
use super::{Browser, CookieStoreFile};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the profile index in a user-data root.
pub const LOCAL_STATE_FILE: &str = "Local State";

/// List candidate cookie files for `browser` under `roots`.
///
/// Roots without a readable `Local State` are skipped. When `Local State`
/// exists but is not valid JSON, the `Default` profile is assumed. Each
/// profile yields two candidates: `Network/Cookies` first, then the
/// pre-Chrome-96 `Cookies`. Existence of the files is not checked.
pub fn find_cookie_store_files(roots: &[PathBuf], browser: Browser) -> Vec<CookieStoreFile> {
    let mut files = Vec::new();

    for root in roots {
        let local_state = root.join(LOCAL_STATE_FILE);
        let content = match fs::read_to_string(&local_state) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %local_state.display(), error = %e, "skipping root");
                continue;
            }
        };

        let profiles = match parse_profiles(&content) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::debug!(
                    path = %local_state.display(),
                    error = %e,
                    "unreadable profile index, assuming the default profile"
                );
                vec![fallback_profile()]
            }
        };

        for profile in &profiles {
            files.extend(candidates(root, profile, browser));
        }
    }

    files
}

fn candidates(root: &Path, profile: &Profile, browser: Browser) -> [CookieStoreFile; 2] {
    let profile_dir = root.join(&profile.dir);
    let file = |path: PathBuf| CookieStoreFile {
        path,
        browser,
        profile: profile.name.clone(),
        os: std::env::consts::OS.to_string(),
        is_default_profile: profile.is_default,
    };

    [
        file(profile_dir.join("Network").join("Cookies")),
        file(profile_dir.join("Cookies")),
    ]
}
