//! Parsing of the `Local State` profile index.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A profile listed in `Local State`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Directory name under the root (e.g. `Default`, `Profile 1`).
    pub dir: String,
    /// Display name.
    pub name: String,
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
struct LocalState {
    #[serde(default)]
    profile: ProfileSection,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileSection {
    #[serde(default)]
    info_cache: BTreeMap<String, ProfileInfo>,
}

#[derive(Debug, Deserialize)]
struct ProfileInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_using_default_name: bool,
}

/// Parse the profiles out of a `Local State` document, ordered by directory.
///
/// Unknown fields are ignored. A document without `profile.info_cache`
/// yields no profiles.
pub fn parse_profiles(json: &str) -> Result<Vec<Profile>, serde_json::Error> {
    let state: LocalState = serde_json::from_str(json)?;

    Ok(state
        .profile
        .info_cache
        .into_iter()
        .map(|(dir, info)| Profile {
            dir,
            name: info.name,
            is_default: info.is_using_default_name,
        })
        .collect())
}

/// Profile assumed when `Local State` exists but cannot be parsed.
pub(super) fn fallback_profile() -> Profile {
    Profile {
        dir: "Default".to_string(),
        name: "Profile 1".to_string(),
        is_default: true,
    }
}
