//! Config struct definition and default implementation.

use super::types::*;
use crate::browser::Browser;
use crate::restart::SessionKeyPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for crumbs.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock release settings
    // =========================================================================
    /// What to do with session keys longer than 64 UTF-16 code units.
    #[serde(default)]
    pub session_key_policy: SessionKeyPolicy,

    /// Sizing rounds allowed when listing the processes holding a file.
    #[serde(default = "default_query_attempts")]
    pub query_attempts: u32,

    // =========================================================================
    // Discovery settings
    // =========================================================================
    /// User-data folders of apps embedding WebView2 (e.g. `<app>/EBWebView`).
    #[serde(default)]
    pub webview2_roots: Vec<PathBuf>,

    /// Additional user-data roots searched per browser.
    #[serde(default)]
    pub extra_roots: BTreeMap<Browser, Vec<PathBuf>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_key_policy: SessionKeyPolicy::default(),
            query_attempts: default_query_attempts(),
            webview2_roots: Vec::new(),
            extra_roots: BTreeMap::new(),
        }
    }
}
