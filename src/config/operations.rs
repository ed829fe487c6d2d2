//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::MAX_QUERY_ATTEMPTS;
use crate::browser::Browser;
use crate::error::{CrumbsError, Result};
use crate::restart::ReleaseOptions;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "CRUMBS_CONFIG";

/// `<config dir>/crumbs/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crumbs").join("config.yaml"))
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config.yaml file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(CrumbsError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CrumbsError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Find and load the effective config.
    ///
    /// Order: `explicit`, then `$CRUMBS_CONFIG`, then the default path if a
    /// file exists there, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Self::load(PathBuf::from(path));
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document parses as null rather than an empty mapping.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                CrumbsError::ConfigError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            CrumbsError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `query_attempts` must be between 1 and 10
    /// - root entries must be non-empty paths
    pub fn validate(&self) -> Result<()> {
        if self.query_attempts == 0 || self.query_attempts > MAX_QUERY_ATTEMPTS {
            return Err(CrumbsError::ConfigError(format!(
                "config validation failed: query_attempts must be between 1 and {} (found {})",
                MAX_QUERY_ATTEMPTS, self.query_attempts
            )));
        }

        let all_roots = self
            .webview2_roots
            .iter()
            .chain(self.extra_roots.values().flatten());
        for root in all_roots {
            if root.as_os_str().is_empty() {
                return Err(CrumbsError::ConfigError(
                    "config validation failed: root entries must be non-empty paths".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Options for a lock release attempt.
    pub fn release_options(&self) -> ReleaseOptions {
        ReleaseOptions {
            key_policy: self.session_key_policy,
            query_attempts: self.query_attempts,
        }
    }

    /// Configured roots for `browser`, searched after its defaults.
    pub fn roots_for(&self, browser: Browser) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if browser == Browser::WebView2 {
            roots.extend(self.webview2_roots.iter().cloned());
        }
        if let Some(extra) = self.extra_roots.get(&browser) {
            roots.extend(extra.iter().cloned());
        }
        roots
    }
}
