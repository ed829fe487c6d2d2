//! Configuration model for crumbs.
//!
//! This module defines the Config struct that represents the crumbs
//! `config.yaml`. It supports forward-compatible YAML parsing (unknown fields
//! are ignored), sensible defaults for optional fields, and validation of
//! config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use operations::{CONFIG_ENV_VAR, default_config_path};
pub use types::MAX_QUERY_ATTEMPTS;
