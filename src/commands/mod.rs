//! Command implementations for crumbs.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Commands that touch file locks receive the
//! [`ResourceManager`] from the dispatcher so tests can drive them with a fake.

mod find;
mod holders;
mod release;
mod unlock;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use crate::restart::RestartManager;
use std::collections::HashSet;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    let manager = RestartManager::new();

    match command {
        Command::Find(args) => find::cmd_find(args, config),
        Command::Holders(args) => holders::cmd_holders(args, config, &manager),
        Command::Release(args) => release::cmd_release(args, config, &manager),
        Command::Unlock(args) => unlock::cmd_unlock(args, config, &manager),
        Command::Config => cmd_config(config),
    }
}

/// Print the effective configuration.
fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}

/// Registry names for the selected browsers, first occurrence kept; empty selects all.
fn finder_names(browsers: &[crate::browser::Browser]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    browsers
        .iter()
        .map(|b| b.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
