//! CLI argument parsing for crumbs.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::browser::Browser;
use crate::logging::LogFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Crumbs: find browser cookie stores and release the locks on them.
///
/// A running browser keeps its cookie database open exclusively. Crumbs
/// asks the Windows Restart Manager which process holds the file and
/// terminates it, so other tools can read the file.
#[derive(Parser, Debug)]
#[command(name = "crumbs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Config file (defaults to $CRUMBS_CONFIG, then the user config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for crumbs.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List candidate cookie store files.
    ///
    /// Reads each browser's `Local State` profile index and prints the
    /// cookie database paths of every profile.
    Find(FindArgs),

    /// Show which processes hold a file open.
    ///
    /// Nothing is terminated.
    Holders(HoldersArgs),

    /// Release the lock on one file.
    ///
    /// Terminates the first process holding the file. Fails (exit code 3)
    /// if nothing holds it.
    Release(ReleaseArgs),

    /// Release the locks on every existing cookie store.
    Unlock(UnlockArgs),

    /// Print the effective configuration as YAML.
    Config,
}

/// Arguments for the `find` command.
#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Only these browsers (repeatable; default: all).
    #[arg(short, long = "browser", value_enum)]
    pub browsers: Vec<Browser>,

    /// Only list files that exist.
    #[arg(long)]
    pub existing: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `holders` command.
#[derive(Parser, Debug)]
pub struct HoldersArgs {
    /// File to inspect.
    pub path: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `release` command.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// File to release.
    pub path: PathBuf,
}

/// Arguments for the `unlock` command.
#[derive(Parser, Debug)]
pub struct UnlockArgs {
    /// Only these browsers (repeatable; default: all).
    #[arg(short, long = "browser", value_enum)]
    pub browsers: Vec<Browser>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_find_defaults() {
        let cli = Cli::try_parse_from(["crumbs", "find"]).unwrap();
        if let Command::Find(args) = cli.command {
            assert!(args.browsers.is_empty());
            assert!(!args.existing);
            assert!(!args.json);
        } else {
            panic!("Expected Find command");
        }
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn parse_find_browsers() {
        let cli = Cli::try_parse_from([
            "crumbs",
            "find",
            "--browser",
            "brave",
            "-b",
            "webview2",
            "--existing",
        ])
        .unwrap();
        if let Command::Find(args) = cli.command {
            assert_eq!(args.browsers, vec![Browser::Brave, Browser::WebView2]);
            assert!(args.existing);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn parse_find_unknown_browser_fails() {
        assert!(Cli::try_parse_from(["crumbs", "find", "--browser", "netscape"]).is_err());
    }

    #[test]
    fn parse_release() {
        let cli = Cli::try_parse_from(["crumbs", "release", r"C:\Data\Cookies"]).unwrap();
        if let Command::Release(args) = cli.command {
            assert_eq!(args.path, PathBuf::from(r"C:\Data\Cookies"));
        } else {
            panic!("Expected Release command");
        }
    }

    #[test]
    fn parse_release_requires_path() {
        assert!(Cli::try_parse_from(["crumbs", "release"]).is_err());
    }

    #[test]
    fn parse_holders_json() {
        let cli = Cli::try_parse_from(["crumbs", "holders", "Cookies", "--json"]).unwrap();
        if let Command::Holders(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("Cookies"));
            assert!(args.json);
        } else {
            panic!("Expected Holders command");
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crumbs",
            "unlock",
            "-vv",
            "--log-format",
            "json",
            "--config",
            "/etc/crumbs.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Unlock(_)));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/crumbs.yaml")));
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["crumbs", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config));
    }
}
