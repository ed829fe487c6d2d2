//! Implementation of the `crumbs find` command.
//!
//! Lists candidate cookie store files for the selected browsers.

use super::finder_names;
use crate::browser::{Browser, CookieStoreFile, FinderRegistry};
use crate::cli::FindArgs;
use crate::config::Config;
use crate::error::{CrumbsError, Result};

/// Execute the `crumbs find` command.
pub fn cmd_find(args: FindArgs, config: &Config) -> Result<()> {
    let registry = FinderRegistry::with_defaults(config)?;
    let files = collect(&registry, &args.browsers, args.existing)?;

    if args.json {
        let out = serde_json::to_string_pretty(&files).map_err(|e| {
            CrumbsError::UserError(format!("failed to serialize cookie stores: {}", e))
        })?;
        println!("{}", out);
        return Ok(());
    }

    if files.is_empty() {
        println!("No cookie stores found.");
        return Ok(());
    }

    println!("Cookie stores ({}):", files.len());
    println!();
    for file in &files {
        let default = if file.is_default_profile {
            " (default)"
        } else {
            ""
        };
        println!("  [{}] {}{}", file.browser, file.profile, default);
        println!("    Path:   {}", file.path.display());
        if !args.existing {
            println!("    Exists: {}", if file.exists() { "yes" } else { "no" });
        }
    }

    Ok(())
}

/// Candidate files from the selected finders, optionally only existing ones.
pub(super) fn collect(
    registry: &FinderRegistry,
    browsers: &[Browser],
    existing_only: bool,
) -> Result<Vec<CookieStoreFile>> {
    let stores = registry.find(&finder_names(browsers))?;

    Ok(stores
        .into_iter()
        .map(|store| store.file().clone())
        .filter(|file| !existing_only || file.exists())
        .collect())
}
