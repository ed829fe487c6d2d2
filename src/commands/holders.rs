//! Implementation of the `crumbs holders` command.
//!
//! Lists the processes holding a file without terminating any of them.

use crate::cli::HoldersArgs;
use crate::config::Config;
use crate::error::{CrumbsError, Result};
use crate::restart::{
    ProcessHolder, ReleaseError, ReleaseOptions, ResourceManager, Session, SessionKey,
};
use serde_json::json;
use std::path::Path;

/// Execute the `crumbs holders` command.
pub fn cmd_holders<M: ResourceManager + ?Sized>(
    args: HoldersArgs,
    config: &Config,
    manager: &M,
) -> Result<()> {
    let holders = list_holders(manager, &args.path, &config.release_options())?;

    if args.json {
        let out = serde_json::to_string_pretty(&json!({
            "path": args.path,
            "holders": holders,
        }))
        .map_err(|e| CrumbsError::UserError(format!("failed to serialize holders: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if holders.is_empty() {
        println!("No process holds {}.", args.path.display());
        return Ok(());
    }

    println!("Holders of {} ({}):", args.path.display(), holders.len());
    println!();
    for holder in &holders {
        println!("  {}", holder);
        if let Some(started) = holder.start_time.to_datetime() {
            println!("    Started: {}", started.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        if let Some(service) = &holder.service_name {
            println!("    Service: {}", service);
        }
    }

    Ok(())
}

/// Processes holding `path`, in the order the OS reports them.
///
/// Opens and always ends a session of its own.
pub(super) fn list_holders<M: ResourceManager + ?Sized>(
    manager: &M,
    path: &Path,
    options: &ReleaseOptions,
) -> Result<Vec<ProcessHolder>> {
    let key = SessionKey::for_path(path, options.key_policy).map_err(ReleaseError::StartFailed)?;
    let mut session = Session::open(manager, key)?;

    let holders = session
        .register(&[path])
        .and_then(|()| session.query(options.query_attempts));

    // A failed close is logged by the session.
    let _ = session.close();
    Ok(holders?)
}
