//! Implementation of the `crumbs release` command.

use crate::cli::ReleaseArgs;
use crate::config::Config;
use crate::error::Result;
use crate::restart::{ResourceManager, try_release_file_lock};

/// Execute the `crumbs release` command.
///
/// Terminates the first process holding the file. Nothing holding the file
/// is an error with its own exit code.
pub fn cmd_release<M: ResourceManager + ?Sized>(
    args: ReleaseArgs,
    config: &Config,
    manager: &M,
) -> Result<()> {
    let released = try_release_file_lock(manager, &args.path, &config.release_options())?;

    println!("Released {}", args.path.display());
    println!("  Terminated: {}", released.holder);

    if !released.untouched.is_empty() {
        println!();
        println!("Still holding the file ({}):", released.untouched.len());
        for holder in &released.untouched {
            println!("  {}", holder);
        }
    }

    Ok(())
}
