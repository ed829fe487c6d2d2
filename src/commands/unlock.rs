//! Implementation of the `crumbs unlock` command.
//!
//! Releases the lock on every existing cookie store of the selected browsers.

use super::finder_names;
use crate::browser::{CookieStore, FinderRegistry};
use crate::cli::UnlockArgs;
use crate::config::Config;
use crate::error::{CrumbsError, Result};
use crate::restart::{ReleaseError, ReleaseOptions, Released, ResourceManager};
use std::collections::HashSet;
use std::path::PathBuf;

/// Outcome of unlocking a batch of stores.
#[derive(Debug, Default)]
pub(super) struct UnlockSummary {
    pub released: Vec<(PathBuf, Released)>,
    pub not_held: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ReleaseError)>,
}

/// Execute the `crumbs unlock` command.
///
/// Fails with the first release error once every store has been tried.
/// Stores nobody holds are not an error.
pub fn cmd_unlock<M: ResourceManager + ?Sized>(
    args: UnlockArgs,
    config: &Config,
    manager: &M,
) -> Result<()> {
    let registry = FinderRegistry::with_defaults(config)?;
    let stores: Vec<CookieStore> = registry
        .find(&finder_names(&args.browsers))?
        .into_iter()
        .filter(|store| store.file().exists())
        .collect();

    if stores.is_empty() {
        println!("No cookie stores found.");
        return Ok(());
    }

    let summary = unlock_stores(manager, &stores, &config.release_options());

    for (path, released) in &summary.released {
        println!("Released  {} ({})", path.display(), released.holder);
    }
    for path in &summary.not_held {
        println!("Not held  {}", path.display());
    }
    for (path, err) in &summary.failed {
        println!("Failed    {}: {}", path.display(), err);
    }
    println!();
    println!(
        "{} released, {} not held, {} failed",
        summary.released.len(),
        summary.not_held.len(),
        summary.failed.len()
    );

    match summary.failed.into_iter().next() {
        Some((_, err)) => Err(CrumbsError::Release(err)),
        None => Ok(()),
    }
}

/// Try each store in turn, one session per store.
///
/// A path listed more than once is attempted only the first time.
pub(super) fn unlock_stores<M: ResourceManager + ?Sized>(
    manager: &M,
    stores: &[CookieStore],
    options: &ReleaseOptions,
) -> UnlockSummary {
    let mut summary = UnlockSummary::default();
    let mut attempted = HashSet::new();

    for store in stores {
        let path = store.path().to_path_buf();
        if !attempted.insert(path.clone()) {
            tracing::debug!(path = %path.display(), "already attempted, skipping");
            continue;
        }
        match store.try_unlock(manager, options) {
            Ok(released) => summary.released.push((path, released)),
            Err(ReleaseError::NoHoldersFound) => summary.not_held.push(path),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    kind = e.kind(),
                    error = %e,
                    "unlock failed"
                );
                summary.failed.push((path, e));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Browser, CookieStoreFile};
    use crate::restart::{Cause, ListResponse, RmStatus};
    use crate::test_support::{FakeResourceManager, holder};

    fn store(path: &str) -> CookieStore {
        CookieStore::new(CookieStoreFile {
            path: PathBuf::from(path),
            browser: Browser::Chrome,
            profile: "Default".to_string(),
            os: "windows".to_string(),
            is_default_profile: true,
        })
    }

    #[test]
    fn each_store_gets_its_own_session() {
        // First store is held by one process, the second by nobody.
        let fake = FakeResourceManager::holding(vec![holder(1, 1)])
            .answer(Ok(ListResponse::Complete(Vec::new())));

        let summary = unlock_stores(
            &fake,
            &[store("a/Cookies"), store("b/Cookies")],
            &ReleaseOptions::default(),
        );

        assert_eq!(summary.released.len(), 1);
        assert_eq!(summary.released[0].1.holder.pid, 1);
        assert_eq!(summary.not_held, vec![PathBuf::from("b/Cookies")]);
        assert!(summary.failed.is_empty());

        let calls = fake.calls();
        assert_eq!(calls.starts, 2);
        assert_eq!(calls.ends, 2);
    }

    #[test]
    fn failures_are_collected_and_do_not_stop_the_batch() {
        let fake = FakeResourceManager::new()
            .answer(Err(Cause::Status(RmStatus::ACCESS_DENIED)))
            .answer(Ok(ListResponse::Complete(Vec::new())));

        let summary = unlock_stores(
            &fake,
            &[store("a/Cookies"), store("b/Cookies")],
            &ReleaseOptions::default(),
        );

        assert_eq!(summary.failed.len(), 1);
        assert!(matches!(summary.failed[0].1, ReleaseError::QueryFailed(_)));
        assert_eq!(summary.not_held.len(), 1);
        assert_eq!(fake.calls().ends, 2);
    }

    #[test]
    fn repeated_path_gets_one_attempt() {
        // Scripted for two sessions only; a repeat of `a` must not open a third.
        let fake = FakeResourceManager::holding(vec![holder(1, 1), holder(2, 2)])
            .answer(Ok(ListResponse::MoreData { needed: 1 }))
            .answer(Ok(ListResponse::Complete(vec![holder(2, 2)])));

        let summary = unlock_stores(
            &fake,
            &[store("a/Cookies"), store("b/Cookies"), store("a/Cookies")],
            &ReleaseOptions::default(),
        );

        assert_eq!(summary.released.len(), 2);
        assert_eq!(summary.released[0].0, PathBuf::from("a/Cookies"));
        assert_eq!(summary.released[1].0, PathBuf::from("b/Cookies"));
        assert!(summary.not_held.is_empty());
        let calls = fake.calls();
        assert_eq!(calls.starts, 2);
        assert_eq!(
            calls.registered,
            vec![PathBuf::from("a/Cookies"), PathBuf::from("b/Cookies")]
        );
    }

    #[test]
    fn empty_batch_touches_nothing() {
        let fake = FakeResourceManager::new();

        let summary = unlock_stores(&fake, &[], &ReleaseOptions::default());

        assert!(summary.released.is_empty());
        assert_eq!(fake.calls().starts, 0);
    }
}
