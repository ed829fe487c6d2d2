//! Finder registration and cookie store handles.

use super::find::find_cookie_store_files;
use super::roots::default_roots;
use super::{Browser, CookieStoreFile};
use crate::config::Config;
use crate::error::{CrumbsError, Result};
use crate::restart::{
    ReleaseError, ReleaseOptions, Released, ResourceManager, release_file_lock_with,
    try_release_file_lock,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Something that can locate cookie stores for one browser.
pub trait CookieStoreFinder {
    /// Registry key, e.g. `chrome`.
    fn name(&self) -> &str;

    fn find_cookie_stores(&self) -> Result<Vec<CookieStore>>;
}

/// Handle to a discovered cookie store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieStore {
    file: CookieStoreFile,
}

impl CookieStore {
    pub fn new(file: CookieStoreFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &CookieStoreFile {
        &self.file
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// Release whatever lock a running browser holds on the file.
    ///
    /// Boolean entry point for library callers that only need to know the
    /// file became readable. `crumbs unlock` uses [`CookieStore::try_unlock`].
    pub fn unlock<M: ResourceManager + ?Sized>(
        &self,
        manager: &M,
        options: &ReleaseOptions,
    ) -> bool {
        release_file_lock_with(manager, &self.file.path, options)
    }

    /// Like [`CookieStore::unlock`], keeping the failure reason.
    pub fn try_unlock<M: ResourceManager + ?Sized>(
        &self,
        manager: &M,
        options: &ReleaseOptions,
    ) -> std::result::Result<Released, ReleaseError> {
        try_release_file_lock(manager, &self.file.path, options)
    }
}

/// Finder for any browser using the Chromium profile layout.
#[derive(Debug, Clone)]
pub struct ChromiumFinder {
    browser: Browser,
    use_default_roots: bool,
    extra_roots: Vec<PathBuf>,
}

impl ChromiumFinder {
    /// Finder searching the browser's default roots.
    pub fn new(browser: Browser) -> Self {
        Self {
            browser,
            use_default_roots: true,
            extra_roots: Vec::new(),
        }
    }

    /// Finder searching only `roots`.
    pub fn with_roots(browser: Browser, roots: Vec<PathBuf>) -> Self {
        Self {
            browser,
            use_default_roots: false,
            extra_roots: roots,
        }
    }

    /// Search `roots` in addition to the current ones.
    pub fn add_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.extra_roots.extend(roots);
        self
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    /// Every root this finder searches, defaults first, each once.
    pub fn roots(&self) -> Result<Vec<PathBuf>> {
        let mut roots = if self.use_default_roots {
            default_roots(self.browser)?
        } else {
            Vec::new()
        };
        roots.extend(self.extra_roots.iter().cloned());

        let mut seen = HashSet::new();
        roots.retain(|root| seen.insert(root.clone()));
        Ok(roots)
    }
}

impl CookieStoreFinder for ChromiumFinder {
    fn name(&self) -> &str {
        self.browser.as_str()
    }

    fn find_cookie_stores(&self) -> Result<Vec<CookieStore>> {
        let roots = self.roots()?;
        Ok(find_cookie_store_files(&roots, self.browser)
            .into_iter()
            .map(CookieStore::new)
            .collect())
    }
}

/// Finders by name, in registration order.
#[derive(Default)]
pub struct FinderRegistry {
    finders: Vec<Box<dyn CookieStoreFinder>>,
}

impl FinderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a finder for every [`Browser`], honoring configured roots.
    pub fn with_defaults(config: &Config) -> Result<Self> {
        let mut registry = Self::new();
        for browser in Browser::ALL {
            let finder = ChromiumFinder::new(browser).add_roots(config.roots_for(browser));
            registry.register(Box::new(finder))?;
        }
        Ok(registry)
    }

    /// Add a finder. Names must be unique.
    pub fn register(&mut self, finder: Box<dyn CookieStoreFinder>) -> Result<()> {
        if self.get(finder.name()).is_some() {
            return Err(CrumbsError::UserError(format!(
                "a cookie store finder named '{}' is already registered",
                finder.name()
            )));
        }
        self.finders.push(finder);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn CookieStoreFinder> {
        self.finders
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.finders.iter().map(|f| f.name()).collect()
    }

    /// Run the named finders, or every finder when `names` is empty.
    ///
    /// Each path is returned once; the first finder to report it wins.
    pub fn find(&self, names: &[&str]) -> Result<Vec<CookieStore>> {
        let selected: Vec<&dyn CookieStoreFinder> = if names.is_empty() {
            self.finders.iter().map(|f| f.as_ref()).collect()
        } else {
            names
                .iter()
                .map(|name| {
                    self.get(name).ok_or_else(|| {
                        CrumbsError::UserError(format!(
                            "no cookie store finder named '{}' (known: {})",
                            name,
                            self.names().join(", ")
                        ))
                    })
                })
                .collect::<Result<_>>()?
        };

        let mut seen = HashSet::new();
        let mut stores = Vec::new();
        for finder in selected {
            for store in finder.find_cookie_stores()? {
                if seen.insert(store.path().to_path_buf()) {
                    stores.push(store);
                }
            }
        }
        Ok(stores)
    }
}
