//! Read-only view over the local package cache.
//!
//! Directory structure:
//!
//! ```text
//! <root>/<name>/<version>/package/package.json
//! <root>/<name>/<version>/package.tgz
//! ```

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::error::InstallError;
use crate::runtime::Runtime;

const MANIFEST_PATH: &str = "package/package.json";
const ARCHIVE_NAME: &str = "package.tgz";

/// A complete `(name, version)` entry: both the manifest and archive exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub name: String,
    pub version: String,
    pub manifest: PathBuf,
    pub archive: PathBuf,
}

pub struct PackageCache<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> PackageCache<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    /// Returns: `<root>/<name>`
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Returns: `<root>/<name>/<version>`
    pub fn entry_dir(&self, name: &str, version: &str) -> PathBuf {
        self.package_dir(name).join(version)
    }

    /// Names of all cached versions of `name`, sorted lexicographically.
    ///
    /// Fails with [`InstallError::NotFound`] when the package directory is
    /// absent or holds no versions.
    #[tracing::instrument(skip(self))]
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.package_dir(name);
        if !self.runtime.is_dir(&dir) {
            return Err(InstallError::NotFound {
                name: name.to_string(),
                path: dir,
            }
            .into());
        }

        let mut versions: Vec<String> = self
            .runtime
            .read_dir(&dir)?
            .into_iter()
            .filter(|p| self.runtime.is_dir(p))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        versions.sort();

        debug!("Cached versions of {}: {:?}", name, versions);

        if versions.is_empty() {
            return Err(InstallError::NotFound {
                name: name.to_string(),
                path: dir,
            }
            .into());
        }
        Ok(versions)
    }

    /// Look up a complete cache entry, checking directory, manifest and archive in turn.
    #[tracing::instrument(skip(self))]
    pub fn entry(&self, name: &str, version: &str) -> Result<CacheEntry> {
        let dir = self.entry_dir(name, version);
        let manifest = dir.join(MANIFEST_PATH);
        let archive = dir.join(ARCHIVE_NAME);

        for path in [&dir, &manifest, &archive] {
            if !self.runtime.exists(path) {
                return Err(InstallError::CacheEntryMissing {
                    name: name.to_string(),
                    version: version.to_string(),
                    path: path.clone(),
                }
                .into());
            }
        }

        Ok(CacheEntry {
            name: name.to_string(),
            version: version.to_string(),
            manifest,
            archive,
        })
    }
}
