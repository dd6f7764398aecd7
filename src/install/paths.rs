use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::package::DEPENDENCY_DIR;
use crate::runtime::Runtime;

/// Get the default cache root: `~/.npm`
#[tracing::instrument(skip(runtime))]
pub fn default_cache_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home_dir = runtime
        .home_dir()
        .context("Could not find home directory; pass --cache")?;
    Ok(home_dir.join(".npm"))
}

/// Get the default install prefix: `node_modules` in the working directory
pub fn default_prefix() -> PathBuf {
    PathBuf::from(DEPENDENCY_DIR)
}
