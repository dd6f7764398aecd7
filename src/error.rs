//! Error taxonomy for resolution and installation.
//!
//! These are raised inside `anyhow::Error` and recovered with `downcast_ref`
//! where a caller needs to tell them apart.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    /// No cache directory (or no cached version) exists for a package name.
    #[error("package '{name}' not found in cache ({path:?})")]
    NotFound { name: String, path: PathBuf },

    /// The resolved cache entry lacks its directory, manifest or archive.
    #[error("cache entry {name}@{version} is incomplete: {path:?} is missing")]
    CacheEntryMissing {
        name: String,
        version: String,
        path: PathBuf,
    },

    /// A package name that is not `name` or `@scope/name`, and so cannot be
    /// used as a directory below the cache root or the install prefix.
    #[error("invalid package name '{name}'")]
    InvalidName { name: String },

    /// `(name, version)` is already being installed further up the chain.
    #[error("dependency cycle: {}", chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    /// Input ended while waiting for an answer.
    #[error("input closed while waiting for an answer")]
    InputClosed,
}
