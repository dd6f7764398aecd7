//! Package model module
//!
//! This module provides the read-only view over the package cache, manifest
//! parsing, version resolution and discovery of installed packages.

mod cache;
mod discovery;
mod manifest;
mod version;

pub use cache::{CacheEntry, PackageCache};
pub use discovery::find_installed_packages;
pub use manifest::{DependencyRequest, Manifest, check_package_name};
pub use version::VersionResolver;

/// Name of the nested directory that holds a package's own dependencies.
pub const DEPENDENCY_DIR: &str = "node_modules";
