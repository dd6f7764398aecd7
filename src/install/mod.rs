use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::{
    archive::Extractor,
    error::InstallError,
    output::indent,
    package::{
        DEPENDENCY_DIR, DependencyRequest, Manifest, PackageCache, VersionResolver,
        check_package_name,
    },
    runtime::Runtime,
};

pub mod config;
pub(crate) mod paths;
mod report;

use config::Config;
pub use report::InstallReport;

/// Version request shown when resolving the package named on the command line.
const ROOT_REQUEST: &str = "...";

#[tracing::instrument(skip(runtime, cache_root, prefix))]
pub fn install<R: Runtime + 'static>(
    runtime: R,
    name: Option<String>,
    cache_root: Option<PathBuf>,
    prefix: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(runtime, cache_root, prefix)?;
    run(name, config)
}

/// Install `name` (asking for it when absent) and print a summary.
///
/// Only the root package's failure is returned; dependency failures are
/// reported in the summary.
#[tracing::instrument(skip(config))]
pub fn run<R: Runtime + 'static, E: Extractor>(
    name: Option<String>,
    config: Config<R, E>,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => config.runtime.prompt("module name :=> ")?,
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("No package name given");
    }

    let cache = PackageCache::new(&config.runtime, config.cache_root.clone());
    let mut installer = Installer::new(&config.runtime, &config.extractor, cache);
    let result = installer.install_requested(name, &config.prefix);

    installer.report().print();
    result
}

/// Depth-first installer over the local cache.
///
/// Dependencies are installed before the package's own archive is
/// extracted, in alphabetical order, each into `<target>/node_modules`.
pub struct Installer<'a, R: Runtime, E: Extractor> {
    runtime: &'a R,
    extractor: &'a E,
    cache: PackageCache<'a, R>,
    /// `(name, version)` of every package on the current install chain.
    chain: Vec<(String, String)>,
    report: InstallReport,
}

impl<'a, R: Runtime + 'static, E: Extractor> Installer<'a, R, E> {
    pub fn new(runtime: &'a R, extractor: &'a E, cache: PackageCache<'a, R>) -> Self {
        Self {
            runtime,
            extractor,
            cache,
            chain: Vec::new(),
            report: InstallReport::new(),
        }
    }

    pub fn report(&self) -> &InstallReport {
        &self.report
    }

    /// Resolve `name` against the cache and install it into `base`.
    #[tracing::instrument(skip(self, base))]
    pub fn install_requested(&mut self, name: &str, base: &Path) -> Result<()> {
        let version = match self.checked_resolve(name, ROOT_REQUEST, 0) {
            Ok(version) => version,
            Err(e) => {
                self.report.record_unresolved(name);
                return Err(e);
            }
        };
        self.install(name, &version, base, 0)
    }

    /// Install `name@version` into `<base>/<name>`, recursing into its dependencies.
    ///
    /// An error means this package was not installed: an incomplete cache
    /// entry, a dependency cycle, an unreadable manifest or a failed
    /// extraction. Failed dependencies are printed and skipped.
    #[tracing::instrument(skip(self, base))]
    pub fn install(&mut self, name: &str, version: &str, base: &Path, depth: usize) -> Result<()> {
        println!("{}[{}@{}] install", indent(depth), name, version);

        match self.install_impl(name, version, base, depth) {
            Ok(()) => {
                self.report.record_installed(name, version);
                Ok(())
            }
            Err(e) => {
                let cut_cycle = matches!(
                    e.downcast_ref::<InstallError>(),
                    Some(InstallError::DependencyCycle { .. })
                );
                if cut_cycle {
                    self.report.record_cycle(name, version);
                } else {
                    self.report.record_failed(name, version);
                }
                Err(e)
            }
        }
    }

    fn install_impl(&mut self, name: &str, version: &str, base: &Path, depth: usize) -> Result<()> {
        self.check_cycle(name, version)?;
        let entry = self.cache.entry(name, version)?;

        let target = base.join(name);
        self.runtime.create_dir_all(&target)?;

        let manifest = Manifest::load(self.runtime, &entry.manifest)?;
        let dependencies = manifest.dependencies();

        if !dependencies.is_empty() {
            let dep_dir = target.join(DEPENDENCY_DIR);
            self.runtime.create_dir_all(&dep_dir)?;

            debug!("{}@{} has {} dependencies", name, version, dependencies.len());
            self.chain.push((name.to_string(), version.to_string()));
            for dependency in &dependencies {
                self.install_dependency(dependency, &dep_dir, depth);
            }
            self.chain.pop();
        }

        self.extractor
            .extract(self.runtime, &entry.archive, &target)
            .with_context(|| format!("Failed to extract {}@{} into {:?}", name, version, target))?;

        info!("Installed {}@{} into {:?}", entry.name, entry.version, target);
        Ok(())
    }

    /// Resolve and install one dependency of a package at `depth`.
    /// Failures are printed and never propagate to the parent.
    fn install_dependency(&mut self, dependency: &DependencyRequest, dep_dir: &Path, depth: usize) {
        let child = depth + 1;

        let result = match self.checked_resolve(&dependency.name, &dependency.request, child) {
            Ok(version) => self.install(&dependency.name, &version, dep_dir, child),
            Err(e) => {
                self.report.record_unresolved(&dependency.name);
                Err(e)
            }
        };

        if let Err(e) = result {
            warn!("Dependency {} failed: {:#}", dependency.name, e);
            println!("{}{:#}", indent(child), e);
            println!("{}Dependency failed: {}", indent(depth), dependency.name);
        }
    }

    /// Reject names that would escape the cache root or `base`, then resolve.
    fn checked_resolve(&self, name: &str, request: &str, depth: usize) -> Result<String> {
        check_package_name(name)?;
        VersionResolver::new(self.runtime, &self.cache).resolve(name, request, depth)
    }

    fn check_cycle(&self, name: &str, version: &str) -> Result<()> {
        if !self.chain.iter().any(|(n, v)| n == name && v == version) {
            return Ok(());
        }

        let chain = self
            .chain
            .iter()
            .map(|(n, v)| format!("{}@{}", n, v))
            .chain(std::iter::once(format!("{}@{}", name, version)))
            .collect();
        Err(InstallError::DependencyCycle { chain }.into())
    }
}
