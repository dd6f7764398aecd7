use anyhow::Result;
use log::{debug, warn};
use std::path::PathBuf;

use crate::{
    install::paths::default_prefix,
    package::{Manifest, find_installed_packages},
    runtime::Runtime,
};

/// List the packages installed directly under `prefix` as manifest lines:
/// `"name": "^version",`
#[tracing::instrument(skip(runtime, prefix))]
pub fn list<R: Runtime>(runtime: R, prefix: Option<PathBuf>) -> Result<()> {
    let prefix = prefix.unwrap_or_else(default_prefix);
    debug!("Listing packages from {:?}", prefix);

    let lines = dependency_lines(&runtime, prefix)?;
    if lines.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Build one `"name": "^version",` line per installed package, sorted by name.
///
/// A package without `package.json` gets a `[name] JSON Not found` line
/// instead; one with an unreadable manifest or no version is skipped.
pub fn dependency_lines<R: Runtime>(runtime: &R, prefix: PathBuf) -> Result<Vec<String>> {
    let packages = find_installed_packages(runtime, &prefix)?;
    debug!("Found {} package(s)", packages.len());

    let mut lines = Vec::new();
    for (name, dir) in packages {
        let manifest_path = dir.join("package.json");
        if !runtime.exists(&manifest_path) {
            lines.push(format!("[{}] JSON Not found", name));
            continue;
        }

        match Manifest::load(runtime, &manifest_path) {
            Ok(Manifest {
                version: Some(version),
                ..
            }) => lines.push(format!("\"{}\": \"^{}\",", name, version)),
            Ok(_) => warn!("{:?} has no version; skipping {}", manifest_path, name),
            Err(e) => warn!("Failed to load {:?}: {:#}", manifest_path, e),
        }
    }

    Ok(lines)
}
