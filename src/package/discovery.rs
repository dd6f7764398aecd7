use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Find the packages installed directly under `prefix`.
///
/// Directory structure: `<prefix>/<name>/` or `<prefix>/@scope/<name>/`.
/// Hidden entries (`.bin`, `.package-lock.json`, ...) are skipped.
/// Returns `(name, dir)` pairs sorted by name.
#[tracing::instrument(skip(runtime, prefix))]
pub fn find_installed_packages<R: Runtime>(
    runtime: &R,
    prefix: &Path,
) -> Result<Vec<(String, PathBuf)>> {
    let mut packages = Vec::new();

    if !runtime.exists(prefix) {
        return Ok(packages);
    }

    for path in runtime.read_dir(prefix)? {
        let Some(name) = visible_dir_name(runtime, &path) else {
            continue;
        };

        if name.starts_with('@') {
            for scoped in runtime.read_dir(&path)? {
                if let Some(inner) = visible_dir_name(runtime, &scoped) {
                    packages.push((format!("{}/{}", name, inner), scoped));
                }
            }
        } else {
            packages.push((name, path));
        }
    }

    packages.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(packages)
}

fn visible_dir_name<R: Runtime>(runtime: &R, path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    if name.starts_with('.') || !runtime.is_dir(path) {
        return None;
    }
    Some(name)
}
