use crate::package::DEPENDENCY_DIR;
use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use std::path::{Component, Path, PathBuf};
use tar::Archive;

use super::Extractor;

/// Extractor for .tgz / .tar.gz archives
pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tgz") || name.ends_with(".tar.gz")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        let target_name = extract_to
            .file_name()
            .ok_or_else(|| anyhow!("Invalid extraction target {:?}", extract_to))?;
        let staging = extract_to.with_file_name(format!(
            ".{}_temp_extract",
            target_name.to_string_lossy()
        ));

        let result = self.extract_impl(runtime, archive_path, extract_to, &staging);
        if result.is_err()
            && runtime.exists(&staging)
            && let Err(e) = runtime.remove_dir_all(&staging)
        {
            debug!("Failed to clean up {:?}: {}", staging, e);
        }
        result
    }
}

impl TarGzExtractor {
    fn extract_impl<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
        staging: &Path,
    ) -> Result<()> {
        debug!("Extracting {:?} to {:?}...", archive_path, extract_to);

        if runtime.exists(staging) {
            runtime.remove_dir_all(staging)?;
        }
        runtime.create_dir_all(staging)?;
        runtime.create_dir_all(extract_to)?;

        let unpacked = self.unpack(runtime, archive_path, staging)?;
        if unpacked == 0 {
            return Err(anyhow!("Archive {:?} appears to be empty.", archive_path));
        }

        // A lone top-level directory is the wrapper; otherwise hoist everything.
        let entries = runtime
            .read_dir(staging)
            .context("Failed to read temp extraction directory")?;
        let source_dir = match entries.as_slice() {
            [single] if runtime.is_dir(single) => single.clone(),
            _ => staging.to_path_buf(),
        };

        debug!("Moving contents from {:?} to {:?}", source_dir, extract_to);
        for item in runtime.read_dir(&source_dir)? {
            let Some(file_name) = item.file_name() else {
                continue;
            };
            let dest_path = extract_to.join(file_name);

            if runtime.exists(&dest_path) {
                if file_name == DEPENDENCY_DIR {
                    warn!(
                        "Keeping installed dependencies in {:?}; skipping the archive's copy",
                        dest_path
                    );
                    continue;
                }
                debug!("Replacing {:?}", dest_path);
                if runtime.is_dir(&dest_path) {
                    runtime.remove_dir_all(&dest_path)?;
                } else {
                    runtime.remove_file(&dest_path)?;
                }
            }
            runtime.rename(&item, &dest_path)?;
        }

        runtime.remove_dir_all(staging)?;

        info!("Extracted {:?} into {:?}", archive_path, extract_to);
        Ok(())
    }

    /// Unpack every safe entry into `dest`, returning how many were written.
    fn unpack<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        dest: &Path,
    ) -> Result<usize> {
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut unpacked = 0;

        for entry in archive
            .entries()
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?
        {
            let mut entry =
                entry.with_context(|| format!("Corrupt entry in archive {:?}", archive_path))?;
            let raw_path = entry.path()?.into_owned();

            let Some(relative) = enclosed_name(&raw_path) else {
                debug!("Skipping entry with invalid path {:?}", raw_path);
                continue;
            };
            let full_path = dest.join(&relative);
            let kind = entry.header().entry_type();

            if kind.is_dir() {
                runtime.create_dir_all(&full_path)?;
            } else if kind.is_file() {
                if let Some(parent) = full_path.parent() {
                    runtime.create_dir_all(parent)?;
                }
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;

                // Owner always keeps read/write.
                #[cfg(unix)]
                if let Ok(mode) = entry.header().mode()
                    && let Err(e) = runtime.set_permissions(&full_path, (mode & 0o777) | 0o600)
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            } else {
                debug!("Skipping {:?} entry {:?}", kind, raw_path);
                continue;
            }
            unpacked += 1;
        }

        Ok(unpacked)
    }
}

/// Keep only normal components; reject absolute paths and `..`.
fn enclosed_name(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
