mod tar_gz;

use crate::runtime::Runtime;
use anyhow::{Result, anyhow};
use std::path::Path;

pub use tar_gz::TarGzExtractor;

/// Trait for archive extractors.
///
/// `extract` unpacks the archive and moves the contents of its single
/// wrapping directory (npm tarballs use `package/`) into `extract_to`.
#[cfg_attr(test, mockall::automock)]
pub trait Extractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Extract the archive into the specified directory
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
pub struct ArchiveExtractor {
    tar_gz: TarGzExtractor,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
        }
    }
}

impl Extractor for ArchiveExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime, archive_path, extract_to))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        if self.tar_gz.can_handle(archive_path) {
            return self.tar_gz.extract(runtime, archive_path, extract_to);
        }
        Err(anyhow!(
            "Unsupported archive format: {}",
            archive_path.display()
        ))
    }
}
