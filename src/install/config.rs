use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    archive::{ArchiveExtractor, Extractor},
    runtime::Runtime,
};

use super::paths::{default_cache_root, default_prefix};

pub struct Config<R: Runtime, E: Extractor> {
    pub runtime: R,
    pub extractor: E,
    pub cache_root: PathBuf,
    pub prefix: PathBuf,
}

impl<R: Runtime> Config<R, ArchiveExtractor> {
    pub fn new(runtime: R, cache_root: Option<PathBuf>, prefix: Option<PathBuf>) -> Result<Self> {
        let cache_root = match cache_root {
            Some(path) => path,
            None => default_cache_root(&runtime)?,
        };
        let prefix = prefix.unwrap_or_else(default_prefix);

        debug!("Using cache {:?}, installing into {:?}", cache_root, prefix);

        Ok(Self {
            runtime,
            extractor: ArchiveExtractor::new(),
            cache_root,
            prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{configure_mock_runtime_basics, test_home};

    #[test]
    fn test_config_defaults() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::new(runtime, None, None).unwrap();
        assert_eq!(config.cache_root, test_home().join(".npm"));
        assert_eq!(config.prefix, PathBuf::from("node_modules"));
    }

    #[test]
    fn test_config_explicit_paths_skip_home_lookup() {
        let mut runtime = MockRuntime::new();
        runtime.expect_home_dir().never();

        let config = Config::new(
            runtime,
            Some(PathBuf::from("/srv/npm-cache")),
            Some(PathBuf::from("/app/node_modules")),
        )
        .unwrap();
        assert_eq!(config.cache_root, PathBuf::from("/srv/npm-cache"));
        assert_eq!(config.prefix, PathBuf::from("/app/node_modules"));
    }
}
