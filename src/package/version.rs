//! Version resolution against the local cache.
//!
//! Version requests from manifests are never parsed. When the cache holds a
//! single version it is used as is; otherwise the operator picks one.

use anyhow::Result;
use log::debug;

use crate::output::indent;
use crate::runtime::Runtime;

use super::PackageCache;

pub struct VersionResolver<'a, R: Runtime> {
    runtime: &'a R,
    cache: &'a PackageCache<'a, R>,
}

impl<'a, R: Runtime> VersionResolver<'a, R> {
    pub fn new(runtime: &'a R, cache: &'a PackageCache<'a, R>) -> Self {
        Self { runtime, cache }
    }

    /// Pick the version of `name` to install.
    ///
    /// `request` is only shown to the operator. With several cached versions
    /// this blocks until the answer names one of them; any other answer is
    /// rejected and the prompt repeats.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, name: &str, request: &str, depth: usize) -> Result<String> {
        let versions = self.cache.versions(name)?;

        if let [only] = versions.as_slice() {
            debug!("Single cached version of {}: {}", name, only);
            return Ok(only.clone());
        }

        let pad = indent(depth);
        println!("{}[{}] Requested: {}", pad, name, request);
        let choices = format!("{}{} :=> ", pad, versions.join("; "));

        loop {
            let answer = self.runtime.prompt(&choices)?;
            let answer = answer.trim();
            if let Some(version) = versions.iter().find(|v| v.as_str() == answer) {
                return Ok(version.clone());
            }
            println!("{}Not found!", pad);
        }
    }
}
