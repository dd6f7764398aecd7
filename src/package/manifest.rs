use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::InstallError;
use crate::runtime::Runtime;

/// The subset of `package.json` the installer and lister care about.
///
/// Unknown fields are ignored. `dependencies` is kept in a `BTreeMap`, so
/// dependencies are always visited in alphabetical order.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
}

/// A declared `(name, version-request)` pair.
///
/// The request is advisory text for the operator and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    pub name: String,
    pub request: String,
}

/// Accept only `name` or `@scope/name`.
///
/// Package names become path segments under the cache root and the install
/// prefix, so empty, absolute, `.` and `..` segments are rejected.
pub fn check_package_name(name: &str) -> Result<(), InstallError> {
    let invalid = || InstallError::InvalidName {
        name: name.to_string(),
    };

    if name.contains('\\') || Path::new(name).is_absolute() {
        return Err(invalid());
    }

    let segments: Vec<&str> = name.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return Err(invalid());
    }

    match segments.as_slice() {
        [name] if !name.starts_with('@') => Ok(()),
        [scope, name] if scope.len() > 1 && scope.starts_with('@') && !name.starts_with('@') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

impl Manifest {
    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Failed to parse manifest {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Declared dependencies in alphabetical order. A missing field is empty.
    pub fn dependencies(&self) -> Vec<DependencyRequest> {
        self.dependencies
            .iter()
            .flatten()
            .map(|(name, request)| DependencyRequest {
                name: name.clone(),
                request: request.clone(),
            })
            .collect()
    }
}
