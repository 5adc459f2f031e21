use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{DevopsError, DevopsResult};

/// File name that marks a directory as a project
pub const MANIFEST_FILE: &str = "pyproject.toml";

#[derive(Deserialize, Default)]
struct ManifestFile {
    project: Option<ProjectSection>,
    #[serde(default)]
    tool: ToolSection,
}

#[derive(Deserialize)]
struct ProjectSection {
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct ToolSection {
    #[serde(default)]
    devops: DevopsSection,
}

#[derive(Deserialize, Default)]
struct DevopsSection {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
    #[serde(default)]
    deployment: toml::Table,
}

/// The parts of a `pyproject.toml` the runner cares about
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRecord {
    pub name: String,
    pub scripts: BTreeMap<String, String>,
    pub deployment: toml::Table,
}

/// Parse manifest contents.
///
/// Returns `Ok(None)` when the manifest has no `project.name`; such manifests
/// are not projects.
pub fn parse_manifest(path: &Path, contents: &str) -> DevopsResult<Option<ManifestRecord>> {
    let manifest: ManifestFile = toml::from_str(contents).map_err(|e| manifest_error(path, e))?;

    let Some(name) = manifest.project.and_then(|project| project.name) else {
        return Ok(None);
    };

    Ok(Some(ManifestRecord {
        name,
        scripts: manifest.tool.devops.scripts,
        deployment: manifest.tool.devops.deployment,
    }))
}

/// Read and parse the manifest at `path`
pub fn read_manifest(path: &Path) -> DevopsResult<Option<ManifestRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| manifest_error(path, e))?;
    parse_manifest(path, &contents)
}

fn manifest_error(path: &Path, error: impl std::fmt::Display) -> DevopsError {
    DevopsError::ManifestParse {
        path: PathBuf::from(path),
        message: error.to_string(),
    }
}
