//! Project discovery
//!
//! Walks the monorepo looking for `pyproject.toml` manifests and builds the
//! name -> [`Project`] map. Results are cached in a [`ProjectRegistry`].

use std::collections::{BTreeMap, VecDeque};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};

use crate::configs::manifest::{read_manifest, MANIFEST_FILE};
use crate::types::{DevopsError, DevopsResult};

/// Environment variable overriding the discovery root
pub const ROOT_ENV_VAR: &str = "MONOREPO_ROOT";

/// Directories that never contain projects of their own.
/// `.venv` is the dot-prefixed spelling of a virtual environment.
const EXCLUDED_DIR_GLOBS: &[&str] = &["**/venv", "**/.venv", "**/node_modules", "**/.git"];

/// A project discovered in the monorepo
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub scripts: BTreeMap<String, String>,
    pub deployment: toml::Table,
}

impl Project {
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }
}

/// Discovered projects keyed by name
pub type Projects = BTreeMap<String, Project>;

/// Process-wide cache of discovered projects.
///
/// The first call to [`ProjectRegistry::discover`] scans the filesystem; every
/// later call returns the same map until [`ProjectRegistry::reset`].
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    cache: Mutex<Option<Arc<Projects>>>,
}

static GLOBAL_REGISTRY: ProjectRegistry = ProjectRegistry::new();

impl ProjectRegistry {
    pub const fn new() -> Self {
        Self {
            cache: Mutex::new(None),
        }
    }

    /// Registry shared by the whole process
    pub fn global() -> &'static ProjectRegistry {
        &GLOBAL_REGISTRY
    }

    /// Discover projects under [`monorepo_root`], or return the cached result
    pub fn discover(&self) -> DevopsResult<Arc<Projects>> {
        self.get_or_scan(monorepo_root)
    }

    /// Discover projects under `root`, or return the cached result.
    /// `root` is ignored once the cache is populated.
    pub fn discover_in(&self, root: &Path) -> DevopsResult<Arc<Projects>> {
        self.get_or_scan(|| Ok(root.to_path_buf()))
    }

    /// Drop the cached projects so the next call rescans
    pub fn reset(&self) {
        *self.lock() = None;
    }

    pub fn is_populated(&self) -> bool {
        self.lock().is_some()
    }

    fn get_or_scan(
        &self,
        root: impl FnOnce() -> DevopsResult<PathBuf>,
    ) -> DevopsResult<Arc<Projects>> {
        let mut cache = self.lock();
        if let Some(projects) = cache.as_ref() {
            return Ok(Arc::clone(projects));
        }

        let root = canonical_root(&root()?)?;
        let projects = Arc::new(discover_projects(&root));
        *cache = Some(Arc::clone(&projects));
        Ok(projects)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<Projects>>> {
        // The cache is only ever replaced wholesale, so a poisoned lock still holds a valid value
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Root of the monorepo: `MONOREPO_ROOT` when set, else the current directory
pub fn monorepo_root() -> DevopsResult<PathBuf> {
    match env::var(ROOT_ENV_VAR) {
        Ok(root) if !root.is_empty() => Ok(PathBuf::from(root)),
        _ => Ok(env::current_dir()?),
    }
}

fn canonical_root(root: &Path) -> DevopsResult<PathBuf> {
    fs::canonicalize(root).map_err(|e| {
        DevopsError::Path(format!(
            "Cannot resolve monorepo root {}: {}",
            root.display(),
            e
        ))
    })
}

/// Scan `root` for projects without touching any cache.
///
/// Manifests that fail to parse or declare no name are logged and skipped.
/// When two manifests declare the same name, the one with the
/// lexicographically greater path wins.
pub fn discover_projects(root: &Path) -> Projects {
    let mut projects = Projects::new();

    for manifest_path in find_files_named(root, MANIFEST_FILE) {
        let Some(project_dir) = manifest_path.parent() else {
            continue;
        };
        if project_dir == root {
            continue;
        }

        match read_manifest(&manifest_path) {
            Ok(Some(record)) => {
                if let Some(previous) = projects.get(&record.name) {
                    debug!(
                        project = %record.name,
                        replaced = %previous.path.display(),
                        "duplicate project name"
                    );
                }
                projects.insert(
                    record.name.clone(),
                    Project {
                        name: record.name,
                        path: project_dir.to_path_buf(),
                        scripts: record.scripts,
                        deployment: record.deployment,
                    },
                );
            }
            Ok(None) => {
                debug!(manifest = %manifest_path.display(), "manifest has no project name, skipping");
            }
            Err(e) => warn!("{}", e),
        }
    }

    info!(
        "Workspace discovery initialized. Projects found: {}",
        projects.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    projects
}

/// Find every file called `file_name` below `root`, skipping vendor and VCS
/// directories. The result is sorted by path.
pub fn find_files_named(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let excluded = excluded_dir_set();
    let mut found = Vec::new();

    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        let entries = match fs::read_dir(&current_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %current_dir.display(), error = %e, "cannot read directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                let relative_path = path.strip_prefix(root).unwrap_or(&path);
                if !excluded.is_match(relative_path) {
                    queue.push_back(path);
                }
            } else if entry.file_name() == file_name {
                found.push(path);
            }
        }
    }

    found.sort();
    found
}

fn excluded_dir_set() -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in EXCLUDED_DIR_GLOBS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}
