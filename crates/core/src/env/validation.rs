use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::configs::requirements::{
    parse_requirements, RequirementKind, Requirements, REQUIREMENTS_FILE,
};
use crate::discovery::{find_files_named, monorepo_root};
use crate::env::{EnvSource, ProcessEnv};
use crate::types::{DevopsError, DevopsResult};

/// Dotenv file holding repo-wide values, relative to the monorepo root
pub const GLOBAL_ENV_FILE: &str = "config/.env.global";

/// Why a variable failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingRequired,
    InvalidBoolean { value: String },
    InvalidEnum { value: String, allowed: Vec<String> },
}

/// One variable that does not satisfy its requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub variable: String,
    pub kind: ViolationKind,
    /// Requirements file declaring the variable, relative to the monorepo root
    pub file: PathBuf,
}

impl ValidationError {
    pub fn message(&self) -> String {
        match &self.kind {
            ViolationKind::MissingRequired => {
                format!("{} is required but missing", self.variable)
            }
            ViolationKind::InvalidBoolean { value } => format!(
                "{} must be either true or false. Value: {}",
                self.variable, value
            ),
            ViolationKind::InvalidEnum { value, allowed } => format!(
                "{} must be one of {}. Value: {}",
                self.variable,
                allowed.join(", "),
                value
            ),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {}: {}", self.file.display(), self.message())
    }
}

/// A variable defined in a global dotenv file that no `env.yaml` declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedVariable {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// Outcome of a validation run
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub requirement_files: Vec<PathBuf>,
    pub errors: Vec<ValidationError>,
    pub unused: Vec<UnusedVariable>,
}

impl ValidationReport {
    /// Unused variables are warnings and never make a report invalid
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors_by_variable(&self) -> BTreeMap<&str, Vec<&ValidationError>> {
        let mut grouped: BTreeMap<&str, Vec<&ValidationError>> = BTreeMap::new();
        for error in &self.errors {
            grouped.entry(error.variable.as_str()).or_default().push(error);
        }
        grouped
    }
}

/// Validates environment variables against every `env.yaml` under a root
#[derive(Debug, Clone)]
pub struct EnvValidator {
    root: PathBuf,
}

impl EnvValidator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Validator rooted at `MONOREPO_ROOT` or the current directory
    pub fn from_env() -> DevopsResult<Self> {
        Ok(Self::new(monorepo_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn requirement_files(&self) -> Vec<PathBuf> {
        find_files_named(&self.root, REQUIREMENTS_FILE)
    }

    pub fn global_env_files(&self) -> Vec<PathBuf> {
        let path = self.root.join(GLOBAL_ENV_FILE);
        if path.is_file() {
            vec![path]
        } else {
            Vec::new()
        }
    }

    /// Validate against the live process environment
    pub fn validate(&self) -> DevopsResult<ValidationReport> {
        self.validate_with(&ProcessEnv)
    }

    /// Validate against `env`.
    ///
    /// A malformed requirements file aborts the whole run. Every other problem
    /// is collected into the returned report.
    pub fn validate_with(&self, env: &dyn EnvSource) -> DevopsResult<ValidationReport> {
        let requirement_files = self.requirement_files();
        if requirement_files.is_empty() {
            info!("No env.yaml files found");
            return Ok(ValidationReport::default());
        }

        let mut report = ValidationReport::default();
        let mut known = BTreeSet::new();

        for file in requirement_files {
            let requirements = match parse_requirements(&file) {
                Ok(requirements) => requirements,
                Err(DevopsError::FileNotFound(path)) => {
                    warn!("Skipping {}: does not exist", path.display());
                    continue;
                }
                Err(e) => return Err(e),
            };

            let relative = self.relative(&file);
            debug!(file = %relative.display(), count = requirements.len(), "checking requirements");

            known.extend(requirements.keys().cloned());
            report
                .errors
                .extend(check_requirements(&requirements, &relative, env));
            report.requirement_files.push(relative);
        }

        let mut defined_in: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for file in self.global_env_files() {
            let relative = self.relative(&file);
            for key in dotenv_keys(&file) {
                defined_in.entry(key).or_default().push(relative.clone());
            }
        }

        report.unused = defined_in
            .into_iter()
            .filter(|(name, _)| !known.contains(name))
            .map(|(name, files)| UnusedVariable { name, files })
            .collect();

        Ok(report)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

/// Check one file's requirements. Empty values count as unset.
pub fn check_requirements(
    requirements: &Requirements,
    file: &Path,
    env: &dyn EnvSource,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (variable, requirement) in requirements {
        let value = env.get(variable).filter(|value| !value.is_empty());

        let kind = match (requirement, value) {
            (RequirementKind::Optional, _) => None,
            (_, None) => Some(ViolationKind::MissingRequired),
            (RequirementKind::Required, Some(_)) => None,
            (RequirementKind::Boolean, Some(value)) => {
                if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
                    None
                } else {
                    Some(ViolationKind::InvalidBoolean { value })
                }
            }
            (RequirementKind::Enum(allowed), Some(value)) => {
                if allowed.contains(&value) {
                    None
                } else {
                    Some(ViolationKind::InvalidEnum {
                        value,
                        allowed: allowed.clone(),
                    })
                }
            }
        };

        if let Some(kind) = kind {
            errors.push(ValidationError {
                variable: variable.clone(),
                kind,
                file: file.to_path_buf(),
            });
        }
    }

    errors
}

/// Keys defined in a dotenv file; an unreadable file yields none
pub fn dotenv_keys(path: &Path) -> Vec<String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            warn!("Error parsing {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut keys = Vec::new();
    for item in iter {
        match item {
            Ok((key, _)) => keys.push(key),
            Err(e) => {
                warn!("Error parsing {}: {}", path.display(), e);
                return Vec::new();
            }
        }
    }
    keys
}
