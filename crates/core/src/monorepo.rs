//! High-level monorepo interface
//!
//! [`Monorepo`] ties a root directory to a [`ProjectRegistry`] and is what the
//! command-line layer talks to. Core components never reach for the global
//! registry themselves; only [`Monorepo::from_env`] does.
//!
//! ```rust,no_run
//! use devops_core::Monorepo;
//!
//! # fn example() -> devops_core::DevopsResult<()> {
//! let monorepo = Monorepo::from_env()?;
//! monorepo.load_env("development")?;
//!
//! let report = monorepo.validate_env()?;
//! if report.is_valid() {
//!     let invocation = monorepo.resolve_script("api:serve", &[])?;
//!     println!("{}", invocation.argv.join(" "));
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::discovery::{monorepo_root, ProjectRegistry, Projects};
use crate::env::loader::load_env_vars;
use crate::env::validation::{EnvValidator, ValidationReport};
use crate::scripts::{resolve_script, ScriptInvocation};
use crate::services::{is_kubernetes, resolve_service_endpoint};
use crate::types::DevopsResult;

pub struct Monorepo<'r> {
    root: PathBuf,
    registry: &'r ProjectRegistry,
}

impl Monorepo<'static> {
    /// Monorepo at `MONOREPO_ROOT` (or the current directory) backed by the
    /// process-wide registry
    pub fn from_env() -> DevopsResult<Self> {
        Ok(Self::new(monorepo_root()?, ProjectRegistry::global()))
    }
}

impl<'r> Monorepo<'r> {
    pub fn new(root: impl Into<PathBuf>, registry: &'r ProjectRegistry) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovered projects; scanned once per registry
    pub fn projects(&self) -> DevopsResult<Arc<Projects>> {
        self.registry.discover_in(&self.root)
    }

    /// Load `config/.env.<env>` and `config/.env.global` into the process
    pub fn load_env(&self, env: &str) -> DevopsResult<Vec<PathBuf>> {
        load_env_vars(env, &self.root)
    }

    /// Validate the process environment against every `env.yaml`
    pub fn validate_env(&self) -> DevopsResult<ValidationReport> {
        EnvValidator::new(&self.root).validate()
    }

    pub fn resolve_script(
        &self,
        spec: &str,
        extra_args: &[String],
    ) -> DevopsResult<ScriptInvocation> {
        let projects = self.projects()?;
        resolve_script(&projects, spec, extra_args)
    }

    /// Base URL of `service_name`, honouring `IS_KUBERNETES`
    pub fn resolve_endpoint(&self, service_name: &str) -> DevopsResult<Option<String>> {
        let projects = self.projects()?;
        resolve_service_endpoint(&projects, service_name, is_kubernetes())
    }
}
