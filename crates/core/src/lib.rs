//! devops Core Library
//!
//! This is the core library for the devops monorepo runner. It finds the
//! projects of a monorepo, validates the environment they run in, and hands
//! scripts and package-manager commands to external processes.
//!
//! ## Architecture
//!
//! - [`monorepo`] - High-level interface used by the command line
//! - [`discovery`] - Project discovery and the cached [`ProjectRegistry`]
//! - [`configs`] - Parsing of `pyproject.toml` manifests and `env.yaml` requirements
//! - [`env`] - Environment loading and validation
//! - [`services`] - Service port and endpoint lookup
//! - [`scripts`] - Resolution of `project:script` targets
//! - [`execution`] - Subprocess, package-manager and GNU `parallel` execution
//! - [`types`] - Common error type and result alias

pub mod configs;
pub mod discovery;
pub mod env;
pub mod execution;
pub mod monorepo;
pub mod scripts;
pub mod services;
pub mod types;

// Re-export the main types for easier usage
pub use discovery::{Project, ProjectRegistry, Projects};
pub use monorepo::Monorepo;
pub use types::{DevopsError, DevopsResult};
