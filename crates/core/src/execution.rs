//! Process execution
//!
//! This module hands resolved work to external processes: single commands in a
//! project directory, package-manager passthrough across all projects, and
//! GNU `parallel` for running one script in many projects at once.

pub mod command;
pub mod package_manager;
pub mod parallel;

pub use command::CommandExecutor;
pub use package_manager::PackageManager;
pub use parallel::ParallelPlan;
