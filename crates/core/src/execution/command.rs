//! Command execution utilities
//!
//! [`CommandExecutor`] runs a program in a fixed working directory with
//! inherited stdio and reports the child's exit code.

use std::path::{Path, PathBuf};
use std::process::Command;

use colored::*;
use tracing::debug;

use crate::types::{DevopsError, DevopsResult};

/// Exit code reported when a child was terminated by a signal
const SIGNALED_EXIT_CODE: i32 = 1;

/// Runs commands inside one directory
pub struct CommandExecutor {
    working_dir: PathBuf,
}

impl CommandExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run `argv[0]` with the remaining arguments and return its exit code
    pub fn run(&self, argv: &[String]) -> DevopsResult<i32> {
        let Some((program, args)) = argv.split_first() else {
            return Err(DevopsError::Execution("No command specified".to_string()));
        };

        println!(
            "{}",
            format!(
                "Executing: {} in {}\n",
                argv.join(" "),
                self.working_dir.display()
            )
            .yellow()
        );

        let mut command = Command::new(program);
        command.args(args).current_dir(&self.working_dir);
        self.execute_command(&mut command, program)
    }

    /// Run `program` and fail unless it exits successfully
    pub fn run_checked(&self, argv: &[String]) -> DevopsResult<()> {
        match self.run(argv)? {
            0 => Ok(()),
            code => Err(DevopsError::Execution(format!(
                "{} failed in {} with exit code {}",
                argv.join(" "),
                self.working_dir.display(),
                code
            ))),
        }
    }

    fn execute_command(&self, command: &mut Command, program: &str) -> DevopsResult<i32> {
        let status = command.status().map_err(|e| {
            DevopsError::Execution(format!("Failed to execute command '{}': {}", program, e))
        })?;

        debug!(program, status = %status, "command finished");
        Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE))
    }
}
