use std::fmt;
use std::path::Path;

use colored::*;

use crate::configs::manifest::MANIFEST_FILE;
use crate::discovery::Projects;
use crate::execution::command::CommandExecutor;
use crate::types::{DevopsError, DevopsResult};

/// Package managers whose commands can be fanned out over every project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Uv,
    Poetry,
}

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Uv => "uv",
            PackageManager::Poetry => "poetry",
        }
    }

    fn argv(self, args: &[String]) -> Vec<String> {
        let mut argv = vec![self.program().to_string()];
        argv.extend(args.iter().cloned());
        argv
    }

    /// Run `<program> args...` in `current_dir` when it holds a manifest, then
    /// sequentially in every project. Stops at the first failure.
    pub fn run_everywhere(
        self,
        args: &[String],
        current_dir: &Path,
        projects: &Projects,
    ) -> DevopsResult<()> {
        if args.is_empty() {
            return Err(DevopsError::Execution(format!(
                "No {} command specified",
                self.program()
            )));
        }
        let command_line = format!("{} {}", self.program(), args.join(" "));

        if current_dir.join(MANIFEST_FILE).is_file() {
            println!(
                "{}",
                format!(
                    "Found {} in current directory, running {}...",
                    MANIFEST_FILE, command_line
                )
                .yellow()
            );
            CommandExecutor::new(current_dir)
                .run_checked(&self.argv(args))
                .map_err(|e| {
                    DevopsError::Execution(format!(
                        "{} failed in current directory: {}",
                        command_line, e
                    ))
                })?;
        }

        if projects.is_empty() {
            return Err(DevopsError::Project("No projects found".to_string()));
        }

        println!("Running '{}' for {} projects:", command_line, projects.len());
        for (name, project) in projects {
            println!("  - {} ({})", name, project.path.display());
            println!(
                "\n{}",
                format!("Running {} in {}...", command_line, project.path.display()).yellow()
            );

            CommandExecutor::new(&project.path)
                .run_checked(&self.argv(args))
                .map_err(|e| {
                    DevopsError::Execution(format!(
                        "{} failed for project '{}': {}",
                        command_line, name, e
                    ))
                })?;
        }

        Ok(())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_names() {
        assert_eq!(PackageManager::Uv.program(), "uv");
        assert_eq!(PackageManager::Poetry.to_string(), "poetry");
    }

    #[test]
    fn requires_a_command() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = PackageManager::Uv
            .run_everywhere(&[], temp_dir.path(), &Projects::new())
            .unwrap_err();
        assert!(err.to_string().contains("No uv command specified"));
    }

    #[test]
    fn fails_without_projects() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = PackageManager::Poetry
            .run_everywhere(&["install".to_string()], temp_dir.path(), &Projects::new())
            .unwrap_err();
        assert!(matches!(err, DevopsError::Project(_)));
    }
}
