//! Concurrent script execution through GNU `parallel`
//!
//! Each project gets its own `devops run <project>:<script>` job; `parallel`
//! prefixes every output line with the project name.

use std::path::PathBuf;

use crate::types::{DevopsError, DevopsResult};

pub const PARALLEL_PROGRAM: &str = "parallel";

/// Command line for running one script across several projects
#[derive(Debug, Clone)]
pub struct ParallelPlan {
    /// Program invoked once per project to run the script
    pub runner: String,
    pub env: String,
    pub script_name: String,
    pub project_names: Vec<String>,
    pub kill_others_on_fail: bool,
    pub script_args: Vec<String>,
}

impl ParallelPlan {
    /// Full argv, starting with `parallel`
    pub fn argv(&self) -> Vec<String> {
        let mut argv: Vec<String> = [
            PARALLEL_PROGRAM,
            "--link",
            "--tagstring",
            "[{1}]",
            "--line-buffer",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if self.kill_others_on_fail {
            argv.push("--halt".to_string());
            argv.push("now,fail=1".to_string());
        }

        argv.push(self.job_command());
        argv.push(":::".to_string());
        argv.extend(self.project_names.iter().cloned());
        argv
    }

    /// Command template `parallel` runs for every project, `{1}` being the
    /// project name
    fn job_command(&self) -> String {
        // `{1}` stays outside the quotes so parallel can substitute it
        let mut parts = vec![
            quote(&self.runner),
            "run".to_string(),
            "--env".to_string(),
            quote(&self.env),
            format!("{{1}}:{}", quote(&self.script_name)),
        ];
        if !self.script_args.is_empty() {
            parts.push("--".to_string());
            parts.extend(self.script_args.iter().map(|arg| quote(arg)));
        }
        parts.join(" ")
    }
}

fn quote(part: &str) -> String {
    shlex::try_quote(part)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| part.to_string())
}

/// Locate `parallel` on `PATH`
pub fn find_parallel() -> DevopsResult<PathBuf> {
    which::which(PARALLEL_PROGRAM).map_err(|_| {
        DevopsError::Execution(
            "GNU parallel is not installed. Please install it to use the run-many command.\n\
             On macOS: brew install parallel\n\
             On Ubuntu/Debian: apt-get install parallel\n\
             On CentOS/RHEL: yum install parallel"
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(kill_others_on_fail: bool, script_args: &[&str]) -> ParallelPlan {
        ParallelPlan {
            runner: "devops".to_string(),
            env: "development".to_string(),
            script_name: "test".to_string(),
            project_names: vec!["api".to_string(), "worker".to_string()],
            kill_others_on_fail,
            script_args: script_args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn job(argv: &[String]) -> Vec<String> {
        let separator = argv.iter().position(|a| a == ":::").unwrap();
        shlex::split(&argv[separator - 1]).unwrap()
    }

    #[test]
    fn builds_parallel_command_line() {
        let argv = plan(false, &[]).argv();

        assert_eq!(
            argv[..5],
            ["parallel", "--link", "--tagstring", "[{1}]", "--line-buffer"]
        );
        assert_eq!(
            job(&argv),
            vec!["devops", "run", "--env", "development", "{1}:test"]
        );
        assert_eq!(argv[argv.len() - 3..], [":::", "api", "worker"]);
    }

    #[test]
    fn halts_on_failure_only_when_requested() {
        let argv = plan(true, &[]).argv();
        let halt = argv.iter().position(|a| a == "--halt").unwrap();
        assert_eq!(argv[halt + 1], "now,fail=1");

        assert!(!plan(false, &[]).argv().contains(&"--halt".to_string()));
    }

    #[test]
    fn script_args_are_quoted() {
        let argv = plan(false, &["-k", "slow tests"]).argv();
        assert_eq!(
            job(&argv),
            vec!["devops", "run", "--env", "development", "{1}:test", "--", "-k", "slow tests"]
        );
    }

    #[test]
    fn script_name_with_spaces_stays_one_target() {
        let mut migrate = plan(false, &[]);
        migrate.script_name = "db migrate".to_string();

        assert_eq!(
            job(&migrate.argv()),
            vec!["devops", "run", "--env", "development", "{1}:db migrate"]
        );
    }
}
