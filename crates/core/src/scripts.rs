//! Resolution of `project:script` targets against discovered projects

use std::path::PathBuf;

use crate::discovery::{Project, Projects};
use crate::types::{DevopsError, DevopsResult};

/// Program every project script is executed through
pub const SCRIPT_RUNNER: &[&str] = &["uv", "run"];

/// A script ready to hand to a [`crate::execution::CommandExecutor`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInvocation {
    pub project_name: String,
    pub script_name: String,
    pub working_dir: PathBuf,
    pub argv: Vec<String>,
}

/// Split `project:script` on the first colon
pub fn parse_script_spec(spec: &str) -> DevopsResult<(&str, &str)> {
    spec.split_once(':').ok_or_else(|| {
        DevopsError::Script(format!(
            "Invalid script specification '{}'. Expected format 'project:script'",
            spec
        ))
    })
}

/// Drop a leading `--` separator from pass-through arguments
pub fn strip_separator(args: &[String]) -> &[String] {
    match args.split_first() {
        Some((first, rest)) if first == "--" => rest,
        _ => args,
    }
}

/// Look up a project by name, listing the available ones on failure
pub fn find_project<'a>(projects: &'a Projects, name: &str) -> DevopsResult<&'a Project> {
    projects.get(name).ok_or_else(|| {
        DevopsError::Project(format!(
            "Project '{}' not found. Available projects: {}",
            name,
            projects.keys().cloned().collect::<Vec<_>>().join(", ")
        ))
    })
}

/// Resolve `spec` into the command line running the script in its project.
///
/// The script string is split with shell quoting rules and prefixed with
/// [`SCRIPT_RUNNER`]; `extra_args` are appended.
pub fn resolve_script(
    projects: &Projects,
    spec: &str,
    extra_args: &[String],
) -> DevopsResult<ScriptInvocation> {
    let (project_name, script_name) = parse_script_spec(spec)?;
    let project = find_project(projects, project_name)?;

    let Some(script) = project.script(script_name) else {
        let available = if project.scripts.is_empty() {
            format!("No scripts defined in project '{}'.", project_name)
        } else {
            format!(
                "Available scripts: {}",
                project.scripts.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        };
        return Err(DevopsError::Script(format!(
            "Script '{}' not found in project '{}'. {}",
            script_name, project_name, available
        )));
    };

    let script_argv = shlex::split(script).ok_or_else(|| {
        DevopsError::Script(format!(
            "Script '{}' in project '{}' has unbalanced quoting: {}",
            script_name, project_name, script
        ))
    })?;

    let mut argv: Vec<String> = SCRIPT_RUNNER.iter().map(|s| s.to_string()).collect();
    argv.extend(script_argv);
    argv.extend(strip_separator(extra_args).iter().cloned());

    Ok(ScriptInvocation {
        project_name: project_name.to_string(),
        script_name: script_name.to_string(),
        working_dir: project.path.clone(),
        argv,
    })
}

/// Projects defining `script_name`, in registry order
pub fn projects_with_script<'a>(projects: &'a Projects, script_name: &str) -> Vec<&'a Project> {
    projects
        .values()
        .filter(|project| project.scripts.contains_key(script_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Projects {
        let mut api = Project {
            name: "api".to_string(),
            path: PathBuf::from("/repo/services/api"),
            scripts: Default::default(),
            deployment: Default::default(),
        };
        api.scripts
            .insert("serve".to_string(), "uvicorn app:main --port '8000'".to_string());
        api.scripts.insert("test".to_string(), "pytest".to_string());

        let mut worker = Project {
            name: "worker".to_string(),
            path: PathBuf::from("/repo/services/worker"),
            scripts: Default::default(),
            deployment: Default::default(),
        };
        worker.scripts.insert("test".to_string(), "pytest -q".to_string());

        let lib = Project {
            name: "lib".to_string(),
            path: PathBuf::from("/repo/libs/lib"),
            scripts: Default::default(),
            deployment: Default::default(),
        };

        [api, worker, lib]
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect()
    }

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn splits_spec_on_first_colon() {
        assert_eq!(parse_script_spec("api:serve").unwrap(), ("api", "serve"));
        assert_eq!(parse_script_spec("api:db:migrate").unwrap(), ("api", "db:migrate"));
        assert!(parse_script_spec("api").is_err());
    }

    #[test]
    fn resolves_script_with_extra_args() {
        let invocation =
            resolve_script(&projects(), "api:serve", &args(&["--", "--reload"])).unwrap();

        assert_eq!(invocation.working_dir, PathBuf::from("/repo/services/api"));
        assert_eq!(
            invocation.argv,
            args(&["uv", "run", "uvicorn", "app:main", "--port", "8000", "--reload"])
        );
    }

    #[test]
    fn unknown_project_lists_available_projects() {
        let err = resolve_script(&projects(), "billing:serve", &[]).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Project 'billing' not found"));
        assert!(message.contains("api, lib, worker"));
    }

    #[test]
    fn unknown_script_lists_available_scripts() {
        let err = resolve_script(&projects(), "api:deploy", &[]).unwrap_err();
        assert!(err.to_string().contains("Available scripts: serve, test"));

        let err = resolve_script(&projects(), "lib:test", &[]).unwrap_err();
        assert!(err.to_string().contains("No scripts defined in project 'lib'"));
    }

    #[test]
    fn finds_projects_defining_a_script() {
        let projects = projects();
        let names: Vec<_> = projects_with_script(&projects, "test")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(names, vec!["api", "worker"]);
        assert!(projects_with_script(&projects, "lint").is_empty());
    }

    #[test]
    fn separator_is_only_stripped_when_leading() {
        assert_eq!(strip_separator(&args(&["--", "-x"])), &args(&["-x"])[..]);
        assert_eq!(strip_separator(&args(&["-x", "--"])), &args(&["-x", "--"])[..]);
    }
}
