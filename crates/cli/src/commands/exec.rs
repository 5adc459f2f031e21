use anyhow::Result;
use devops_core::execution::CommandExecutor;
use devops_core::scripts::{find_project, strip_separator};
use devops_core::Monorepo;

pub fn execute(
    monorepo: &Monorepo,
    env: &str,
    project_name: &str,
    args: &[String],
) -> Result<i32> {
    let command = strip_separator(args);
    if command.is_empty() {
        anyhow::bail!(
            "No command specified to execute in project '{}'",
            project_name
        );
    }

    let projects = monorepo.projects()?;
    let project = find_project(&projects, project_name)?;

    monorepo
        .load_env(env)
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    let exit_code = CommandExecutor::new(&project.path)
        .run(command)
        .map_err(|e| anyhow::anyhow!("Error executing command: {}", e))?;

    Ok(exit_code)
}
