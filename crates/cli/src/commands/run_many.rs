use anyhow::Result;
use colored::*;
use devops_core::execution::parallel::find_parallel;
use devops_core::execution::{CommandExecutor, ParallelPlan};
use devops_core::scripts::{projects_with_script, strip_separator};
use devops_core::Monorepo;

pub fn execute(
    monorepo: &Monorepo,
    env: &str,
    script_name: &str,
    kill_others_on_fail: bool,
    script_args: &[String],
) -> Result<i32> {
    find_parallel()?;

    let projects = monorepo.projects()?;
    let matching = projects_with_script(&projects, script_name);

    if matching.is_empty() {
        println!("No projects found with script '{}'.", script_name);
        return Ok(0);
    }

    println!(
        "Found {} projects with script '{}':",
        matching.len(),
        script_name.cyan()
    );
    for project in &matching {
        println!(
            "  - {} ({})",
            project.name.blue().bold(),
            project.path.display()
        );
    }
    println!();

    let runner = std::env::current_exe()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "devops".to_string());

    let plan = ParallelPlan {
        runner,
        env: env.to_string(),
        script_name: script_name.to_string(),
        project_names: matching.iter().map(|p| p.name.clone()).collect(),
        kill_others_on_fail,
        script_args: strip_separator(script_args).to_vec(),
    };

    monorepo
        .load_env(env)
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    if !super::env::validate(monorepo)? {
        println!("{}", "Environment validation failed. Aborting command.".red());
        return Ok(1);
    }

    let exit_code = CommandExecutor::new(monorepo.root())
        .run(&plan.argv())
        .map_err(|e| anyhow::anyhow!("Failed to run parallel command: {}", e))?;

    Ok(exit_code)
}
