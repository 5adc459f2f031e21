use anyhow::Result;
use colored::*;
use devops_core::execution::CommandExecutor;
use devops_core::Monorepo;

pub fn execute(
    monorepo: &Monorepo,
    env: &str,
    target: &str,
    script_args: &[String],
) -> Result<i32> {
    let invocation = monorepo.resolve_script(target, script_args)?;

    monorepo
        .load_env(env)
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    if !super::env::validate(monorepo)? {
        println!("{}", "Environment validation failed. Aborting command.".red());
        return Ok(1);
    }

    let exit_code = CommandExecutor::new(&invocation.working_dir)
        .run(&invocation.argv)
        .map_err(|e| anyhow::anyhow!("Failed to run script: {}", e))?;

    Ok(exit_code)
}
