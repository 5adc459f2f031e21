use anyhow::Result;
use devops_core::execution::PackageManager;
use devops_core::scripts::strip_separator;
use devops_core::Monorepo;

pub fn execute(
    monorepo: &Monorepo,
    package_manager: PackageManager,
    env: &str,
    args: &[String],
) -> Result<i32> {
    monorepo
        .load_env(env)
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    let projects = monorepo.projects()?;
    let current_dir = std::env::current_dir()?;

    package_manager
        .run_everywhere(strip_separator(args), &current_dir, &projects)
        .map_err(|e| anyhow::anyhow!("{} failed: {}", package_manager, e))?;

    Ok(0)
}
