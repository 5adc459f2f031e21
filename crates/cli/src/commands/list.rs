use anyhow::Result;
use colored::*;
use devops_core::Monorepo;

pub fn execute(monorepo: &Monorepo) -> Result<i32> {
    let projects = monorepo.projects()?;

    println!("{}", "Projects".bold().underline());

    if projects.is_empty() {
        println!("  {}", "No projects found".dimmed());
        return Ok(0);
    }

    for project in projects.values() {
        println!(
            "{} {}",
            project.name.blue().bold(),
            project.path.display().to_string().dimmed()
        );

        if project.scripts.is_empty() {
            println!("  {}", "no scripts".dimmed());
        }
        for (script_name, command) in &project.scripts {
            println!("  {} {}", format!("{}:", script_name).cyan(), command);
        }
    }

    Ok(0)
}
