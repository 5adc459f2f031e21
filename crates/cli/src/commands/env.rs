use anyhow::Result;
use colored::*;
use devops_core::env::validation::ValidationReport;
use devops_core::Monorepo;

pub fn execute(monorepo: &Monorepo, env: &str) -> Result<i32> {
    monorepo
        .load_env(env)
        .map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    if validate(monorepo)? {
        println!(
            "{} {}",
            "✓".green().bold(),
            "Environment is valid".green().bold()
        );
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Validate the current environment and print warnings and errors.
/// Returns whether the environment is valid.
pub fn validate(monorepo: &Monorepo) -> Result<bool> {
    let report = monorepo
        .validate_env()
        .map_err(|e| anyhow::anyhow!("Environment validation failed: {}", e))?;

    print_report(&report);
    Ok(report.is_valid())
}

fn print_report(report: &ValidationReport) {
    if !report.unused.is_empty() {
        println!(
            "{}",
            "WARNING: some env variables exist in .env but not in env.yaml:".yellow()
        );
        for unused in &report.unused {
            let files = unused
                .files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("\t{} in: {}", unused.name, files);
        }
        println!();
    }

    for (variable, errors) in report.errors_by_variable() {
        println!("{}", format!("Errors for {}:", variable).red());
        for error in errors {
            println!("\t{}", error);
        }
        println!();
    }
}
