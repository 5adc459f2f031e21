use anyhow::Result;
use colored::*;
use devops_core::Monorepo;

pub fn execute(monorepo: &Monorepo, service_name: &str) -> Result<i32> {
    match monorepo.resolve_endpoint(service_name)? {
        Some(endpoint) => {
            println!("{}", endpoint);
            Ok(0)
        }
        None => {
            eprintln!(
                "{} No project declares service '{}'",
                "Error:".red().bold(),
                service_name
            );
            Ok(1)
        }
    }
}
