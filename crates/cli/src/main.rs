use anyhow::Result;
use clap::{Parser, Subcommand};
use devops_core::env::loader::DEFAULT_ENV;
use devops_core::execution::PackageManager;
use devops_core::Monorepo;

mod commands;
mod logging;

/// devops - A monorepo task runner
#[derive(Parser)]
#[command(name = "devops")]
#[command(about = "Run scripts and package-manager commands across a monorepo")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script in a specific project
    Run {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
        /// Script to run, in the form "project:script"
        target: String,
        /// Additional arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        script_args: Vec<String>,
    },
    /// Run a script concurrently in all projects that define it
    RunMany {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
        /// Kill all other running processes if one fails
        #[arg(long)]
        kill_others_on_fail: bool,
        /// Name of the script to run
        script_name: String,
        /// Additional arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        script_args: Vec<String>,
    },
    /// Execute a command in a project directory
    Exec {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
        /// Project to execute the command in
        #[arg(long = "in")]
        project: String,
        /// Command and its arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a uv command in every discovered project
    Uv {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
        /// Arguments passed to uv
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a poetry command in every discovered project
    Poetry {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
        /// Arguments passed to poetry
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List discovered projects and their scripts
    List,
    /// Inspect environment variables
    Env {
        #[command(subcommand)]
        env_command: EnvCommands,
    },
    /// Print the endpoint of a service
    Endpoint {
        /// Logical service name from `tool.devops.deployment.service_name`
        service_name: String,
    },
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Validate environment variables against every env.yaml
    Check {
        /// Environment to load
        #[arg(long, default_value = DEFAULT_ENV)]
        env: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let monorepo = Monorepo::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to locate monorepo root: {}", e))?;

    // Commands that spawn processes report the child's exit code
    let exit_code = match cli.command {
        Commands::Run {
            env,
            target,
            script_args,
        } => commands::run::execute(&monorepo, &env, &target, &script_args)?,
        Commands::RunMany {
            env,
            kill_others_on_fail,
            script_name,
            script_args,
        } => commands::run_many::execute(
            &monorepo,
            &env,
            &script_name,
            kill_others_on_fail,
            &script_args,
        )?,
        Commands::Exec { env, project, args } => {
            commands::exec::execute(&monorepo, &env, &project, &args)?
        }
        Commands::Uv { env, args } => {
            commands::package::execute(&monorepo, PackageManager::Uv, &env, &args)?
        }
        Commands::Poetry { env, args } => {
            commands::package::execute(&monorepo, PackageManager::Poetry, &env, &args)?
        }
        Commands::List => commands::list::execute(&monorepo)?,
        Commands::Env { env_command } => match env_command {
            EnvCommands::Check { env } => commands::env::execute(&monorepo, &env)?,
        },
        Commands::Endpoint { service_name } => {
            commands::endpoint::execute(&monorepo, &service_name)?
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
