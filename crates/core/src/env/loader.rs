use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::discovery::ROOT_ENV_VAR;
use crate::types::{DevopsError, DevopsResult};

/// Environment variable exported with the selected environment name
pub const ENV_NAME_VAR: &str = "MONOREPO_ENV";

/// Environment used when none is given
pub const DEFAULT_ENV: &str = "development";

/// Files loaded for `env`, in load order. Earlier files win because
/// variables that are already set are never overwritten.
pub fn env_files(root: &Path, env: &str) -> Vec<PathBuf> {
    let config_dir = root.join("config");
    vec![
        config_dir.join(format!(".env.{}", env)),
        config_dir.join(".env.global"),
    ]
}

/// Load `config/.env.<env>` then `config/.env.global` below `root` into the
/// process environment, and export `MONOREPO_ROOT` and `MONOREPO_ENV`.
///
/// Missing files are skipped. Variables already present in the environment
/// keep their values.
pub fn load_env_vars(env: &str, root: &Path) -> DevopsResult<Vec<PathBuf>> {
    info!("Loading environment variables for {} in {}", env, root.display());

    let mut loaded = Vec::new();
    for path in env_files(root, env) {
        if !path.is_file() {
            debug!(file = %path.display(), "env file not found, skipping");
            continue;
        }
        dotenvy::from_path(&path).map_err(|e| {
            DevopsError::EnvFile(format!(
                "Failed to load {}: {}",
                path.display(),
                e
            ))
        })?;
        loaded.push(path);
    }

    env::set_var(ROOT_ENV_VAR, root);
    env::set_var(ENV_NAME_VAR, env);

    Ok(loaded)
}
