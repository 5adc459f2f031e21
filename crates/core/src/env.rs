//! Environment loading and validation
//!
//! - [`loader`] loads `config/.env.<env>` and `config/.env.global` into the process
//! - [`validation`] checks the environment against every `env.yaml` in the repo

use std::collections::HashMap;

pub mod loader;
pub mod validation;

/// Where variable values are read from during validation
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The live process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
