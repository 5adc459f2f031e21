pub mod endpoint;
pub mod env;
pub mod exec;
pub mod list;
pub mod package;
pub mod run;
pub mod run_many;
