//! Configuration files read by the runner: project manifests and
//! environment requirements.

pub mod manifest;
pub mod requirements;
