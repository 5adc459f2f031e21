//! Service port and endpoint lookup
//!
//! Projects declare where they are served under `tool.devops.deployment`:
//!
//! ```toml
//! [tool.devops.deployment]
//! service_name = "api"
//! port = 8000
//! ```

use std::env;

use toml::Value;

use crate::discovery::Projects;
use crate::types::{DevopsError, DevopsResult};

/// Set to `true` when running inside Kubernetes
pub const KUBERNETES_ENV_VAR: &str = "IS_KUBERNETES";

/// Port of the first project whose `deployment.service_name` is `service_name`.
///
/// Returns `Ok(None)` when no project declares the service, and
/// [`DevopsError::UnknownServicePort`] when the matching project's port is
/// missing or not a port number.
pub fn resolve_port(projects: &Projects, service_name: &str) -> DevopsResult<Option<u16>> {
    let matching = projects.values().find(|project| {
        project
            .deployment
            .get("service_name")
            .and_then(Value::as_str)
            == Some(service_name)
    });

    let Some(project) = matching else {
        return Ok(None);
    };

    let port = project.deployment.get("port");
    coerce_port(port).map(Some).ok_or_else(|| DevopsError::UnknownServicePort {
        service: service_name.to_string(),
        value: port.map_or_else(|| "<missing>".to_string(), Value::to_string),
    })
}

fn coerce_port(value: Option<&Value>) -> Option<u16> {
    match value? {
        Value::Integer(port) => u16::try_from(*port).ok(),
        Value::String(port) => port.trim().parse().ok(),
        Value::Float(port) if port.fract() == 0.0 && (0.0..=65535.0).contains(port) => {
            Some(*port as u16)
        }
        _ => None,
    }
}

/// Whether `IS_KUBERNETES` is set to `true` (any case)
pub fn is_kubernetes() -> bool {
    env::var(KUBERNETES_ENV_VAR).is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Base URL of a service.
///
/// Inside Kubernetes services are addressed by name; locally the port comes
/// from the project declaring the service.
pub fn resolve_service_endpoint(
    projects: &Projects,
    service_name: &str,
    is_kubernetes: bool,
) -> DevopsResult<Option<String>> {
    if is_kubernetes {
        return Ok(Some(format!("http://{}", service_name)));
    }

    Ok(resolve_port(projects, service_name)?.map(|port| format!("http://localhost:{}", port)))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::discovery::Project;

    fn project(name: &str, deployment: &str) -> Project {
        Project {
            name: name.to_string(),
            path: PathBuf::from("/repo").join(name),
            scripts: Default::default(),
            deployment: toml::from_str(deployment).unwrap(),
        }
    }

    fn projects(list: Vec<Project>) -> Projects {
        list.into_iter().map(|p| (p.name.clone(), p)).collect()
    }

    #[test]
    fn finds_port_by_service_name() {
        let projects = projects(vec![
            project("api", "service_name = \"api-svc\"\nport = 8000\n"),
            project("worker", "service_name = \"worker-svc\"\nport = \"9000\"\n"),
        ]);

        assert_eq!(resolve_port(&projects, "api-svc").unwrap(), Some(8000));
        assert_eq!(resolve_port(&projects, "worker-svc").unwrap(), Some(9000));
    }

    #[test]
    fn unknown_service_is_absent() {
        let projects = projects(vec![
            project("api", "service_name = \"api-svc\"\nport = 8000\n"),
            project("lib", ""),
        ]);

        assert_eq!(resolve_port(&projects, "billing").unwrap(), None);
    }

    #[test]
    fn non_numeric_port_is_an_error() {
        let projects = projects(vec![project("api", "service_name = \"api\"\nport = \"abc\"\n")]);

        let err = resolve_port(&projects, "api").unwrap_err();
        assert!(matches!(err, DevopsError::UnknownServicePort { .. }));
    }

    #[test]
    fn missing_or_out_of_range_port_is_an_error() {
        let projects = projects(vec![
            project("a", "service_name = \"a\"\n"),
            project("b", "service_name = \"b\"\nport = 70000\n"),
        ]);

        assert!(resolve_port(&projects, "a").is_err());
        assert!(resolve_port(&projects, "b").is_err());
    }

    #[test]
    fn integral_float_port_is_accepted() {
        let projects = projects(vec![project("a", "service_name = \"a\"\nport = 8080.0\n")]);
        assert_eq!(resolve_port(&projects, "a").unwrap(), Some(8080));
    }

    #[test]
    fn endpoint_uses_service_name_in_kubernetes() {
        let projects = projects(vec![]);

        assert_eq!(
            resolve_service_endpoint(&projects, "api", true).unwrap(),
            Some("http://api".to_string())
        );
    }

    #[test]
    fn endpoint_uses_local_port_outside_kubernetes() {
        let projects = projects(vec![project("api", "service_name = \"api\"\nport = 8000\n")]);

        assert_eq!(
            resolve_service_endpoint(&projects, "api", false).unwrap(),
            Some("http://localhost:8000".to_string())
        );
        assert_eq!(resolve_service_endpoint(&projects, "nope", false).unwrap(), None);
    }
}
