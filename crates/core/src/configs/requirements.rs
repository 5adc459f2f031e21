//! Parsing of `env.yaml` requirements files
//!
//! A requirements file is a YAML sequence. Each entry is either a bare
//! variable name (required) or a single-key mapping whose value selects the
//! kind of requirement:
//!
//! ```yaml
//! - DATABASE_URL
//! - SENTRY_DSN: optional
//! - DEBUG: boolean
//! - LOG_LEVEL: [debug, info, warning]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::types::{DevopsError, DevopsResult};

/// File name of a requirements file
pub const REQUIREMENTS_FILE: &str = "env.yaml";

/// Constraint placed on one environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementKind {
    Required,
    Optional,
    Boolean,
    Enum(Vec<String>),
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementKind::Required => write!(f, "required"),
            RequirementKind::Optional => write!(f, "optional"),
            RequirementKind::Boolean => write!(f, "boolean"),
            RequirementKind::Enum(allowed) => write!(f, "one of {}", allowed.join(", ")),
        }
    }
}

/// Requirements declared by one file, keyed by variable name
pub type Requirements = BTreeMap<String, RequirementKind>;

/// Read and parse the requirements file at `path`
pub fn parse_requirements(path: &Path) -> DevopsResult<Requirements> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DevopsError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(DevopsError::Io(e)),
    };
    parse_requirements_str(path, &contents)
}

/// Parse requirements file contents; `path` is only used in error messages
pub fn parse_requirements_str(path: &Path, contents: &str) -> DevopsResult<Requirements> {
    let manifest: Value = serde_yaml::from_str(contents)
        .map_err(|e| malformed(path, format!("invalid YAML: {}", e)))?;

    let Value::Sequence(entries) = manifest else {
        return Err(malformed(path, "env.yaml file must resolve to an array"));
    };

    let mut requirements = Requirements::new();
    for entry in entries {
        match entry {
            Value::String(name) => {
                requirements.insert(name, RequirementKind::Required);
            }
            Value::Mapping(mapping) => {
                if mapping.len() != 1 {
                    let near = mapping
                        .keys()
                        .next()
                        .map(display_value)
                        .unwrap_or_else(|| "{}".to_string());
                    return Err(malformed(
                        path,
                        format!(
                            "every object in env.yaml must have one key. Error near: {}",
                            near
                        ),
                    ));
                }
                // Length checked above
                let Some((key, value)) = mapping.into_iter().next() else {
                    continue;
                };
                let Value::String(name) = key else {
                    return Err(malformed(
                        path,
                        format!(
                            "variable names must be strings. Error near: {}",
                            display_value(&key)
                        ),
                    ));
                };
                let kind = parse_kind(path, &name, &value)?;
                requirements.insert(name, kind);
            }
            other => {
                return Err(malformed(
                    path,
                    format!("unsupported entry: {}", display_value(&other)),
                ))
            }
        }
    }

    Ok(requirements)
}

fn parse_kind(path: &Path, name: &str, value: &Value) -> DevopsResult<RequirementKind> {
    match value {
        Value::String(kind) if kind == "optional" => Ok(RequirementKind::Optional),
        Value::String(kind) if kind == "boolean" => Ok(RequirementKind::Boolean),
        Value::Sequence(items) => {
            let mut allowed = Vec::with_capacity(items.len());
            for item in items {
                match scalar_to_string(item) {
                    Some(option) => allowed.push(option),
                    None => {
                        return Err(malformed(
                            path,
                            format!("invalid value for {}: {}", name, display_value(value)),
                        ))
                    }
                }
            }
            Ok(RequirementKind::Enum(allowed))
        }
        _ => Err(malformed(
            path,
            format!("invalid value for {}: {}", name, display_value(value)),
        )),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match scalar_to_string(value) {
        Some(s) => s,
        None => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", value)),
    }
}

fn malformed(path: &Path, message: impl Into<String>) -> DevopsError {
    DevopsError::MalformedRequirementsFile {
        path: PathBuf::from(path),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> DevopsResult<Requirements> {
        parse_requirements_str(Path::new("dummy.yaml"), contents)
    }

    #[test]
    fn parses_every_requirement_kind() {
        let requirements = parse(
            r#"
- TEST_ENV_MANDATORY
- TEST_ENV_OPTIONAL: optional
- TEST_ENV_BOOLEAN: boolean
- TEST_ENV_ENUM: [option1, option2]
"#,
        )
        .unwrap();

        assert_eq!(requirements.len(), 4);
        assert_eq!(requirements["TEST_ENV_MANDATORY"], RequirementKind::Required);
        assert_eq!(requirements["TEST_ENV_OPTIONAL"], RequirementKind::Optional);
        assert_eq!(requirements["TEST_ENV_BOOLEAN"], RequirementKind::Boolean);
        assert_eq!(
            requirements["TEST_ENV_ENUM"],
            RequirementKind::Enum(vec!["option1".to_string(), "option2".to_string()])
        );
    }

    #[test]
    fn top_level_mapping_is_rejected() {
        let err = parse("TEST_ENV_MANDATORY: required\n").unwrap_err();

        assert!(matches!(err, DevopsError::MalformedRequirementsFile { .. }));
        assert_eq!(
            err.to_string(),
            "Error in dummy.yaml: env.yaml file must resolve to an array"
        );
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse(""),
            Err(DevopsError::MalformedRequirementsFile { .. })
        ));
    }

    #[test]
    fn entry_with_multiple_keys_is_rejected() {
        let err = parse(
            r#"
-
  TEST_ENV1: optional
  TEST_ENV2: optional
"#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("must have one key"));
        assert!(message.contains("TEST_ENV1") || message.contains("TEST_ENV2"));
    }

    #[test]
    fn unknown_kind_is_rejected_with_variable_name() {
        let err = parse("- PORT: number\n").unwrap_err();

        assert!(matches!(err, DevopsError::MalformedRequirementsFile { .. }));
        assert!(err.to_string().contains("invalid value for PORT: number"));
    }

    #[test]
    fn nested_values_in_enum_are_rejected() {
        assert!(parse("- MODE: [[a, b]]\n").is_err());
    }

    #[test]
    fn scalar_enum_options_are_stringified() {
        let requirements = parse("- WORKERS: [1, 2, 4]\n").unwrap();
        assert_eq!(
            requirements["WORKERS"],
            RequirementKind::Enum(vec!["1".to_string(), "2".to_string(), "4".to_string()])
        );
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = parse_requirements(&temp_dir.path().join(REQUIREMENTS_FILE)).unwrap_err();
        assert!(matches!(err, DevopsError::FileNotFound(_)));
    }

    #[test]
    fn invalid_yaml_is_malformed() {
        assert!(matches!(
            parse("- [unclosed\n"),
            Err(DevopsError::MalformedRequirementsFile { .. })
        ));
    }
}
