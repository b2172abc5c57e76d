//! Configuration failures. All of them are fatal at startup.

use std::path::PathBuf;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file is missing.
    #[error("config file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// Values parsed but broke a constraint.
    #[error("config rejected:\n{}", violations(.0).join("\n"))]
    Validation(#[source] ValidationErrors),

    /// YAML syntax, type mismatch, or a malformed size/address string.
    #[error("config could not be read: {0}")]
    Parsing(#[source] Box<figment::Error>),
}

/// One `  path.to.field: code` line per violated constraint, sorted by path.
pub(crate) fn violations(errors: &ValidationErrors) -> Vec<String> {
    let mut lines = Vec::new();
    collect(errors, "", &mut lines);
    lines.sort();
    lines
}

fn collect(errors: &ValidationErrors, prefix: &str, lines: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    match &failure.message {
                        Some(message) => lines.push(format!("  {path}: {message}")),
                        None => lines.push(format!("  {path}: {}", failure.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, lines),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), lines);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Parsing(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemsimConfig;
    use validator::Validate;

    #[test]
    fn nested_violations_name_full_paths() {
        let mut config = MemsimConfig::default();
        config.registry.capacity = 0;
        config.heap.base_address = 0x1003;
        config.telemetry.log_level = "loud".into();

        let err = ConfigError::from(config.validate().unwrap_err());
        let ConfigError::Validation(errors) = &err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert_eq!(
            violations(errors),
            vec![
                "  heap.base_address: invalid_base_address".to_string(),
                "  registry.capacity: range".to_string(),
                "  telemetry.log_level: invalid_log_level".to_string(),
            ]
        );
        assert!(err.to_string().starts_with("config rejected:\n"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigError::FileNotFound(PathBuf::from("config/none.yaml"));
        assert_eq!(err.to_string(), "config file config/none.yaml does not exist");
    }
}
