//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::FailoverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FailoverConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, resolve credentials and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<FailoverConfig, ConfigError> {
    let mut config: FailoverConfig = toml::from_str(content)?;

    let mut errors = resolve_credentials(&mut config);
    if let Err(validation) = validate_config(&config) {
        errors.extend(validation);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Replace `password` with the value of `password_env` where one is named.
fn resolve_credentials(config: &mut FailoverConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for endpoint in &mut config.endpoints {
        let Some(var) = endpoint.password_env.as_deref() else {
            continue;
        };
        match std::env::var(var) {
            Ok(password) => endpoint.password = password,
            Err(_) => errors.push(ValidationError::MissingPasswordEnv {
                url: endpoint.url.clone(),
                var: var.to_string(),
            }),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rpc-failover-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [[endpoints]]
            url = "http://127.0.0.1:18332"
            name = "primary"
            username = "rpc"
            password = "secret"

            [[endpoints]]
            url = "http://127.0.0.1:18333"
            priority = 1
            max_retries = 1

            [circuit_breaker]
            threshold = 2
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].name, "primary");
        assert_eq!(config.endpoints[1].max_retries, Some(1));
        assert_eq!(config.circuit_breaker.threshold, 2);
        assert_eq!(config.circuit_breaker.timeout_ms, 60_000);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/rpc-failover.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("endpoints = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_password_from_env() {
        let var = "RPC_FAILOVER_TEST_PASSWORD_RESOLVED";
        std::env::set_var(var, "from-env");

        let config = parse_config(&format!(
            r#"
            [[endpoints]]
            url = "http://127.0.0.1:8332"
            password_env = "{var}"
            "#
        ))
        .unwrap();
        assert_eq!(config.endpoints[0].password, "from-env");
    }

    #[test]
    fn test_missing_password_env_is_validation_error() {
        let err = parse_config(
            r#"
            [[endpoints]]
            url = "http://127.0.0.1:8332"
            password_env = "RPC_FAILOVER_TEST_PASSWORD_NEVER_SET"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert!(matches!(errors[0], ValidationError::MissingPasswordEnv { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_config_rejected() {
        let err = parse_config("").unwrap_err();
        assert!(err.to_string().contains("at least one RPC endpoint"));
    }
}
