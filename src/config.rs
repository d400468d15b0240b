use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

use crate::{registry::Registry, secrets::EnvSource};

pub const ENV_FILE_VAR: &str = "API_KEYS_ENV_FILE";
pub const REGISTRY_FILE_VAR: &str = "API_KEYS_REGISTRY_FILE";
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone)]
pub struct Config {
    pub env_file: PathBuf,
    pub registry_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse env file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },
    #[error("failed to read registry file {path}")]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry file {path}")]
    RegistryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("registry contains duplicate key name `{name}`")]
    DuplicateKey { name: String },
    #[error("registry entry `{name}` has an empty {field}")]
    EmptyField { name: String, field: &'static str },
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            env_file: non_empty(ENV_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE)),
            registry_file: non_empty(REGISTRY_FILE_VAR).map(PathBuf::from),
        }
    }

    pub fn load_registry(&self) -> Result<Registry, ConfigError> {
        match &self.registry_file {
            Some(path) => Registry::from_json_file(path),
            None => Ok(Registry::builtin()),
        }
    }

    /// Builds the process secret source. Values from the env file only fill in
    /// variables the process environment does not already define.
    ///
    /// An unreadable or malformed env file is logged and skipped; the server
    /// then runs on the process environment alone.
    pub fn load_secret_source(&self) -> EnvSource {
        match load_env_file(&self.env_file) {
            Ok(fallback) => EnvSource::with_fallback(fallback.unwrap_or_default()),
            Err(err) => {
                warn!(
                    path = %self.env_file.display(),
                    error = %err,
                    "ignoring unusable env file"
                );
                EnvSource::new()
            }
        }
    }
}

/// Parses a dotenv-style file. A missing file yields `Ok(None)`.
pub fn load_env_file(path: &Path) -> Result<Option<HashMap<String, String>>, ConfigError> {
    let env_file_error = |message: String| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(None),
        Err(err) => return Err(env_file_error(err.to_string())),
    };

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|err| env_file_error(err.to_string()))?;
        // first definition wins, matching dotenv load semantics
        values.entry(key).or_insert(value);
    }

    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::secrets::SecretSource;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn parse_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert_eq!(config.registry_file, None);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_FILE_VAR, "   "),
            (REGISTRY_FILE_VAR, ""),
        ]));
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert_eq!(config.registry_file, None);
    }

    #[test]
    fn explicit_paths_are_used() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_FILE_VAR, "/etc/api-keys/secrets.env"),
            (REGISTRY_FILE_VAR, " /etc/api-keys/registry.json "),
        ]));
        assert_eq!(config.env_file, PathBuf::from("/etc/api-keys/secrets.env"));
        assert_eq!(
            config.registry_file,
            Some(PathBuf::from("/etc/api-keys/registry.json"))
        );
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let values = load_env_file(&dir.path().join("absent.env")).expect("absent file is fine");
        assert!(values.is_none());
    }

    #[test]
    fn env_file_values_are_parsed() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# local overrides").expect("write");
        writeln!(file, "STRIPE_API_KEY=sk_test_1234567890abcdef").expect("write");
        writeln!(file, "JWT_SECRET=\"quoted value\"").expect("write");
        writeln!(file, "JWT_SECRET=ignored").expect("write");

        let values = load_env_file(file.path())
            .expect("parse env file")
            .expect("file exists");
        assert_eq!(
            values.get("STRIPE_API_KEY").map(String::as_str),
            Some("sk_test_1234567890abcdef")
        );
        assert_eq!(
            values.get("JWT_SECRET").map(String::as_str),
            Some("quoted value")
        );
    }

    #[test]
    fn malformed_env_file_falls_back_to_process_environment() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "API_KEYS_MCP_TEST_ENV_FILE_ONLY=sk-good-value-123456").expect("write");
        writeln!(file, "STRIPE_API_KEY: sk_yaml_style").expect("write");

        let err = load_env_file(file.path()).expect_err("yaml-style line does not parse");
        assert!(matches!(err, ConfigError::EnvFile { .. }));

        env::set_var("API_KEYS_MCP_TEST_ENV_FILE_PROCESS", "from-process");
        env::remove_var("API_KEYS_MCP_TEST_ENV_FILE_ONLY");
        let config = Config {
            env_file: file.path().to_path_buf(),
            registry_file: None,
        };

        let source = config.load_secret_source();
        assert_eq!(source.fallback_len(), 0);
        assert_eq!(
            source.get("API_KEYS_MCP_TEST_ENV_FILE_PROCESS").as_deref(),
            Some("from-process")
        );
        assert_eq!(source.get("API_KEYS_MCP_TEST_ENV_FILE_ONLY"), None);
    }

    #[test]
    fn env_file_values_feed_the_secret_source() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "API_KEYS_MCP_TEST_ENV_FILE_FED=from-file").expect("write");
        env::remove_var("API_KEYS_MCP_TEST_ENV_FILE_FED");

        let config = Config {
            env_file: file.path().to_path_buf(),
            registry_file: None,
        };

        let source = config.load_secret_source();
        assert_eq!(
            source.get("API_KEYS_MCP_TEST_ENV_FILE_FED").as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn builtin_registry_is_used_without_registry_file() {
        let config = Config::from_lookup(lookup_from(&[]));
        let registry = config.load_registry().expect("builtin registry");
        assert!(registry.lookup("openai").is_some());
    }
}
