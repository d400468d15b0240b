use std::{
    collections::HashMap,
    env::{self, VarError},
};

use tracing::warn;

/// Read-only lookup of secret values by source variable name.
pub trait SecretSource: Send + Sync {
    fn get(&self, variable: &str) -> Option<String>;

    /// A variable counts as configured only when it holds a non-empty value.
    fn configured_value(&self, variable: &str) -> Option<String> {
        self.get(variable).filter(|value| !value.is_empty())
    }

    fn is_configured(&self, variable: &str) -> bool {
        self.configured_value(variable).is_some()
    }
}

/// Process environment, with values parsed from an env file as a fallback for
/// variables the process does not define.
#[derive(Debug, Default, Clone)]
pub struct EnvSource {
    fallback: HashMap<String, String>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: HashMap<String, String>) -> Self {
        Self { fallback }
    }

    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }
}

impl SecretSource for EnvSource {
    /// A process value that is not valid UTF-8 still counts as set; it is
    /// returned lossily converted.
    fn get(&self, variable: &str) -> Option<String> {
        match env::var(variable) {
            Ok(value) => Some(value),
            Err(VarError::NotUnicode(raw)) => {
                warn!(variable, "environment variable is not valid UTF-8");
                Some(raw.to_string_lossy().into_owned())
            }
            Err(VarError::NotPresent) => self.fallback.get(variable).cloned(),
        }
    }
}

impl SecretSource for HashMap<String, String> {
    fn get(&self, variable: &str) -> Option<String> {
        HashMap::get(self, variable).cloned()
    }
}
