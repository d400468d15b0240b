//! Static registry of named secrets
//!
//! Maps stable logical key names (e.g. `openai`) to the environment variable that
//! holds the secret, a description, and a category. The table is ordered so that
//! schema enums and listings are deterministic for the lifetime of the process.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Category filter value that matches every entry.
pub const CATEGORY_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Llm,
    Saas,
    Canva,
    Internal,
}

impl Category {
    /// Fixed listing order.
    pub const ALL: [Category; 4] = [
        Category::Llm,
        Category::Saas,
        Category::Canva,
        Category::Internal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Saas => "saas",
            Self::Canva => "canva",
            Self::Internal => "internal",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Llm => "🤖 LLM APIs",
            Self::Saas => "☁️ SaaS APIs",
            Self::Canva => "🎨 Canva APIs",
            Self::Internal => "🔧 Internal/Custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryEntry {
    #[serde(rename = "name")]
    pub logical_name: String,
    #[serde(rename = "env_var")]
    pub source_variable: String,
    pub description: String,
    pub category: Category,
}

impl RegistryEntry {
    pub fn new(
        logical_name: impl Into<String>,
        source_variable: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            source_variable: source_variable.into(),
            description: description.into(),
            category,
        }
    }
}

const BUILTIN_ENTRIES: &[(&str, &str, &str, Category)] = &[
    ("openai", "OPENAI_API_KEY", "OpenAI API key for GPT models", Category::Llm),
    ("anthropic", "ANTHROPIC_API_KEY", "Anthropic API key for Claude models", Category::Llm),
    ("google_ai", "GOOGLE_AI_API_KEY", "Google AI API key for Gemini models", Category::Llm),
    ("cohere", "COHERE_API_KEY", "Cohere API key", Category::Llm),
    ("stripe", "STRIPE_API_KEY", "Stripe API key for payments", Category::Saas),
    ("stripe_webhook", "STRIPE_WEBHOOK_SECRET", "Stripe webhook signing secret", Category::Saas),
    ("twilio_sid", "TWILIO_ACCOUNT_SID", "Twilio Account SID", Category::Saas),
    ("twilio_token", "TWILIO_AUTH_TOKEN", "Twilio Auth Token", Category::Saas),
    ("sendgrid", "SENDGRID_API_KEY", "SendGrid API key for emails", Category::Saas),
    ("aws_access_key", "AWS_ACCESS_KEY_ID", "AWS Access Key ID", Category::Saas),
    ("aws_secret_key", "AWS_SECRET_ACCESS_KEY", "AWS Secret Access Key", Category::Saas),
    ("canva_client_id", "CANVA_CLIENT_ID", "Canva OAuth Client ID", Category::Canva),
    ("canva_client_secret", "CANVA_CLIENT_SECRET", "Canva OAuth Client Secret", Category::Canva),
    ("canva_app_id", "CANVA_APP_ID", "Canva App ID", Category::Canva),
    ("database_url", "DATABASE_URL", "Database connection string", Category::Internal),
    ("redis_url", "REDIS_URL", "Redis connection URL", Category::Internal),
    ("jwt_secret", "JWT_SECRET", "JWT signing secret", Category::Internal),
    ("app_secret", "APP_SECRET", "Application secret key", Category::Internal),
];

/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(name, variable, description, category)| {
                RegistryEntry::new(*name, *variable, *description, *category)
            })
            .collect::<Vec<_>>();

        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.logical_name.clone(), position))
            .collect();

        Self { entries, index }
    }

    pub fn from_entries(entries: Vec<RegistryEntry>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.logical_name.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    name: entry.logical_name.clone(),
                    field: "name",
                });
            }
            if entry.source_variable.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    name: entry.logical_name.clone(),
                    field: "env_var",
                });
            }
            if index.insert(entry.logical_name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateKey {
                    name: entry.logical_name.clone(),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// Loads a JSON array of `{name, env_var, description, category}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<RegistryEntry> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::RegistryParse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_entries(entries)
    }

    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    /// Names in registry order.
    pub fn all_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.logical_name.as_str())
            .collect()
    }

    /// `"all"` matches every entry, an unknown category matches none.
    pub fn filter_by_category(&self, category: &str) -> Vec<&RegistryEntry> {
        if category == CATEGORY_ALL {
            return self.entries.iter().collect();
        }

        match Category::parse(category) {
            Some(wanted) => self
                .entries
                .iter()
                .filter(|entry| entry.category == wanted)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
