use std::env;
use std::fmt::{self, Debug, Formatter};

use little_chat_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the endpoint base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Errors raised while loading the configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API key is missing or empty.
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,
}

/// Settings read from the environment before the session starts.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    base_url: Option<String>,
    model: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
        Ok(Self {
            api_key,
            base_url: get(BASE_URL_VAR),
            model: get(MODEL_VAR),
        })
    }

    /// Builds the provider configuration.
    pub fn openai_config(&self) -> OpenAIConfig {
        let mut builder = OpenAIConfigBuilder::with_api_key(&self.api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(model) = &self.model {
            builder = builder.with_model(model);
        }
        builder.build()
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
