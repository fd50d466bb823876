//! Runtime configuration resolved from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `OPENAI_API_KEY` | unset (fallback-only mode) |
//! | `CATALOG_LLM_MODEL` | `gpt-3.5-turbo` |
//! | `CATALOG_LLM_BASE_URL` | `https://api.openai.com/v1` |
//! | `CATALOG_LLM_TIMEOUT_SECS` | `30` |
//! | `CATALOG_BIND` | `127.0.0.1:3000` |
//! | `CATALOG_ENV` | `development` |
//! | `CATALOG_ALLOWED_ORIGINS` | unset (any origin) |

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::augment::{AugmentationGateway, DEFAULT_TIMEOUT, Generator};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiClient};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub llm_timeout: Duration,
    pub bind: String,
    pub environment: String,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout: DEFAULT_TIMEOUT,
            bind: DEFAULT_BIND.to_string(),
            environment: "development".to_string(),
            allowed_origins: None,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let llm_timeout = match get("CATALOG_LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Ignoring invalid CATALOG_LLM_TIMEOUT_SECS '{raw}'");
                    defaults.llm_timeout
                }
            },
            None => defaults.llm_timeout,
        };

        Self {
            api_key: get("OPENAI_API_KEY"),
            model: get("CATALOG_LLM_MODEL").unwrap_or(defaults.model),
            base_url: get("CATALOG_LLM_BASE_URL").unwrap_or(defaults.base_url),
            llm_timeout,
            bind: get("CATALOG_BIND").unwrap_or(defaults.bind),
            environment: get("CATALOG_ENV").unwrap_or(defaults.environment),
            allowed_origins: get("CATALOG_ALLOWED_ORIGINS").map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),
        }
    }

    /// Error details are only exposed outside production.
    pub fn expose_error_details(&self) -> bool {
        self.environment != "production"
    }

    /// Build the augmentation gateway, live if a credential is present.
    pub fn gateway(&self) -> AugmentationGateway {
        let generator = match &self.api_key {
            Some(key) => Generator::Configured(Arc::new(
                OpenAiClient::new(key.clone())
                    .with_model(&self.model)
                    .with_base_url(&self.base_url),
            )),
            None => {
                warn!("OPENAI_API_KEY not set. AI features will use fallback responses.");
                Generator::Unconfigured
            }
        };
        AugmentationGateway::new(generator, self.llm_timeout)
    }
}
