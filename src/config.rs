//! Startup configuration.
//!
//! Provider flags are parsed by clap with environment fallbacks (a `.env` file is
//! loaded first by `main`), then validated into a [`Settings`] value that the rest
//! of the crate receives explicitly.

use clap::{Args, ValueEnum};
use tracing::info;

use crate::constants;
use crate::error::ConfigurationError;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Azure,
}

/// Provider flags shared by every subcommand that talks to a model.
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// API key for the completion provider.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Key for a code-execution add-on. Accepted for compatibility, not used.
    #[arg(long, env = "CODEBOX_API_KEY", hide_env_values = true)]
    pub codebox_api_key: Option<String>,

    #[arg(long, env = "SWOT_PROVIDER", value_enum, default_value_t = ProviderKind::OpenAi)]
    pub provider: ProviderKind,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = constants::DEFAULT_OPENAI_BASE_URL)]
    pub base_url: String,

    /// Azure resource endpoint, e.g. https://my-resource.openai.azure.com
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub azure_endpoint: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT_NAME")]
    pub azure_deployment: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = constants::DEFAULT_AZURE_API_VERSION)]
    pub azure_api_version: String,

    #[arg(long, env = "SWOT_SHIFT_MODEL", default_value = constants::DEFAULT_SHIFT_MODEL)]
    pub shift_model: String,

    #[arg(long, env = "SWOT_SHIFT_TEMPERATURE", default_value_t = constants::DEFAULT_SHIFT_TEMPERATURE)]
    pub shift_temperature: f64,

    #[arg(long, env = "SWOT_STRATEGY_MODEL", default_value = constants::DEFAULT_STRATEGY_MODEL)]
    pub strategy_model: String,

    #[arg(long, env = "SWOT_STRATEGY_TEMPERATURE", default_value_t = constants::DEFAULT_STRATEGY_TEMPERATURE)]
    pub strategy_temperature: f64,
}

/// Where chat-completion requests are sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    OpenAi {
        base_url: String,
    },
    Azure {
        endpoint: String,
        deployment: String,
        api_version: String,
    },
}

impl Endpoint {
    pub fn chat_completions_url(&self) -> String {
        match self {
            Endpoint::OpenAi { base_url } => {
                format!("{}/chat/completions", base_url.trim_end_matches('/'))
            }
            Endpoint::Azure {
                endpoint,
                deployment,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version
            ),
        }
    }
}

/// Sampling parameters for one kind of completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn domain_shift() -> Self {
        Self {
            model: constants::DEFAULT_SHIFT_MODEL.to_string(),
            temperature: constants::DEFAULT_SHIFT_TEMPERATURE,
            top_p: Some(constants::DEFAULT_SHIFT_TOP_P),
            max_tokens: Some(constants::DEFAULT_SHIFT_MAX_TOKENS),
        }
    }

    pub fn strategy() -> Self {
        Self {
            model: constants::DEFAULT_STRATEGY_MODEL.to_string(),
            temperature: constants::DEFAULT_STRATEGY_TEMPERATURE,
            top_p: None,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub code_runner_key: Option<String>,
    pub endpoint: Endpoint,
    pub shift: CompletionOptions,
    pub strategy: CompletionOptions,
}

impl ProviderArgs {
    pub fn into_settings(self) -> Result<Settings, ConfigurationError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        check_temperature("shift temperature", self.shift_temperature)?;
        check_temperature("strategy temperature", self.strategy_temperature)?;

        let endpoint = match self.provider {
            ProviderKind::OpenAi => Endpoint::OpenAi {
                base_url: self.base_url,
            },
            ProviderKind::Azure => Endpoint::Azure {
                endpoint: self
                    .azure_endpoint
                    .ok_or(ConfigurationError::MissingAzureSetting("AZURE_OPENAI_ENDPOINT"))?,
                deployment: self
                    .azure_deployment
                    .ok_or(ConfigurationError::MissingAzureSetting("AZURE_OPENAI_DEPLOYMENT_NAME"))?,
                api_version: self.azure_api_version,
            },
        };

        if self.codebox_api_key.is_some() {
            info!("CODEBOX_API_KEY is set but no code-execution feature uses it");
        }

        Ok(Settings {
            api_key,
            code_runner_key: self.codebox_api_key,
            endpoint,
            shift: CompletionOptions {
                model: self.shift_model,
                temperature: self.shift_temperature,
                ..CompletionOptions::domain_shift()
            },
            strategy: CompletionOptions {
                model: self.strategy_model,
                temperature: self.strategy_temperature,
                ..CompletionOptions::strategy()
            },
        })
    }
}

fn check_temperature(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidTemperature { name, value })
    }
}
