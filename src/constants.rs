// Defaults for provider settings and on-disk assets.
// Every value here can be overridden by a CLI flag or its environment variable.

use std::env;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2023-05-15";

pub const DEFAULT_SHIFT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SHIFT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_SHIFT_TOP_P: f64 = 0.5;
pub const DEFAULT_SHIFT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_STRATEGY_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_STRATEGY_TEMPERATURE: f64 = 0.7;

pub const DEFAULT_PORT: u16 = 8501;

// Use lazy_static so the asset directories follow the environment at first use.
lazy_static::lazy_static! {
    pub static ref TEMPLATES_DIR: String = env::var("SWOT_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("SWOT_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
}
