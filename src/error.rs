use thiserror::Error;

/// Failures of a single completion call. Never retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("the provider rejected the API key")]
    Unauthorized,

    #[error("the provider rate limit was exceeded")]
    RateLimited,

    #[error("provider request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not reach the provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode the provider response: {0}")]
    MalformedResponse(String),

    #[error("the provider returned an empty completion")]
    EmptyCompletion,
}

/// Startup configuration problems. Fatal: nothing is served without a valid config.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("no provider API key configured; set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("the azure provider requires {0}")]
    MissingAzureSetting(&'static str),

    #[error("{name} must be between 0.0 and 2.0, got {value}")]
    InvalidTemperature { name: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum SwotError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to render prompt: {0}")]
    Prompt(#[from] minijinja::Error),

    #[error("create the interview questions before submitting answers")]
    QuestionsNotCreated,
}
