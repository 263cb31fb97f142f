pub mod completion;
pub mod config;
pub mod constants;
pub mod error;
pub mod interview;
pub mod markdown;
pub mod quadrant;
pub mod report;
pub mod session;
pub mod strategy;
pub mod terminal;
pub mod web_server;

pub use completion::{ChatCompletionClient, CompletionProvider, CompletionRequest};
pub use config::{CompletionOptions, Endpoint, ProviderArgs, Settings};
pub use error::{ConfigurationError, ProviderError, SwotError};
pub use session::{Action, Session, Stage, Workflow};
