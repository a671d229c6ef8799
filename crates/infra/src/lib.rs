//! Infrastructure layer: configuration, model transports, request files.

pub mod ai;
pub mod config;
pub mod input;

pub use ai::OpenAiClient;
pub use config::{ApiKey, ConfigError, ModelConfig, load_dotenv};
pub use input::{LoadError, load_request_file, parse_request};
