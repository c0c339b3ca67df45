pub mod app_config;
pub mod paths;

pub use app_config::{AiProvider, AppConfig, ConfigError};
