use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use askql_app::schema_context::{
    ContextBudget, DEFAULT_MAX_COLUMNS_PER_TABLE, DEFAULT_MAX_RELATIONSHIPS, DEFAULT_MAX_TABLES,
};

use crate::adapters::postgres;

pub const DSN_ENV_VARS: [&str; 2] = ["ASKQL_DSN", "DATABASE_URL"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    Anthropic,
    OpenAI,
}

impl AiProvider {
    pub fn default_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// `config.toml` as written by the user. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub ai: AiConfig,
    pub context: ContextConfig,
    pub introspection: IntrospectionConfig,
    pub execution: ExecutionConfig,
}

/// Either a full `dsn`, or the parts to build one from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: String,
    /// Name of the environment variable holding the key, never the key itself.
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub max_tables: usize,
    pub max_columns_per_table: usize,
    pub max_relationships: usize,
    /// Case-insensitive substrings; matching columns are never shown to the AI.
    pub exclude_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntrospectionConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    pub timeout_secs: u64,
    /// Runs editor queries in a read-only transaction.
    pub read_only: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            api_key_env: None,
            timeout_secs: 60,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_tables: DEFAULT_MAX_TABLES,
            max_columns_per_table: DEFAULT_MAX_COLUMNS_PER_TABLE,
            max_relationships: DEFAULT_MAX_RELATIONSHIPS,
            exclude_columns: Vec::new(),
        }
    }
}

impl Default for IntrospectionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: postgres::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: postgres::DEFAULT_TIMEOUT_SECS,
            read_only: true,
        }
    }
}

impl AppConfig {
    /// A missing file is not an error; it yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `--dsn` first, then `ASKQL_DSN`, then `DATABASE_URL`, then the file.
    pub fn resolve_dsn(
        &self,
        cli_dsn: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        if let Some(dsn) = cli_dsn.filter(|d| !d.trim().is_empty()) {
            return Some(dsn.to_string());
        }
        DSN_ENV_VARS
            .iter()
            .find_map(|name| env(name).filter(|v| !v.trim().is_empty()))
            .or_else(|| self.database.to_dsn())
    }

    pub fn api_key_env(&self) -> &str {
        self.ai
            .api_key_env
            .as_deref()
            .unwrap_or_else(|| self.ai.provider.default_key_env())
    }

    pub fn api_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        env(self.api_key_env()).filter(|k| !k.trim().is_empty())
    }
}

impl DatabaseConfig {
    pub fn to_dsn(&self) -> Option<String> {
        if let Some(dsn) = &self.dsn {
            return Some(dsn.clone());
        }

        let host = self.host.as_deref().unwrap_or("localhost");
        let port = self.port.unwrap_or(5432);
        let user = urlencoding::encode(self.user.as_deref()?);
        let database = self.database.as_deref()?;

        Some(match &self.password {
            Some(password) => {
                let password = urlencoding::encode(password);
                format!("postgres://{user}:{password}@{host}:{port}/{database}")
            }
            None => format!("postgres://{user}@{host}:{port}/{database}"),
        })
    }
}

impl ContextConfig {
    pub fn budget(&self) -> ContextBudget {
        ContextBudget {
            max_tables: self.max_tables,
            max_columns_per_table: self.max_columns_per_table,
            max_relationships: self.max_relationships,
        }
    }
}
