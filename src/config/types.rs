//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// AI provider kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Claude,
}

impl ProviderKind {
    /// Model used when the config does not name one.
    #[must_use]
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::Claude => "claude-sonnet-4-20250514",
        }
    }

    /// API base URL used when the config does not name one.
    #[must_use]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Claude => "https://api.anthropic.com",
        }
    }

    /// Environment variable holding the API key by default.
    #[must_use]
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for the AI client.
///
/// `model`, `base_url` and `api_key_env` default per provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawAiConfig")]
pub struct AiConfig {
    /// Provider to use (gemini or claude).
    pub provider: ProviderKind,
    /// Model to use for study tools.
    pub model: String,
    /// Maximum tokens in response.
    pub max_tokens: u32,
    /// Base URL for the API.
    pub base_url: String,
    /// Environment variable name for the API key.
    pub api_key_env: String,
}

/// `[ai]` section as written in the file, before provider defaults apply.
#[derive(Deserialize)]
struct RawAiConfig {
    #[serde(default)]
    provider: ProviderKind,
    model: Option<String>,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    base_url: Option<String>,
    api_key_env: Option<String>,
}

fn default_max_tokens() -> u32 {
    8192
}

impl From<RawAiConfig> for AiConfig {
    fn from(raw: RawAiConfig) -> Self {
        Self {
            model: raw
                .model
                .unwrap_or_else(|| raw.provider.default_model().to_string()),
            base_url: raw
                .base_url
                .unwrap_or_else(|| raw.provider.default_base_url().to_string()),
            api_key_env: raw
                .api_key_env
                .unwrap_or_else(|| raw.provider.default_api_key_env().to_string()),
            max_tokens: raw.max_tokens,
            provider: raw.provider,
        }
    }
}

impl AiConfig {
    /// Defaults for the given provider.
    #[must_use]
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            model: provider.default_model().to_string(),
            max_tokens: default_max_tokens(),
            base_url: provider.default_base_url().to_string(),
            api_key_env: provider.default_api_key_env().to_string(),
            provider,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::for_provider(ProviderKind::default())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origins. `"*"` enables permissive CORS.
    pub cors_origins: Vec<String>,
    /// Maximum accepted upload size for file analysis.
    pub max_upload_bytes: usize,
}

/// Default port for the API server.
pub const DEFAULT_PORT: u16 = 8001;

/// Default upload limit (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Get the configured address as a string.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether any origin is allowed.
    #[must_use]
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the `SQLite` database.
    pub database_path: PathBuf,
    /// User id that progress is recorded under when a request names none.
    pub default_user_id: String,
}

/// Returns the default path for the study database.
///
/// This is `~/.local/share/study-assistant/study.db` on Unix systems.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("study-assistant")
        .join("study.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_user_id: "default".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ai: AiConfig,
}
