//! Configuration file loader.

use std::path::PathBuf;

use super::AppConfig;

/// Environment variable holding a comma-separated list of CORS origins.
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

/// Environment variable overriding the database path.
pub const DATABASE_PATH_ENV: &str = "STUDY_ASSISTANT_DB";

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .study-assistant.toml
        search_paths.push(PathBuf::from(".study-assistant.toml"));

        // 2. User config directory: ~/.config/study-assistant/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("study-assistant").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if let Some(path) = self.find_config_file() {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load_from_path(&path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(AppConfig::default())
    }

    /// Load configuration and apply environment overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load_with_env(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<AppConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Find the first config file that exists.
    fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(origins) = lookup(CORS_ORIGINS_ENV) {
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        if !origins.is_empty() {
            config.server.cors_origins = origins;
        }
    }

    if let Some(path) = lookup(DATABASE_PATH_ENV).filter(|p| !p.is_empty()) {
        config.storage.database_path = PathBuf::from(path);
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths.is_empty());
        assert!(loader.search_paths[0].ends_with(".study-assistant.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let config = loader.load().unwrap();
        assert_eq!(config.server.port, crate::config::DEFAULT_PORT);
        assert!(loader.find_config_file().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                host = "0.0.0.0"
                cors_origins = ["http://localhost:3000"]

                [ai]
                provider = "claude"
            "#,
        )
        .unwrap();

        let loader = ConfigLoader::with_path(path.clone());
        let config = loader.load().unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.server.cors_permissive());
        assert_eq!(config.ai.provider, ProviderKind::Claude);
        assert_eq!(config.ai.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.ai.base_url, "https://api.anthropic.com");
        assert_eq!(config.ai.model, "claude-sonnet-4-20250514");
        assert_eq!(loader.find_config_file(), Some(path));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            CORS_ORIGINS_ENV => Some("http://a.test, http://b.test,".to_string()),
            DATABASE_PATH_ENV => Some("/tmp/study.db".to_string()),
            _ => None,
        });
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/study.db"));
    }

    #[test]
    fn test_env_overrides_ignore_empty_values() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert!(config.server.cors_permissive());
        assert_eq!(
            config.storage.database_path,
            crate::config::default_database_path()
        );
    }

    #[test]
    fn test_parse_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = ConfigLoader::with_path(path).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
