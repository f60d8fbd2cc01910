use crate::llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::security::{DEFAULT_ALLOWED_PREFIXES, DEFAULT_DENIED_PATTERNS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_DRY_RUN: &str = "TASKPILOT_DRY_RUN";
pub const ENV_LOG_PATH: &str = "TASKPILOT_LOG_PATH";
pub const ENV_ENDPOINT: &str = "TASKPILOT_ENDPOINT";
pub const ENV_MODEL: &str = "TASKPILOT_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    pub llm: LLMConfig,
    pub behavior: BehaviorConfig,
    pub safety: SafetyConfig,
    pub escalation: EscalationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    pub dry_run: bool,
    pub log_path: PathBuf,
}

/// Gate lists; replacing them replaces the built-in lists entirely
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SafetyConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EscalationConfig {
    pub keyword: String,
    pub replacement: String,
    pub shell: String,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 60,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            log_path: PathBuf::from("ai_command_log.txt"),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            allow: DEFAULT_ALLOWED_PREFIXES.iter().map(|s| s.to_string()).collect(),
            deny: DEFAULT_DENIED_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            keyword: "sudo".to_string(),
            replacement: "sudo -S".to_string(),
            shell: "sh".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl LLMConfig {
    /// Get API key from environment variable or config
    pub fn resolve_api_key(&self) -> Option<String> {
        // First try environment variable
        if !self.api_key_env.is_empty()
            && let Ok(key) = std::env::var(&self.api_key_env)
            && !key.is_empty()
        {
            return Some(key);
        }

        // Fall back to config file if present
        self.api_key.clone().filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("taskpilot"))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load and validate configuration from `path`, falling back to defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` and apply environment overrides without validating
    ///
    /// Callers layering further overrides on top must call `validate` themselves.
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default_config()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Validate before saving
        self.validate()?;

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        // Set permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            llm: LLMConfig::default(),
            behavior: BehaviorConfig::default(),
            safety: SafetyConfig::default(),
            escalation: EscalationConfig::default(),
        }
    }

    /// Apply `TASKPILOT_*` environment variables on top of file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(ENV_DRY_RUN) {
            match parse_bool(&value) {
                Some(dry_run) => self.behavior.dry_run = dry_run,
                None => tracing::warn!(value = value.as_str(), "ignoring invalid {}", ENV_DRY_RUN),
            }
        }

        if let Ok(path) = std::env::var(ENV_LOG_PATH)
            && !path.is_empty()
        {
            self.behavior.log_path = PathBuf::from(path);
        }

        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT)
            && !endpoint.is_empty()
        {
            self.llm.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var(ENV_MODEL)
            && !model.is_empty()
        {
            self.llm.model = model;
        }
    }

    /// Apply command-line flags, which take precedence over file and environment
    pub fn apply_cli_overrides(
        &mut self,
        dry_run: bool,
        log_path: Option<PathBuf>,
        model: Option<String>,
    ) {
        if dry_run {
            self.behavior.dry_run = true;
        }
        if let Some(log_path) = log_path {
            self.behavior.log_path = log_path;
        }
        if let Some(model) = model {
            self.llm.model = model;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "llm.endpoint must not be empty".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "llm.model must not be empty".to_string(),
            ));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "llm.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.behavior.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "behavior.log_path must not be empty".to_string(),
            ));
        }

        if self.escalation.keyword.is_empty() {
            return Err(ConfigError::InvalidValue(
                "escalation.keyword must not be empty".to_string(),
            ));
        }

        if self.escalation.shell.is_empty() {
            return Err(ConfigError::InvalidValue(
                "escalation.shell must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
