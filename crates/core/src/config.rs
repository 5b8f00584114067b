//! Configuration management for Coursemate.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (.coursemate/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric: the course catalog, prompt
//! overrides and config file all live under `.coursemate/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-workspace state directory.
pub const STATE_DIR: &str = ".coursemate";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["anthropic", "claude", "mock"];

/// What the orchestrator does with a store-reported tool failure before it
/// is handed back to the model as a tool result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolErrorPolicy {
    /// Send the store's message to the model verbatim.
    #[default]
    Forward,
    /// Replace store failures with a fixed retry-safe message.
    Redact,
}

impl ToolErrorPolicy {
    /// Parse a policy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" | "verbatim" => Some(Self::Forward),
            "redact" | "generic" => Some(Self::Redact),
            _ => None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the web frontend, served for non-API paths
    pub frontend_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            frontend_dir: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .coursemate/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("anthropic" or "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API key for the LLM provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Optional override of the provider base URL
    pub endpoint: Option<String>,

    /// Maximum tokens per LLM response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Number of passages returned by one search
    pub max_results: usize,

    /// Number of question/answer exchanges remembered per session
    pub max_history: usize,

    /// Number of sessions kept in memory; the oldest is evicted beyond this
    pub max_sessions: usize,

    /// Course catalog snapshot (JSON)
    pub catalog_path: Option<PathBuf>,

    /// Dimensions of the local embedding vectors
    pub embedding_dimensions: usize,

    /// Handling of store-reported tool failures
    pub tool_errors: ToolErrorPolicy,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    endpoint: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    max_results: Option<usize>,
    max_history: Option<usize>,
    max_sessions: Option<usize>,
    catalog: Option<PathBuf>,
    embedding_dimensions: Option<usize>,
    tool_errors: Option<ToolErrorPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    frontend_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            endpoint: None,
            max_tokens: 800,
            temperature: 0.0,
            max_results: 5,
            max_history: 2,
            max_sessions: 1000,
            catalog_path: None,
            embedding_dimensions: 384,
            tool_errors: ToolErrorPolicy::default(),
            server: ServerConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and
    /// environment variables.
    ///
    /// Environment variables:
    /// - `COURSEMATE_WORKSPACE`: Override workspace path
    /// - `COURSEMATE_CONFIG`: Path to config file
    /// - `COURSEMATE_PROVIDER`: LLM provider
    /// - `COURSEMATE_MODEL`: Model identifier
    /// - `COURSEMATE_API_KEY`: API key (wins over the provider variable)
    /// - `ANTHROPIC_API_KEY`: API key (or whatever `llm.apiKeyEnv` names)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use coursemate_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], but an explicit workspace or config file
    /// (from CLI flags) takes precedence over the environment before the
    /// YAML file is read.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("COURSEMATE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if let Ok(config_file) = std::env::var("COURSEMATE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }
        if config_file.is_some() {
            config.config_file = config_file;
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.state_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("COURSEMATE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("COURSEMATE_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("COURSEMATE_API_KEY")
            .ok()
            .or_else(|| std::env::var(&config.api_key_env).ok());

        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(api_key_env) = llm.api_key_env {
                result.api_key_env = api_key_env;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(max_tokens) = llm.max_tokens {
                result.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(max_results) = retrieval.max_results {
                result.max_results = max_results;
            }
            if let Some(max_history) = retrieval.max_history {
                result.max_history = max_history;
            }
            if let Some(max_sessions) = retrieval.max_sessions {
                result.max_sessions = max_sessions;
            }
            if retrieval.catalog.is_some() {
                result.catalog_path = retrieval.catalog;
            }
            if let Some(dims) = retrieval.embedding_dimensions {
                result.embedding_dimensions = dims;
            }
            if let Some(policy) = retrieval.tool_errors {
                result.tool_errors = policy;
            }
        }

        if let Some(server) = config_file.server {
            if let Some(host) = server.host {
                result.server.host = host;
            }
            if let Some(port) = server.port {
                result.server.port = port;
            }
            if server.frontend_dir.is_some() {
                result.server.frontend_dir = server.frontend_dir;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config
    /// file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .coursemate directory.
    pub fn state_dir(&self) -> PathBuf {
        self.workspace.join(STATE_DIR)
    }

    /// Ensure the .coursemate directory exists.
    pub fn ensure_state_dir(&self) -> AppResult<()> {
        let state_dir = self.state_dir();
        if !state_dir.exists() {
            std::fs::create_dir_all(&state_dir).map_err(|e| {
                AppError::Config(format!("Failed to create {} directory: {}", STATE_DIR, e))
            })?;
        }
        Ok(())
    }

    /// Resolve the course catalog location.
    ///
    /// Relative paths are taken relative to the workspace.
    pub fn catalog_path(&self) -> PathBuf {
        match &self.catalog_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.workspace.join(path),
            None => self.state_dir().join("catalog.json"),
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider != "mock" && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.api_key_env
            )));
        }

        if self.max_results == 0 {
            return Err(AppError::Config(
                "retrieval.maxResults must be at least 1".to_string(),
            ));
        }

        if self.max_sessions == 0 {
            return Err(AppError::Config(
                "retrieval.maxSessions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
