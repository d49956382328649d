//! Application configuration for threadpull.
//!
//! User config lives at `~/.threadpull/threadpull.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThreadpullError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "threadpull.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".threadpull";

// ---------------------------------------------------------------------------
// Config structs (matching threadpull.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Browser session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Enrichment API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory for `data/raw` and `data/processed` output.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Search expression driving the post pass.
    #[serde(default = "default_query")]
    pub query: String,

    /// Maximum distinct posts to collect per run.
    #[serde(default = "default_post_quota")]
    pub post_quota: usize,

    /// Maximum distinct replies to collect per post.
    #[serde(default = "default_reply_quota")]
    pub reply_quota: usize,

    /// Ceiling on reveal iterations per pass. A pass that neither meets its
    /// quota nor exhausts the page stops here instead of looping forever.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Fixed wait after each reveal action, in milliseconds.
    #[serde(default = "default_scroll_wait_ms")]
    pub scroll_wait_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            query: default_query(),
            post_quota: default_post_quota(),
            reply_quota: default_reply_quota(),
            max_rounds: default_max_rounds(),
            scroll_wait_ms: default_scroll_wait_ms(),
        }
    }
}

fn default_output_dir() -> String {
    "~/threadpull-data".into()
}
fn default_query() -> String {
    "(Inwi OR Orange OR IAM OR Maroc Telecom) AND (telecom OR telco OR Morocco)".into()
}
fn default_post_quota() -> usize {
    5
}
fn default_reply_quota() -> usize {
    10
}
fn default_max_rounds() -> u32 {
    50
}
fn default_scroll_wait_ms() -> u64 {
    2000
}

/// `[session]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// WebDriver endpoint (e.g., a local geckodriver).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Name of the env var holding the account username (never the value).
    #[serde(default = "default_username_env")]
    pub username_env: String,

    /// Name of the env var holding the account password (never the value).
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Optional cookies JSON file that bypasses interactive login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies_file: Option<String>,

    /// Run the browser headless.
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            username_env: default_username_env(),
            password_env: default_password_env(),
            cookies_file: None,
            headless: default_true(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".into()
}
fn default_username_env() -> String {
    "TWITTER_USERNAME".into()
}
fn default_password_env() -> String {
    "TWITTER_PASSWORD".into()
}
fn default_true() -> bool {
    true
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Name of the env var holding the API bearer token (never the token itself).
    #[serde(default = "default_bearer_token_env")]
    pub bearer_token_env: String,

    /// Base URL of the content API.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bearer_token_env: default_bearer_token_env(),
            base_url: default_api_base_url(),
        }
    }
}

fn default_bearer_token_env() -> String {
    "TWITTER_BEARER_TOKEN".into()
}
fn default_api_base_url() -> String {
    "https://api.x.com".into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime collection configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Search expression for the post pass.
    pub query: String,
    /// Maximum distinct posts per run.
    pub post_quota: usize,
    /// Maximum distinct replies per post.
    pub reply_quota: usize,
    /// Reveal-iteration ceiling per pass.
    pub max_rounds: u32,
    /// Fixed wait after each reveal action, in milliseconds.
    pub scroll_wait_ms: u64,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            query: config.defaults.query.clone(),
            post_quota: config.defaults.post_quota,
            reply_quota: config.defaults.reply_quota,
            max_rounds: config.defaults.max_rounds,
            scroll_wait_ms: config.defaults.scroll_wait_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.threadpull/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ThreadpullError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.threadpull/threadpull.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ThreadpullError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ThreadpullError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ThreadpullError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ThreadpullError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ThreadpullError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the content-API bearer token env var is set and non-empty.
/// Enrichment requires it; collection does not.
pub fn validate_bearer_token(config: &AppConfig) -> Result<()> {
    let var_name = &config.api.bearer_token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(ThreadpullError::config(format!(
            "content API bearer token not found. Set the {var_name} environment variable."
        ))),
    }
}
