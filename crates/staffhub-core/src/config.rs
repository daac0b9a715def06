//! StaffHub configuration, loaded from `~/.staffhub/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StaffHubError};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "STAFFHUB_CONFIG";
/// Environment variable supplying the backend access token.
pub const ACCESS_TOKEN_ENV: &str = "STAFFHUB_ACCESS_TOKEN";

/// Largest batched write the document backend accepts.
pub const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffHubConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl StaffHubConfig {
    /// `~/.staffhub/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".staffhub")
            .join("config.toml")
    }

    /// Resolve the config path: explicit path, then `STAFFHUB_CONFIG`, then default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StaffHubError::config(format!("Parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the resolved path, falling back to defaults when the file is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit);
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load_from(&path)
        } else {
            if explicit.is_some() {
                return Err(StaffHubError::config(format!("Config file not found: {}", path.display())));
            }
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.migration.batch_size == 0 || self.migration.batch_size > MAX_BATCH_SIZE {
            return Err(StaffHubError::config(format!(
                "migration.batch_size must be between 1 and {MAX_BATCH_SIZE}"
            )));
        }
        if self.connectivity.block_threshold == 0 {
            return Err(StaffHubError::config("connectivity.block_threshold must be at least 1"));
        }
        if self.backend.kind == BackendKind::Firestore && self.backend.project_id.is_empty() {
            tracing::warn!("backend.kind = firestore but backend.project_id is empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Firestore,
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token; falls back to `STAFFHUB_ACCESS_TOKEN`.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
    /// Local cache used when the backend is unreachable.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database() -> String { "(default)".into() }
fn default_api_base() -> String { "https://firestore.googleapis.com/v1".into() }
fn default_sqlite_path() -> PathBuf { PathBuf::from("staffhub.db") }
fn default_timeout_secs() -> u64 { 30 }

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            project_id: String::new(),
            database: default_database(),
            api_base: default_api_base(),
            access_token: String::new(),
            sqlite_path: default_sqlite_path(),
            cache_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Access token from config or environment.
    pub fn resolved_access_token(&self) -> String {
        if self.access_token.is_empty() {
            std::env::var(ACCESS_TOKEN_ENV).unwrap_or_default()
        } else {
            self.access_token.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Network errors within the window before the backend is marked blocked.
    #[serde(default = "default_block_threshold")]
    pub block_threshold: u32,
    #[serde(default = "default_error_window_secs")]
    pub error_window_secs: u64,
    #[serde(default = "default_reconnect_debounce_ms")]
    pub reconnect_debounce_ms: u64,
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,
}

fn default_block_threshold() -> u32 { 3 }
fn default_error_window_secs() -> u64 { 30 }
fn default_reconnect_debounce_ms() -> u64 { 1000 }
fn default_max_reconnect_attempts() -> u32 { 5 }
fn default_max_reconnect_delay_ms() -> u64 { 30_000 }

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            block_threshold: default_block_threshold(),
            error_window_secs: default_error_window_secs(),
            reconnect_debounce_ms: default_reconnect_debounce_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            max_reconnect_delay_ms: default_max_reconnect_delay_ms(),
        }
    }
}

impl ConnectivityConfig {
    pub fn error_window(&self) -> Duration {
        Duration::from_secs(self.error_window_secs)
    }

    pub fn reconnect_debounce(&self) -> Duration {
        Duration::from_millis(self.reconnect_debounce_ms)
    }

    pub fn max_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.max_reconnect_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Root collections copied into the tenant namespace.
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,
}

fn default_batch_size() -> usize { MAX_BATCH_SIZE }

fn default_collections() -> Vec<String> {
    [
        "departments",
        "employees",
        "jobs",
        "candidates",
        "applications",
        "interviews",
        "timesheets",
        "attendance",
        "leaveRequests",
        "payroll",
        "benefits",
        "performanceReviews",
        "trainings",
        "onboarding",
        "settings",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            collections: default_collections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8088 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}
