//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `GEMINI_API_KEY`, `OPENSERV_API_KEY`, `REEL_*`
//! 2. Project-local: `.reel/config.toml`
//! 3. Global: `~/.reel/config.toml`

use reel_core::{ReelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poll::{PollPolicy, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS};
use crate::usage::{BillingPolicy, DEFAULT_SERVICE_COST};

pub const PROVIDER_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PLATFORM_KEY_ENV: &str = "OPENSERV_API_KEY";
pub const PROVIDER_URL_ENV: &str = "REEL_PROVIDER_URL";
pub const PLATFORM_URL_ENV: &str = "REEL_PLATFORM_URL";

/// Video generation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_backend")]
    pub backend: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_provider_backend(),
            api_key: None,
            api_url: None,
            model: None,
        }
    }
}

fn default_provider_backend() -> String {
    "veo".to_string()
}

/// Where delivered files and usage records go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformBackend {
    #[default]
    OpenServ,
    Local,
}

/// Workspace platform settings (file storage and usage ledger)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub backend: PlatformBackend,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Root directory for the local backend
    #[serde(default = "default_local_root")]
    pub root: String,
    /// Prefix of every uploaded file name
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            backend: PlatformBackend::default(),
            api_key: None,
            base_url: None,
            root: default_local_root(),
            path_prefix: default_path_prefix(),
        }
    }
}

fn default_local_root() -> String {
    ".reel/workspaces".to_string()
}

fn default_path_prefix() -> String {
    "veo3-video-".to_string()
}

/// Completion polling bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_POLL_ATTEMPTS
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
        }
    }
}

/// Flat-rate billing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default = "default_service_cost")]
    pub service_cost: u64,
    /// Abort the invocation when the usage record cannot be posted
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            service_cost: default_service_cost(),
            fail_on_error: false,
        }
    }
}

fn default_service_cost() -> u64 {
    DEFAULT_SERVICE_COST
}

impl BillingConfig {
    pub fn policy(&self) -> BillingPolicy {
        BillingPolicy {
            service_cost: self.service_cost,
            fail_on_error: self.fail_on_error,
        }
    }
}

/// Top-level config file structure.
///
/// Every table is optional in the file, so overlays are parsed into
/// `Option`s to tell "absent" apart from "set to the default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelConfigFile {
    #[serde(default)]
    pub provider: Option<ProviderConfigFile>,
    #[serde(default)]
    pub platform: Option<PlatformConfigFile>,
    #[serde(default)]
    pub polling: Option<PollingConfigFile>,
    #[serde(default)]
    pub billing: Option<BillingConfigFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfigFile {
    pub backend: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfigFile {
    pub backend: Option<PlatformBackend>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub root: Option<String>,
    pub path_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingConfigFile {
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfigFile {
    pub service_cost: Option<u64>,
    pub fail_on_error: Option<bool>,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReelConfig {
    pub provider: ProviderConfig,
    pub platform: PlatformConfig,
    pub polling: PollingConfig,
    pub billing: BillingConfig,
}

impl ReelConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ReelConfig::default();

        // Layer 1: Global config (~/.reel/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::load_file(&global_path)?);
            }
        }

        // Layer 2: Project-local config (.reel/config.toml)
        let local_path = PathBuf::from(".reel/config.toml");
        if local_path.exists() {
            config.merge(Self::load_file(&local_path)?);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Load config from a specific file path only, then apply the environment
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = ReelConfig::default();
        config.merge(Self::load_file(path)?);
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// The provider API key, or a `Configuration` error naming the variable
    pub fn require_provider_key(&self) -> Result<&str> {
        non_empty(self.provider.api_key.as_deref()).ok_or_else(|| {
            ReelError::Configuration(format!(
                "Gemini API key not configured. Set {} or add [provider] api_key to .reel/config.toml",
                PROVIDER_KEY_ENV
            ))
        })
    }

    /// The platform API key, or a `Configuration` error naming the variable
    pub fn require_platform_key(&self) -> Result<&str> {
        non_empty(self.platform.api_key.as_deref()).ok_or_else(|| {
            ReelError::Configuration(format!(
                "OpenServ API key not configured. Set {} or add [platform] api_key to .reel/config.toml",
                PLATFORM_KEY_ENV
            ))
        })
    }

    /// Check every secret the configured backends need, before any network call
    pub fn require_secrets(&self) -> Result<()> {
        if self.provider.backend == "veo" {
            self.require_provider_key()?;
        }
        if self.platform.backend == PlatformBackend::OpenServ {
            self.require_platform_key()?;
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".reel").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ReelConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: ReelConfigFile = toml::from_str(&content).map_err(|e| {
            ReelError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Overlay every value the file sets
    pub fn merge(&mut self, overlay: ReelConfigFile) {
        if let Some(provider) = overlay.provider {
            set_if_some(&mut self.provider.backend, provider.backend);
            set_opt_if_some(&mut self.provider.api_key, provider.api_key);
            set_opt_if_some(&mut self.provider.api_url, provider.api_url);
            set_opt_if_some(&mut self.provider.model, provider.model);
        }

        if let Some(platform) = overlay.platform {
            set_if_some(&mut self.platform.backend, platform.backend);
            set_opt_if_some(&mut self.platform.api_key, platform.api_key);
            set_opt_if_some(&mut self.platform.base_url, platform.base_url);
            set_if_some(&mut self.platform.root, platform.root);
            set_if_some(&mut self.platform.path_prefix, platform.path_prefix);
        }

        if let Some(polling) = overlay.polling {
            set_if_some(&mut self.polling.interval_secs, polling.interval_secs);
            set_if_some(&mut self.polling.max_attempts, polling.max_attempts);
        }

        if let Some(billing) = overlay.billing {
            set_if_some(&mut self.billing.service_cost, billing.service_cost);
            set_if_some(&mut self.billing.fail_on_error, billing.fail_on_error);
        }
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        set_opt_if_some(&mut self.provider.api_key, lookup(PROVIDER_KEY_ENV));
        set_opt_if_some(&mut self.provider.api_url, lookup(PROVIDER_URL_ENV));
        set_opt_if_some(&mut self.platform.api_key, lookup(PLATFORM_KEY_ENV));
        set_opt_if_some(&mut self.platform.base_url, lookup(PLATFORM_URL_ENV));
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn set_opt_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
