//! Configuration loading using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (COVAULT_* prefix)

use crate::foundation::constants::DEFAULT_SUBMIT_TIMEOUT_SECS;
use crate::foundation::VaultError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix for config overrides.
///
/// Example: `COVAULT_SUBMISSION__SUBMIT_TIMEOUT_SECS` -> `submission.submit_timeout_secs`
const ENV_PREFIX: &str = "COVAULT_";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub logging: LogSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Block until the approval extrinsic is included on chain.
    #[serde(default = "default_wait_for_inclusion")]
    pub wait_for_inclusion: bool,
    /// Upper bound on a single sign-and-submit round trip. A timeout is
    /// surfaced through the same failure path as any other chain error.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
}

impl SubmissionConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self { wait_for_inclusion: default_wait_for_inclusion(), submit_timeout_secs: default_submit_timeout_secs() }
    }
}

fn default_wait_for_inclusion() -> bool {
    true
}

fn default_submit_timeout_secs() -> u64 {
    DEFAULT_SUBMIT_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogSettings {
    /// Optional directory for log files; console-only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Filter expression, e.g. `"info"` or `"covault_core=debug,root=warn"`.
    #[serde(default = "default_log_filters")]
    pub filters: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { log_dir: None, filters: default_log_filters() }
    }
}

fn default_log_filters() -> String {
    "info".to_string()
}

/// Loads configuration from defaults, an optional TOML file, and the
/// environment.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, VaultError> {
    let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    let config: EngineConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|err| VaultError::ConfigError(err.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<(), VaultError> {
    if config.submission.submit_timeout_secs == 0 {
        return Err(VaultError::ConfigError("submission.submit_timeout_secs must be at least 1".to_string()));
    }
    Ok(())
}
