//! Configuration file management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Registration settings.
    #[serde(default)]
    pub registration: RegistrationConfig,
    /// Messaging gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Payment gateway settings.
    #[serde(default)]
    pub payments: PaymentsConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// Seconds between snapshot flushes and expiry sweeps.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

/// Registration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Bonus credited to every confirmed account.
    #[serde(default = "default_starting_bonus")]
    pub starting_bonus: u64,
}

/// Messaging gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bot username embedded in registration deep links.
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
    /// Public site URL quoted in bot replies.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Outbound notification queue capacity.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Receiver wallet for hosted payment forms.
    #[serde(default)]
    pub receiver: String,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_snapshot_interval() -> u64 {
    30
}

fn default_starting_bonus() -> u64 {
    vault_types::STARTING_BONUS
}

fn default_bot_username() -> String {
    "vault_bot".to_string()
}

fn default_domain() -> String {
    "https://vault.example".to_string()
}

fn default_outbound_queue() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            starting_bonus: default_starting_bonus(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bot_username: default_bot_username(),
            domain: default_domain(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            receiver: String::new(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.server.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.server.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(dir) = std::env::var("VAULT_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("VAULT_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Vault")
        }
        #[cfg(target_os = "linux")]
        {
            dirs_fallback(".vault")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Vault")
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            dirs_fallback(".vault")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/vault"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.snapshot_interval_secs, 30);
        assert_eq!(config.registration.starting_bonus, vault_types::STARTING_BONUS);
        assert_eq!(config.gateway.bot_username, "vault_bot");
        assert_eq!(config.advanced.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = DaemonConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: DaemonConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: DaemonConfig =
            toml::from_str("[registration]\nstarting_bonus = 100\n").expect("parse");
        assert_eq!(parsed.registration.starting_bonus, 100);
        assert_eq!(parsed.gateway.bot_username, "vault_bot");
    }
}
