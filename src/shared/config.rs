use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub maintenance: MaintenanceConfig,
    pub connectivity: ConnectivityConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of the in-memory fallback envelope.
    pub envelope_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Run periodic maintenance in the background.
    pub enabled: bool,
    pub action_retention_days: u32,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    pub probe_url: String,
    pub probe_timeout_ms: u64,
    pub wait_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                connection_timeout: 30,
            },
            cache: CacheConfig {
                envelope_ttl_secs: 3600, // 1 hour
            },
            maintenance: MaintenanceConfig {
                enabled: true,
                action_retention_days: 7,
                interval_secs: 6 * 3600,
            },
            connectivity: ConnectivityConfig {
                probe_url: "https://clients3.google.com/generate_204".to_string(),
                probe_timeout_ms: 5_000,
                wait_timeout_ms: 30_000,
            },
            remote: RemoteConfig {
                base_url: "http://localhost:8080/api".to_string(),
                request_timeout_secs: 15,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("INVENTORY_OFFLINE_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_DATABASE_TIMEOUT_SECS") {
            cfg.database.connection_timeout = value.max(1);
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_ENVELOPE_TTL_SECS") {
            cfg.cache.envelope_ttl_secs = value.max(1);
        }
        if let Ok(v) = std::env::var("INVENTORY_OFFLINE_MAINTENANCE_ENABLED") {
            cfg.maintenance.enabled = parse_bool(&v, cfg.maintenance.enabled);
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_ACTION_RETENTION_DAYS") {
            cfg.maintenance.action_retention_days = u32::try_from(value.max(1)).unwrap_or(u32::MAX);
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_MAINTENANCE_INTERVAL_SECS") {
            cfg.maintenance.interval_secs = value.max(60);
        }
        if let Ok(v) = std::env::var("INVENTORY_OFFLINE_PROBE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.connectivity.probe_url = v.to_string();
            }
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_PROBE_TIMEOUT_MS") {
            cfg.connectivity.probe_timeout_ms = value.max(1);
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_WAIT_TIMEOUT_MS") {
            cfg.connectivity.wait_timeout_ms = value;
        }
        if let Ok(v) = std::env::var("INVENTORY_OFFLINE_API_BASE_URL") {
            let v = v.trim().trim_end_matches('/');
            if !v.is_empty() {
                cfg.remote.base_url = v.to_string();
            }
        }
        if let Some(value) = env_u64("INVENTORY_OFFLINE_API_TIMEOUT_SECS") {
            cfg.remote.request_timeout_secs = value.max(1);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.connection_timeout == 0 {
            return Err("Database connection_timeout must be greater than 0".to_string());
        }
        if self.cache.envelope_ttl_secs == 0 {
            return Err("Cache envelope_ttl_secs must be greater than 0".to_string());
        }
        if self.maintenance.action_retention_days == 0 {
            return Err("Maintenance action_retention_days must be greater than 0".to_string());
        }
        if self.maintenance.interval_secs == 0 {
            return Err("Maintenance interval_secs must be greater than 0".to_string());
        }
        if self.connectivity.probe_url.trim().is_empty() {
            return Err("Connectivity probe_url must not be empty".to_string());
        }
        if self.connectivity.probe_timeout_ms == 0 {
            return Err("Connectivity probe_timeout_ms must be greater than 0".to_string());
        }
        if self.remote.base_url.trim().is_empty() {
            return Err("Remote base_url must not be empty".to_string());
        }
        if self.remote.request_timeout_secs == 0 {
            return Err("Remote request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_local_dir()
        .map(|dir| dir.join("inventory-offline"))
        .unwrap_or_else(|| PathBuf::from("./data"));
    format!(
        "sqlite:{}?mode=rwc",
        dir.join("inventory-offline.db").display()
    )
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| parse_u64(&v))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.maintenance.action_retention_days, 7);
        assert!(cfg.database.url.starts_with("sqlite:"));
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let mut cfg = AppConfig::default();
        cfg.cache.envelope_ttl_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_remote_url() {
        let mut cfg = AppConfig::default();
        cfg.remote.base_url = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_helpers() {
        assert!(parse_bool("YES", false));
        assert!(!parse_bool("off", true));
        assert!(parse_bool("maybe", true));
        assert_eq!(parse_u64(" 42 "), Some(42));
        assert_eq!(parse_u64("x"), None);
    }
}
