//! # Server Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LOOM_*`, `.env` honoured)
//! 2. Config file (`LOOM_CONFIG`, else `<config dir>/loom/server.toml`)
//! 3. Defaults (this file)
//!
//! ## Example `server.toml`
//! ```toml
//! bind = "0.0.0.0:8080"
//!
//! [store]
//! backend = "sqlite"
//! sqlite_path = "/var/lib/loom/loom.db"
//!
//! [shop]
//! name = "Loom Boutique"
//! currency_symbol = "Rs"
//! tax_rate_bps = 0
//!
//! [auth]
//! email = "owner@example.com"
//! display_name = "Owner"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use loom_core::invoice::StoreProfile;
use loom_core::validation;
use loom_core::TaxRate;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// =============================================================================
// Sections
// =============================================================================

/// Which document store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile; for demos and tests.
    Memory,
    #[default]
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(ConfigError::InvalidValue("LOOM_STORE_BACKEND".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,

    /// Default: `<data dir>/loom.db`
    pub sqlite_path: PathBuf,

    pub max_connections: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            backend: StoreBackend::Sqlite,
            sqlite_path: default_sqlite_path(),
            max_connections: 5,
        }
    }
}

/// Shop details printed on invoices, plus the default tax rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub currency_symbol: String,

    /// Basis points; 1700 = 17%. Default: 0 (no tax).
    pub tax_rate_bps: u32,
}

impl Default for ShopSettings {
    fn default() -> Self {
        let profile = StoreProfile::default();
        ShopSettings {
            name: profile.name,
            address: profile.address,
            phone: profile.phone,
            currency_symbol: profile.currency_symbol,
            tax_rate_bps: 0,
        }
    }
}

/// The single authorized account and session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub email: String,

    /// Plain text; hashed with argon2 at startup and never kept.
    #[serde(skip_serializing)]
    pub password: String,

    pub display_name: String,

    /// Empty means a random per-process secret (sessions end on restart).
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Session lifetime in seconds. Default: 12 hours
    pub token_lifetime_secs: i64,

    /// Failed sign-ins allowed inside the window before lockout. Default: 5
    pub max_failed_attempts: u32,

    /// Default: 15 minutes
    pub lockout_window_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            email: String::new(),
            password: String::new(),
            display_name: "Owner".to_string(),
            jwt_secret: String::new(),
            token_lifetime_secs: 12 * 60 * 60,
            max_failed_attempts: 5,
            lockout_window_secs: 15 * 60,
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Default: 127.0.0.1:8080
    pub bind: String,
    pub store: StoreSettings,
    pub shop: ShopSettings,
    pub auth: AuthSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:8080".to_string(),
            store: StoreSettings::default(),
            shop: ShopSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the file (if any), applies `LOOM_*` overrides, validates.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        if config.auth.email.trim().is_empty() {
            warn!("LOOM_AUTH_EMAIL is not set; every sign-in will be rejected");
        }

        Ok(config)
    }

    /// Applies overrides from `lookup` (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("LOOM_BIND") {
            self.bind = bind;
        }

        if let Some(backend) = lookup("LOOM_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }

        if let Some(path) = lookup("LOOM_SQLITE_PATH") {
            debug!(path = %path, "Overriding SQLite path from environment");
            self.store.sqlite_path = PathBuf::from(path);
        }

        if let Some(name) = lookup("LOOM_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Some(address) = lookup("LOOM_SHOP_ADDRESS") {
            self.shop.address = address;
        }

        if let Some(phone) = lookup("LOOM_SHOP_PHONE") {
            self.shop.phone = phone;
        }

        if let Some(symbol) = lookup("LOOM_CURRENCY_SYMBOL") {
            self.shop.currency_symbol = symbol;
        }

        if let Some(bps) = lookup("LOOM_TAX_RATE_BPS") {
            self.shop.tax_rate_bps = parse_var("LOOM_TAX_RATE_BPS", &bps)?;
        }

        if let Some(email) = lookup("LOOM_AUTH_EMAIL") {
            self.auth.email = email;
        }

        if let Some(password) = lookup("LOOM_AUTH_PASSWORD") {
            self.auth.password = password;
        }

        if let Some(name) = lookup("LOOM_AUTH_DISPLAY_NAME") {
            self.auth.display_name = name;
        }

        if let Some(secret) = lookup("LOOM_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Some(secs) = lookup("LOOM_JWT_LIFETIME_SECS") {
            self.auth.token_lifetime_secs = parse_var("LOOM_JWT_LIFETIME_SECS", &secs)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        validation::validate_tax_rate_bps(self.shop.tax_rate_bps)
            .map_err(|_| ConfigError::InvalidValue("LOOM_TAX_RATE_BPS".to_string()))?;

        if self.auth.token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("LOOM_JWT_LIFETIME_SECS".to_string()));
        }

        if !self.auth.email.trim().is_empty() && self.auth.password.is_empty() {
            return Err(ConfigError::MissingRequired("LOOM_AUTH_PASSWORD".to_string()));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LOOM_BIND".to_string()))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.shop.tax_rate_bps)
    }

    /// Header block for invoices.
    pub fn store_profile(&self) -> StoreProfile {
        StoreProfile {
            name: self.shop.name.clone(),
            address: self.shop.address.clone(),
            phone: self.shop.phone.clone(),
            currency_symbol: self.shop.currency_symbol.clone(),
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "loom", "loom")
            .map(|dirs| dirs.config_dir().join("server.toml"))
    }
}

fn default_sqlite_path() -> PathBuf {
    directories::ProjectDirs::from("com", "loom", "loom")
        .map(|dirs| dirs.data_dir().join("loom.db"))
        .unwrap_or_else(|| PathBuf::from("loom.db"))
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert!(config.tax_rate().is_zero());
        assert_eq!(config.store_profile().currency_symbol, "Rs");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(env(&[
                ("LOOM_STORE_BACKEND", "memory"),
                ("LOOM_TAX_RATE_BPS", "1700"),
                ("LOOM_AUTH_EMAIL", "owner@loom.pk"),
                ("LOOM_AUTH_PASSWORD", "s3cret"),
                ("LOOM_SHOP_NAME", "Gul Textiles"),
            ]))
            .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.tax_rate().bps(), 1700);
        assert_eq!(config.auth.email, "owner@loom.pk");
        assert_eq!(config.store_profile().name, "Gul Textiles");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(env(&[("LOOM_TAX_RATE_BPS", "seventeen")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "LOOM_TAX_RATE_BPS"));

        let err = config
            .apply_overrides(env(&[("LOOM_STORE_BACKEND", "postgres")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        config.bind = "not an address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_email_without_password_is_missing_required() {
        let mut config = ServerConfig::default();
        config.auth.email = "owner@loom.pk".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_toml_sections() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind = "0.0.0.0:9000"

            [store]
            backend = "memory"

            [shop]
            name = "Loom Karachi"
            tax_rate_bps = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().port(), 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.shop.tax_rate_bps, 500);
        // Unset keys keep their defaults
        assert_eq!(config.shop.currency_symbol, "Rs");
        assert_eq!(config.auth.max_failed_attempts, 5);
    }
}
