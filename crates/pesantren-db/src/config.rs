//! # Ledger Configuration
//!
//! Where the database lives, how the binaries log, and the default bagi
//! hasil percentages offered to the back office.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PESANTREN_DB_PATH=/srv/ledger.db                                   │
//! │     PESANTREN_PERSENTASE_YAYASAN=60                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pesantren-ledger/ledger.toml (Linux)                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/pesantren/ledger.db"
//! max_connections = 5
//!
//! [logging]
//! filter = "info,pesantren=debug,sqlx=warn"
//!
//! [bagi_hasil]
//! persentase_yayasan = 60.0
//! persentase_koperasi = 40.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;
use pesantren_core::validation::validate_persentase_pair;
use pesantren_core::BagiHasilRequest;

/// Default tracing filter for the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info,pesantren=debug,sqlx=warn";

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

/// `[bagi_hasil]` section: percentages pre-filled into a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BagiHasilDefaults {
    #[serde(default = "default_persentase_yayasan")]
    pub persentase_yayasan: f64,

    #[serde(default = "default_persentase_koperasi")]
    pub persentase_koperasi: f64,
}

fn default_persentase_yayasan() -> f64 {
    60.0
}

fn default_persentase_koperasi() -> f64 {
    40.0
}

impl Default for BagiHasilDefaults {
    fn default() -> Self {
        BagiHasilDefaults {
            persentase_yayasan: default_persentase_yayasan(),
            persentase_koperasi: default_persentase_koperasi(),
        }
    }
}

// =============================================================================
// Ledger Config
// =============================================================================

/// Complete configuration for the ledger binaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub bagi_hasil: BagiHasilDefaults,
}

impl LedgerConfig {
    /// Loads configuration: defaults, then the TOML file (if present), then
    /// `PESANTREN_*` environment overrides, then [`LedgerConfig::validate`].
    ///
    /// `config_path` of `None` uses the platform config directory.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading ledger config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections take their defaults.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    ///
    /// The default percentages must be a pair a bagi hasil run would
    /// accept, so a misconfigured default is caught at startup rather than
    /// on the first run.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        validate_persentase_pair(
            self.bagi_hasil.persentase_yayasan,
            self.bagi_hasil.persentase_koperasi,
        )
        .map_err(|e| DbError::InvalidConfig(format!("bagi_hasil: {e}")))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup` (the environment in production).
    ///
    /// Unparseable numbers are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PESANTREN_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("PESANTREN_DB_MAX_CONNECTIONS") {
            match value.parse() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %value, "Ignoring invalid PESANTREN_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(filter) = lookup("PESANTREN_LOG") {
            self.logging.filter = filter;
        }

        if let Some(value) = lookup("PESANTREN_PERSENTASE_YAYASAN") {
            match value.parse() {
                Ok(pct) => self.bagi_hasil.persentase_yayasan = pct,
                Err(_) => warn!(value = %value, "Ignoring invalid PESANTREN_PERSENTASE_YAYASAN"),
            }
        }

        if let Some(value) = lookup("PESANTREN_PERSENTASE_KOPERASI") {
            match value.parse() {
                Ok(pct) => self.bagi_hasil.persentase_koperasi = pct,
                Err(_) => warn!(value = %value, "Ignoring invalid PESANTREN_PERSENTASE_KOPERASI"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "pesantren", "ledger")
            .map(|dirs| dirs.config_dir().join("ledger.toml"))
    }

    fn default_database_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "pesantren", "ledger")
            .map(|dirs| dirs.data_dir().join("ledger.db"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved database file path.
    pub fn database_path(&self) -> DbResult<PathBuf> {
        self.database
            .path
            .clone()
            .or_else(Self::default_database_path)
            .ok_or_else(|| DbError::InvalidConfig("No database path available".into()))
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.database.max_connections))
    }

    /// A bagi hasil request pre-filled with the configured percentages.
    pub fn bagi_hasil_request(
        &self,
        periode_start: &str,
        periode_end: &str,
        biaya_operasional: f64,
    ) -> BagiHasilRequest {
        BagiHasilRequest::new(
            periode_start,
            periode_end,
            biaya_operasional,
            self.bagi_hasil.persentase_yayasan,
            self.bagi_hasil.persentase_koperasi,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LedgerConfig::from_toml(
            r#"
            [database]
            path = "/srv/pesantren/ledger.db"

            [bagi_hasil]
            persentase_yayasan = 70.0
            persentase_koperasi = 30.0
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/srv/pesantren/ledger.db")));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.bagi_hasil.persentase_yayasan, 70.0);
        assert_eq!(config.logging, LoggingSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = LedgerConfig::from_toml("[database\npath = 1").unwrap_err();
        assert!(matches!(err, DbError::TomlParse(_)));
    }

    #[test]
    fn test_percentages_must_sum_to_100() {
        let mut config = LedgerConfig::default();
        config.bagi_hasil.persentase_koperasi = 50.0;

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid ledger configuration: bagi_hasil: Total persentase bagi hasil harus 100%"
        );
    }

    #[test]
    fn test_zero_connections_rejected() {
        let mut config = LedgerConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(DbError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PESANTREN_DB_PATH", "/tmp/override.db"),
            ("PESANTREN_DB_MAX_CONNECTIONS", "not-a-number"),
            ("PESANTREN_PERSENTASE_YAYASAN", "75"),
            ("PESANTREN_PERSENTASE_KOPERASI", "25"),
        ]);

        let mut config = LedgerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.bagi_hasil.persentase_yayasan, 75.0);
        assert!(config.validate().is_ok());

        let db_config = config.db_config().unwrap();
        assert_eq!(db_config.database_path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        let config = LedgerConfig::load(Some(path)).unwrap();
        assert_eq!(config.bagi_hasil, BagiHasilDefaults::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("ledger-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[logging]\nfilter = \"warn\"\n").unwrap();

        let config = LedgerConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_uses_configured_percentages() {
        let config = LedgerConfig::default();
        let request = config.bagi_hasil_request("2026-01-01", "2026-01-31", 10_000.0);
        assert_eq!(request.persentase_yayasan, 60.0);
        assert_eq!(request.persentase_koperasi, 40.0);
        assert_eq!(request.periode_start.as_deref(), Some("2026-01-01"));
    }

    #[tokio::test]
    async fn test_configured_path_in_missing_directory_opens() {
        let root = std::env::temp_dir().join(format!("ledger-{}", uuid::Uuid::new_v4()));
        let mut config = LedgerConfig::default();
        config.database.path = Some(root.join("pesantren").join("ledger.db"));

        let db = crate::Database::new(config.db_config().unwrap()).await.unwrap();
        assert!(db.health_check().await);
        assert!(config.database_path().unwrap().exists());

        db.close().await;
        std::fs::remove_dir_all(&root).unwrap();
    }
}
