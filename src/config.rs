use crate::models::DEFAULT_DEAL_THRESHOLD;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
    pub create_if_missing: bool,
}

/// Statistics and ingestion settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Days of history covered by min/max/avg
    pub stats_window_days: u32,
    /// Current price must be below `avg * deal_threshold` to count as a deal
    pub deal_threshold: Decimal,
    /// Default number of observations returned by history queries
    pub recent_limit: u32,
    /// Reject observations whose product or retailer is not in the catalog
    pub enforce_referential_integrity: bool,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub tracker: TrackerConfig,
    pub log_level: String,
    pub environment: String,
    pub export_path: Option<PathBuf>,
    pub seed_starter_catalog: bool,
}

fn parse_setting<T>(key: &str, raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| format!("Invalid {} '{}': {}", key, raw, e))
}

/// `Ok(None)` when unset; a set but unparseable value is an error
fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_setting(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let url = env::var("DATABASE_URL").unwrap_or(defaults.url);

        let max_connections =
            env_parse::<u32>("DATABASE_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections);

        let acquire_timeout_secs = env_parse::<u64>("DATABASE_ACQUIRE_TIMEOUT_SECS")?
            .unwrap_or(defaults.acquire_timeout_secs);

        let idle_timeout_secs = env_parse::<u64>("DATABASE_IDLE_TIMEOUT_SECS")?
            .unwrap_or(defaults.idle_timeout_secs);

        let max_lifetime_secs = env_parse::<u64>("DATABASE_MAX_LIFETIME_SECS")?
            .unwrap_or(defaults.max_lifetime_secs);

        let test_before_acquire = env_parse::<bool>("DATABASE_TEST_BEFORE_ACQUIRE")?
            .unwrap_or(defaults.test_before_acquire);

        let create_if_missing = env_parse::<bool>("DATABASE_CREATE_IF_MISSING")?
            .unwrap_or(defaults.create_if_missing);

        let config = Self {
            url,
            max_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            test_before_acquire,
            create_if_missing,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.url.starts_with("sqlite:") {
            return Err(format!("DATABASE_URL must be a sqlite: URL, got {}", self.url));
        }

        if self.max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/prices.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,   // 10 minutes
            max_lifetime_secs: 1800,  // 30 minutes
            test_before_acquire: true,
            create_if_missing: true,
        }
    }
}

impl TrackerConfig {
    /// Create tracker config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let stats_window_days =
            env_parse::<u32>("STATS_WINDOW_DAYS")?.unwrap_or(defaults.stats_window_days);

        let deal_threshold =
            env_parse::<Decimal>("DEAL_THRESHOLD")?.unwrap_or(defaults.deal_threshold);

        let recent_limit = env_parse::<u32>("RECENT_LIMIT")?.unwrap_or(defaults.recent_limit);

        let enforce_referential_integrity = env_parse::<bool>("ENFORCE_REFERENTIAL_INTEGRITY")?
            .unwrap_or(defaults.enforce_referential_integrity);

        let config = Self {
            stats_window_days,
            deal_threshold,
            recent_limit,
            enforce_referential_integrity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.stats_window_days == 0 {
            return Err("STATS_WINDOW_DAYS must be greater than 0".to_string());
        }

        if self.deal_threshold <= Decimal::ZERO || self.deal_threshold > Decimal::ONE {
            return Err(format!(
                "DEAL_THRESHOLD must be in (0, 1], got {}",
                self.deal_threshold
            ));
        }

        if self.recent_limit == 0 {
            return Err("RECENT_LIMIT must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            stats_window_days: 30,
            deal_threshold: DEFAULT_DEAL_THRESHOLD,
            recent_limit: 30,
            enforce_referential_integrity: false,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let tracker = TrackerConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let export_path = env::var("EXPORT_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let seed_starter_catalog = env_parse::<bool>("SEED_STARTER_CATALOG")?.unwrap_or(false);

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            database,
            tracker,
            log_level: log_level.to_lowercase(),
            environment: environment.to_lowercase(),
            export_path,
            seed_starter_catalog,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Get database URL (convenience method)
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            tracker: TrackerConfig::default(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
            export_path: None,
            seed_starter_catalog: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_rejects_other_backends() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/prices".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracker_config_default() {
        let config = TrackerConfig::default();
        assert_eq!(config.stats_window_days, 30);
        assert_eq!(config.deal_threshold, dec!(0.95));
        assert!(!config.enforce_referential_integrity);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tracker_config_rejects_bad_threshold() {
        let mut config = TrackerConfig::default();
        config.deal_threshold = dec!(1.2);
        assert!(config.validate().is_err());

        config.deal_threshold = Decimal::ZERO;
        assert!(config.validate().is_err());

        config.deal_threshold = Decimal::ONE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.database_url(), "sqlite://data/prices.db");
        assert!(config.export_path.is_none());
    }

    #[test]
    fn test_parse_setting_rejects_garbage() {
        assert_eq!(parse_setting::<u32>("STATS_WINDOW_DAYS", " 14 "), Ok(14));
        assert!(parse_setting::<u32>("STATS_WINDOW_DAYS", "thirty").is_err());
        assert!(parse_setting::<bool>("ENFORCE_REFERENTIAL_INTEGRITY", "yes").is_err());
        assert_eq!(parse_setting::<Decimal>("DEAL_THRESHOLD", "0.9"), Ok(dec!(0.9)));
    }

    #[test]
    fn test_tracker_config_from_env_rejects_unparseable_values() {
        env::set_var("STATS_WINDOW_DAYS", "thirty");
        let err = TrackerConfig::from_env().unwrap_err();
        assert!(err.contains("STATS_WINDOW_DAYS"));
        env::remove_var("STATS_WINDOW_DAYS");

        env::set_var("ENFORCE_REFERENTIAL_INTEGRITY", "yes");
        let err = TrackerConfig::from_env().unwrap_err();
        assert!(err.contains("ENFORCE_REFERENTIAL_INTEGRITY"));

        env::set_var("ENFORCE_REFERENTIAL_INTEGRITY", "true");
        let config = TrackerConfig::from_env().unwrap();
        assert!(config.enforce_referential_integrity);
        env::remove_var("ENFORCE_REFERENTIAL_INTEGRITY");
    }
}
