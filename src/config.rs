//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use crate::quarters::MAX_EXTRA_BUSINESS_DAYS;
use crate::services::expiry::{ExpiryPolicy, DEFAULT_TRIAL_DURATION_MS};
use crate::services::grouping::DEFAULT_MAX_DATE_CHANGES;
use chrono::{DateTime, TimeDelta, Utc};
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Business days added after a quarter's end for the latest due date
    pub extra_business_days: u32,
    /// Due-date changes allowed per activity
    pub max_date_changes: u32,
    /// Access-period policy
    pub expiry: ExpiryPolicy,
    /// Optional JSON file with activity records to preload
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            extra_business_days: 0,
            max_date_changes: DEFAULT_MAX_DATE_CHANGES,
            expiry: ExpiryPolicy::Disabled,
            seed_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let extra_business_days: u32 = parse_var("EXTRA_BUSINESS_DAYS")?.unwrap_or(0);
        if extra_business_days > MAX_EXTRA_BUSINESS_DAYS {
            return Err(ConfigError::Invalid(
                "EXTRA_BUSINESS_DAYS",
                extra_business_days.to_string(),
            ));
        }

        Ok(Self {
            port: parse_var("PORT")?.unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            extra_business_days,
            max_date_changes: parse_var("MAX_DATE_CHANGES")?.unwrap_or(DEFAULT_MAX_DATE_CHANGES),
            expiry: expiry_from_env()?,
            seed_file: env::var("SEED_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Read the expiry policy.
///
/// `EXPIRY_DISABLED=true` wins, then an absolute `EXPIRES_AT_UTC`, then
/// `TRIAL_DURATION_MS` (21 days when unset).
fn expiry_from_env() -> Result<ExpiryPolicy, ConfigError> {
    let disabled = env::var("EXPIRY_DISABLED")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if disabled {
        return Ok(ExpiryPolicy::Disabled);
    }

    if let Ok(raw) = env::var("EXPIRES_AT_UTC") {
        let at = DateTime::parse_from_rfc3339(raw.trim())
            .map_err(|_| ConfigError::Invalid("EXPIRES_AT_UTC", raw.clone()))?
            .with_timezone(&Utc);
        return Ok(ExpiryPolicy::ExpiresAt(at));
    }

    let duration_ms: i64 = parse_var("TRIAL_DURATION_MS")?.unwrap_or(DEFAULT_TRIAL_DURATION_MS);
    Ok(ExpiryPolicy::Trial {
        duration: trial_duration(duration_ms)?,
    })
}

/// Trial length from milliseconds; must be positive.
fn trial_duration(duration_ms: i64) -> Result<TimeDelta, ConfigError> {
    if duration_ms <= 0 {
        return Err(ConfigError::Invalid(
            "TRIAL_DURATION_MS",
            duration_ms.to_string(),
        ));
    }
    TimeDelta::try_milliseconds(duration_ms)
        .ok_or_else(|| ConfigError::Invalid("TRIAL_DURATION_MS", duration_ms.to_string()))
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set env vars for test
        env::set_var("EXTRA_BUSINESS_DAYS", "5");
        env::set_var("MAX_DATE_CHANGES", "3");
        env::set_var("EXPIRES_AT_UTC", "2025-12-31T23:59:59Z");
        env::remove_var("EXPIRY_DISABLED");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.extra_business_days, 5);
        assert_eq!(config.max_date_changes, 3);
        assert!(matches!(config.expiry, ExpiryPolicy::ExpiresAt(_)));

        env::set_var("EXPIRY_DISABLED", "TRUE");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.expiry, ExpiryPolicy::Disabled);

        env::set_var("MAX_DATE_CHANGES", "two");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAX_DATE_CHANGES", _))
        ));

        env::set_var("MAX_DATE_CHANGES", "3");
        env::set_var("EXTRA_BUSINESS_DAYS", "100000");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("EXTRA_BUSINESS_DAYS", _))
        ));

        // Trial duration only applies without an absolute expiry
        env::remove_var("EXTRA_BUSINESS_DAYS");
        env::remove_var("EXPIRES_AT_UTC");
        env::remove_var("EXPIRY_DISABLED");
        env::set_var("TRIAL_DURATION_MS", "-5");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("TRIAL_DURATION_MS", _))
        ));

        env::set_var("TRIAL_DURATION_MS", "86400000");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(
            config.expiry,
            ExpiryPolicy::Trial {
                duration: TimeDelta::days(1)
            }
        );

        env::remove_var("TRIAL_DURATION_MS");
        env::remove_var("MAX_DATE_CHANGES");
    }

    #[test]
    fn test_trial_duration_must_be_positive() {
        assert!(trial_duration(0).is_err());
        assert!(trial_duration(i64::MIN).is_err());
        assert_eq!(trial_duration(1_000).unwrap(), TimeDelta::seconds(1));
        assert!(trial_duration(i64::MAX).is_ok());
    }
}
