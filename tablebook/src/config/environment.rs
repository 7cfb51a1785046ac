//! Environment variable handling for configuration overrides.
//!
//! Every configuration field can be overridden with a `TABLEBOOK_*`
//! variable named after it in upper case, e.g.
//! `TABLEBOOK_SEATING_WINDOW_MINUTES=120`.

use std::env;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use tablebook::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that does not
    /// parse for its field.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(val) = Self::var("TABLEBOOK_AUTO_CONFIRM") {
            config.auto_confirm = Some(Self::parse_bool("TABLEBOOK_AUTO_CONFIRM", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_LOYALTY_POINTS_PER_GUEST") {
            config.loyalty_points_per_guest =
                Some(Self::parse_number("TABLEBOOK_LOYALTY_POINTS_PER_GUEST", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_CANCELLATION_NOTICE_HOURS") {
            config.cancellation_notice_hours =
                Some(Self::parse_number("TABLEBOOK_CANCELLATION_NOTICE_HOURS", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_SEATING_WINDOW_MINUTES") {
            config.seating_window_minutes =
                Some(Self::parse_number("TABLEBOOK_SEATING_WINDOW_MINUTES", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_RESERVE_LEAD_MINUTES") {
            config.reserve_lead_minutes =
                Some(Self::parse_number("TABLEBOOK_RESERVE_LEAD_MINUTES", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number("TABLEBOOK_MAXIMUM_LOCK_WAIT_SECONDS", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("TABLEBOOK_DISABLE_AUTOINIT", &val)?);
        }

        if let Some(val) = Self::var("TABLEBOOK_OUTPUT_FORMAT") {
            config.output_format = Some(val.parse().map_err(|_| {
                Error::validation(
                    "TABLEBOOK_OUTPUT_FORMAT",
                    format!("invalid output format '{val}' (expected table, json or csv)"),
                )
            })?);
        }

        Ok(())
    }

    /// Reads a variable, treating an empty value as unset.
    fn var(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::validation(
                field,
                format!("invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"),
            )),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim()
            .parse()
            .map_err(|_| {
                Error::validation(field, format!("must be a non-negative integer, got '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "TABLEBOOK_AUTO_CONFIRM",
        "TABLEBOOK_LOYALTY_POINTS_PER_GUEST",
        "TABLEBOOK_CANCELLATION_NOTICE_HOURS",
        "TABLEBOOK_SEATING_WINDOW_MINUTES",
        "TABLEBOOK_RESERVE_LEAD_MINUTES",
        "TABLEBOOK_MAXIMUM_LOCK_WAIT_SECONDS",
        "TABLEBOOK_DISABLE_AUTOINIT",
        "TABLEBOOK_OUTPUT_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_variables_leaves_config_untouched() {
        clear_env();
        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        clear_env();
        env::set_var("TABLEBOOK_AUTO_CONFIRM", "no");
        env::set_var("TABLEBOOK_SEATING_WINDOW_MINUTES", "120");
        env::set_var("TABLEBOOK_OUTPUT_FORMAT", "JSON");

        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_env();

        assert_eq!(config.auto_confirm, Some(false));
        assert_eq!(config.seating_window_minutes, Some(120));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
    }

    #[test]
    #[serial]
    fn test_invalid_number_rejected() {
        clear_env();
        env::set_var("TABLEBOOK_RESERVE_LEAD_MINUTES", "soon");
        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();

        assert!(matches!(
            result,
            Err(Error::Validation { field, .. }) if field == "TABLEBOOK_RESERVE_LEAD_MINUTES"
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_bool_rejected() {
        clear_env();
        env::set_var("TABLEBOOK_DISABLE_AUTOINIT", "maybe");
        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        for truthy in ["true", "1", "YES", "on"] {
            assert!(EnvironmentConfig::parse_bool("x", truthy).unwrap());
        }
        for falsy in ["false", "0", "No", "OFF"] {
            assert!(!EnvironmentConfig::parse_bool("x", falsy).unwrap());
        }
    }
}
