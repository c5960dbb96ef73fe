//! Runtime configuration shared by the API client, the report facade,
//! and the alert poller.

use std::env;
use std::time::Duration;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::Error;
use crate::timezone::local_offset_at;

/// Where the inventory API listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5050/api";

/// The timezone report dates are taken in when nothing else is
/// configured.
pub const DEFAULT_TIMEZONE: &str = "Africa/Kigali";

/// How often the alert poller refreshes the open alert count.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration resolved once at startup and passed to everything that
/// talks to the API or needs the local calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the inventory API, without a trailing slash.
    pub base_url: String,
    /// Canonical timezone name used to turn timestamps into report
    /// dates.
    pub timezone: String,
    /// Interval between alert count refreshes.
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Builds the configuration from the environment, falling back to
    /// the defaults field by field.
    ///
    /// Reads `STOCKSIGHT_API_URL`, `STOCKSIGHT_TIMEZONE`, and
    /// `STOCKSIGHT_POLL_SECONDS`. Blank or unparsable values are
    /// treated as unset.
    pub fn from_env() -> ClientConfig {
        ClientConfig {
            base_url: env_or(env::var("STOCKSIGHT_API_URL").ok(), DEFAULT_BASE_URL),
            timezone: env_or(env::var("STOCKSIGHT_TIMEZONE").ok(), DEFAULT_TIMEZONE),
            poll_interval: parse_poll_interval(env::var("STOCKSIGHT_POLL_SECONDS").ok()),
        }
    }

    /// Resolves the configured timezone to the UTC offset in force at
    /// `moment`.
    pub fn local_offset(&self, moment: OffsetDateTime) -> Result<UtcOffset, Error> {
        local_offset_at(&self.timezone, moment)
            .ok_or_else(|| Error::InvalidTimezone(self.timezone.clone()))
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<Date, Error> {
        let now = OffsetDateTime::now_utc();

        Ok(now.to_offset(self.local_offset(now)?).date())
    }
}

fn env_or(value: Option<String>, default: &str) -> String {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_poll_interval(value: Option<String>) -> Duration {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

#[cfg(test)]
mod client_config_tests {
    use std::time::Duration;

    use time::macros::datetime;

    use super::{ClientConfig, env_or, parse_poll_interval};
    use crate::error::Error;

    #[test]
    fn default_points_at_local_api() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url, "http://localhost:5050/api");
        assert_eq!(config.timezone, "Africa/Kigali");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        assert_eq!(env_or(Some("  ".to_string()), "fallback"), "fallback");
        assert_eq!(env_or(None, "fallback"), "fallback");
        assert_eq!(
            env_or(Some("http://inventory:8080/api".to_string()), "fallback"),
            "http://inventory:8080/api"
        );
    }

    #[test]
    fn poll_interval_rejects_zero_and_garbage() {
        assert_eq!(
            parse_poll_interval(Some("0".to_string())),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_poll_interval(Some("soon".to_string())),
            Duration::from_secs(30)
        );
        assert_eq!(
            parse_poll_interval(Some("5".to_string())),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn resolves_configured_timezone() {
        let config = ClientConfig::default();

        let offset = config
            .local_offset(datetime!(2024-03-15 10:00 UTC))
            .unwrap();

        assert_eq!(offset.whole_hours(), 2);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config = ClientConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..ClientConfig::default()
        };

        let got = config.local_offset(datetime!(2024-03-15 10:00 UTC));

        assert_eq!(
            got,
            Err(Error::InvalidTimezone("Mars/Olympus_Mons".to_string()))
        );
    }
}
