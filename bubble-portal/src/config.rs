//! Portal configuration
//!
//! Timing of the refresh and log polling loops, and display settings for
//! command aliases.

use std::time::Duration;

/// Portal configuration
///
/// Intervals are configurable so a terminal front-end can poll a slow
/// master less aggressively than the browser dashboard does.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// How often a bound [`JobMonitor`](crate::JobMonitor) refreshes its page
    pub refresh_interval: Duration,

    /// Delay between two log fetches of an active command
    pub log_poll_interval: Duration,

    /// Aliases longer than this many characters are shortened for display
    pub alias_width: usize,
}

impl PortalConfig {
    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables, all optional:
    /// - BUBBLE_REFRESH_INTERVAL_MS (default: 3000)
    /// - BUBBLE_LOG_POLL_INTERVAL_MS (default: 1000)
    /// - BUBBLE_ALIAS_WIDTH (default: 14)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let refresh_interval = std::env::var("BUBBLE_REFRESH_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.refresh_interval);

        let log_poll_interval = std::env::var("BUBBLE_LOG_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.log_poll_interval);

        let alias_width = std::env::var("BUBBLE_ALIAS_WIDTH")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.alias_width);

        let config = Self {
            refresh_interval,
            log_poll_interval,
            alias_width,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.refresh_interval.is_zero() {
            anyhow::bail!("refresh_interval must be greater than 0");
        }

        if self.log_poll_interval.is_zero() {
            anyhow::bail!("log_poll_interval must be greater than 0");
        }

        if self.alias_width == 0 {
            anyhow::bail!("alias_width must be greater than 0");
        }

        Ok(())
    }

    /// Shortens an alias for display
    ///
    /// Aliases longer than `alias_width` characters keep their first
    /// `alias_width` characters followed by `...`.
    pub fn display_alias(&self, alias: &str) -> String {
        if alias.chars().count() > self.alias_width {
            let head: String = alias.chars().take(self.alias_width).collect();
            format!("{}...", head)
        } else {
            alias.to_string()
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(3),
            log_poll_interval: Duration::from_secs(1),
            alias_width: 14,
        }
    }
}
