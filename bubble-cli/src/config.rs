//! Configuration module
//!
//! Handles CLI configuration: where the master lives and how the portal
//! state containers poll it.

use bubble_portal::PortalConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the Bubble master
    pub master_url: String,

    /// Polling settings for `watch` and `log --follow`
    pub portal: PortalConfig,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.master_url.is_empty() {
            anyhow::bail!("master_url cannot be empty");
        }

        if !self.master_url.starts_with("http://") && !self.master_url.starts_with("https://") {
            anyhow::bail!("master_url must start with http:// or https://");
        }

        self.portal.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = Config {
            master_url: "http://localhost:8080".to_string(),
            portal: PortalConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.master_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        config.master_url = String::new();
        assert!(config.validate().is_err());

        config.master_url = "https://bubble.internal".to_string();
        assert!(config.validate().is_ok());
    }
}
