//! Job runner configuration

use serde::Deserialize;

/// Job runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Megabytes added per usage simulation tick
    pub usage_increment_mb: f64,
    /// Days between an invoice's issue date and its due date
    pub invoice_due_days: u64,
    /// Log level
    pub log_level: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            usage_increment_mb: 100.0,
            invoice_due_days: 10,
            log_level: "info".to_string(),
        }
    }
}

impl JobsConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("JOBS"))
            .build()?
            .try_deserialize()
    }
}
