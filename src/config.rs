use crate::error::config::ConfigError;

/// Name of the tracking cookie issued on click redirects.
pub static TRACKING_COOKIE_NAME: &str = "tw_vid";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub payment_provider_url: String,
    pub payment_provider_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidEnvValue {
                    var: "PORT".to_string(),
                    reason: "must be a valid port number".to_string(),
                })?,
            database_url: require("DATABASE_URL")?,
            payment_provider_url: require("PAYMENT_PROVIDER_URL")?,
            payment_provider_token: require("PAYMENT_PROVIDER_TOKEN")?,
        })
    }
}

fn require(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}
