use crate::core::models::Currency;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub store_timeout: Duration,
    pub request_timeout: Duration,
    pub default_currency: Currency,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("store_timeout_ms", &self.store_timeout.as_millis())
            .field("request_timeout_secs", &self.request_timeout.as_secs())
            .field("default_currency", &self.default_currency.to_string())
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            store_timeout: Duration::from_millis(
                env::var("STORE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            ),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            default_currency: env::var("DEFAULT_CURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Currency::Usd),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
