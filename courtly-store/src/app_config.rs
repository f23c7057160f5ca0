use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Process configuration, loaded once at startup and passed down explicitly.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
    pub pricing: PricingConfig,
    pub venue: VenueConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8787 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Stripe,
    Mock,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentConfig {
    pub provider: ProviderKind,
    pub secret_key: Option<String>,
    pub api_base: String,
    pub timeout_ms: u64,
    /// Public origin of the front-end, used to build redirect URLs.
    pub public_base_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Mock,
            secret_key: None,
            api_base: "https://api.stripe.com".to_string(),
            timeout_ms: 15_000,
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    /// Major units of `currency`.
    pub price_per_slot: i64,
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_slot: 50_000,
            currency: "idr".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VenueConfig {
    pub time_zone: String,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            time_zone: courtly_core::clock::DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

/// Flat variable names used by earlier deployments, mapped onto config keys.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("STRIPE_SECRET_KEY", "payment.secret_key"),
    ("PUBLIC_BASE_URL", "payment.public_base_url"),
    ("PRICE_PER_SLOT", "pricing.price_per_slot"),
    ("PRICE_CURRENCY", "pricing.currency"),
    ("TIME_ZONE", "venue.time_zone"),
];

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Every file is optional; built-in defaults cover all keys
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // Eg.. `COURTLY__VENUE__TIME_ZONE=Asia/Singapore`
            .add_source(Environment::with_prefix("COURTLY").separator("__"));

        for (var, key) in LEGACY_ENV_KEYS {
            let value = env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pricing.price_per_slot <= 0 {
            return Err(ConfigError::Message(
                "pricing.price_per_slot must be positive".to_string(),
            ));
        }
        if self.pricing.currency.trim().is_empty() {
            return Err(ConfigError::Message("pricing.currency must be set".to_string()));
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        if self.payment.provider == ProviderKind::Stripe
            && self.payment.secret_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(ConfigError::Message(
                "payment.secret_key is required for the stripe provider".to_string(),
            ));
        }
        Ok(())
    }
}
