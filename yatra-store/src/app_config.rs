use serde::Deserialize;
use std::env;
use yatra_catalog::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Star categories offered when `/categories` returns none.
    #[serde(default = "default_categories")]
    pub fallback_categories: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fallback_categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<String> {
    vec!["5 Star".into(), "4 Star".into(), "3 Star".into()]
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `YATRA__BACKEND__BASE_URL=https://api.example.com`
            .add_source(config::Environment::with_prefix("YATRA").separator("__"));

        Self::from_sources(builder)
    }

    pub fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}
