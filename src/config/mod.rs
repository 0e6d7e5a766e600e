//! Builds the `AppConfig` from layered sources:
//! `config/base.toml`, then `config/{environment}.toml`, then `APP_`-prefixed env variables.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{
    AppConfig, DbConfig, Environment, NetConfig, SslRequire, StoreKind, WaitlistConfig,
};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong, use `AppConfig::from_env` to handle the error instead.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<20} - Initializing the configuration",
            "get_or_init_config"
        );
        AppConfig::from_env().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

impl AppConfig {
    /// Reads `APP_ENVIRONMENT` (defaults to `local`) and builds the config from `./config`.
    /// In production the database settings come from `DATABASE_URL`.
    pub fn from_env() -> ConfigResult<Self> {
        let base_path = std::env::current_dir()?;
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;

        let mut config = Self::build(&base_path.join("config"), &environment)?;

        if matches!(environment, Environment::Production) {
            let production_db =
                std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
            config.db_config = DbConfig::try_from(production_db.as_str())?;
        }

        Ok(config)
    }

    /// Merges the base file, the environment file and the env variables, in that order.
    pub fn build(config_dir: &Path, environment: &Environment) -> ConfigResult<Self> {
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let config = Self::figment(config_dir, &environment_filename)
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Ok(config)
    }

    fn figment(config_dir: &Path, environment_filename: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
    }
}
