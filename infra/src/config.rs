//! Configuration loading for the token infrastructure
//!
//! Sources, lowest priority first:
//! 1. built-in defaults (`AppConfig::default`, per-environment log level)
//! 2. `tokenvault.toml` and `tokenvault.<environment>.toml`, both optional
//! 3. `TOKENVAULT_*` environment variables, `__` separating nested keys
//!    (e.g. `TOKENVAULT_TOKENS__BACKEND=redis`, `TOKENVAULT_CACHE__URL=...`)
//!
//! A `.env` file is loaded into the process environment first when present.

use ::config::{Config, ConfigBuilder, File, FileFormat};
use ::config::builder::DefaultState;

use tv_shared::config::{AppConfig, BackendKind, Environment, LoggingConfig};

use crate::InfrastructureError;

/// Prefix of the environment variables read by `load_config`
pub const ENV_PREFIX: &str = "TOKENVAULT";

/// Load the application configuration from files and the environment
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    let settings = defaults(environment)?
        .add_source(File::with_name("tokenvault").required(false))
        .add_source(File::with_name(environment.config_file()).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(settings.try_deserialize()?)
}

/// Parse a TOML document on top of the defaults, without touching the environment
pub fn load_from_str(contents: &str) -> Result<AppConfig, InfrastructureError> {
    let settings = defaults(Environment::default())?
        .add_source(File::from_str(contents, FileFormat::Toml))
        .build()?;

    finish(settings.try_deserialize()?)
}

fn defaults(environment: Environment) -> Result<ConfigBuilder<DefaultState>, InfrastructureError> {
    let logging = LoggingConfig::for_environment(environment);

    Ok(Config::builder()
        .set_default("environment", environment.to_string())?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format.as_str())?
        .set_default("logging.source_location", logging.source_location)?)
}

fn finish(config: AppConfig) -> Result<AppConfig, InfrastructureError> {
    validate(&config)?;
    Ok(config)
}

/// Reject settings that could never issue a valid token
pub fn validate(config: &AppConfig) -> Result<(), InfrastructureError> {
    if config.tokens.default_ttl_seconds == 0 {
        return Err(InfrastructureError::Config(
            "tokens.default_ttl_seconds must be greater than zero".to_string(),
        ));
    }

    if config.tokens.max_generation_attempts == 0 {
        return Err(InfrastructureError::Config(
            "tokens.max_generation_attempts must be at least 1".to_string(),
        ));
    }

    if config.tokens.backend == BackendKind::Redis && config.cache.url.trim().is_empty() {
        return Err(InfrastructureError::Config(
            "cache.url is required for the redis backend".to_string(),
        ));
    }

    Ok(())
}
