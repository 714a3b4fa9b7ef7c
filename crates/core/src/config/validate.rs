use super::{
    types::{AuthMethod, Config},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - PokeAPI base URL is set
/// - Sync interval, batch size and cache TTLs are non-zero
/// - Bearer auth has at least one token
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.pokeapi.base_url.trim().is_empty() {
        return Err(invalid("pokeapi.base_url cannot be empty"));
    }

    if config.sync.interval_secs == 0 {
        return Err(invalid("sync.interval_secs must be greater than 0"));
    }
    if config.sync.batch_size == 0 {
        return Err(invalid("sync.batch_size must be greater than 0"));
    }

    if config.catalog.list_cache_ttl_secs == 0 || config.catalog.detail_cache_ttl_secs == 0 {
        return Err(invalid("catalog cache TTLs must be greater than 0"));
    }

    if config.auth.method == AuthMethod::Bearer && config.auth.tokens.is_empty() {
        return Err(invalid("auth.method = \"bearer\" requires at least one token"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
