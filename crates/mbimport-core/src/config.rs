use crate::app_config::{AppConfig, Environment};
use crate::products::DEFAULT_PRODUCT_TYPE_MARKER;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation only; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("MBIMPORT_ENV", "development"))?;
    let log_level = or_default("MBIMPORT_LOG_LEVEL", "info");

    let marketplace_id = require("MBIMPORT_MARKETPLACE_ID")?
        .parse::<i64>()
        .map_err(|e| invalid("MBIMPORT_MARKETPLACE_ID", e.to_string()))?;
    let marketplace_name = or_default("MBIMPORT_MARKETPLACE_NAME", "ozon");

    let bridge_host = require("MARKETS_BRIDGE_HOST")?;
    if !(bridge_host.starts_with("http://") || bridge_host.starts_with("https://")) {
        return Err(invalid(
            "MARKETS_BRIDGE_HOST",
            format!("expected an http(s) URL, got '{bridge_host}'"),
        ));
    }
    let bridge_login = require("MARKETS_BRIDGE_LOGIN")?;
    let bridge_password = require("MARKETS_BRIDGE_PASSWORD")?;

    let http_timeout_secs = parse_u64("MBIMPORT_HTTP_TIMEOUT_SECS", "100")?;
    if http_timeout_secs == 0 {
        return Err(invalid(
            "MBIMPORT_HTTP_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("MBIMPORT_USER_AGENT", "mbimport/0.1 (catalog-import)");

    let max_attempts = parse_u32("MBIMPORT_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(invalid(
            "MBIMPORT_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let backoff_base_ms = parse_u64("MBIMPORT_BACKOFF_BASE_MS", "1000")?;

    let max_concurrent_products = parse_usize("MBIMPORT_MAX_CONCURRENT_PRODUCTS", "1")?;
    if max_concurrent_products == 0 {
        return Err(invalid(
            "MBIMPORT_MAX_CONCURRENT_PRODUCTS",
            "must be at least 1".to_string(),
        ));
    }

    let product_type_marker =
        or_default("MBIMPORT_PRODUCT_TYPE_MARKER", DEFAULT_PRODUCT_TYPE_MARKER);
    if product_type_marker.trim().is_empty() {
        return Err(invalid(
            "MBIMPORT_PRODUCT_TYPE_MARKER",
            "must not be blank".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        marketplace_id,
        marketplace_name,
        bridge_host,
        bridge_login,
        bridge_password,
        http_timeout_secs,
        user_agent,
        max_attempts,
        backoff_base_ms,
        max_concurrent_products,
        product_type_marker,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MBIMPORT_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
