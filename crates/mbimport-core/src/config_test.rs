use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("MBIMPORT_MARKETPLACE_ID", "1");
    m.insert("MARKETS_BRIDGE_HOST", "https://bridge.example.com/");
    m.insert("MARKETS_BRIDGE_LOGIN", "importer");
    m.insert("MARKETS_BRIDGE_PASSWORD", "s3cret");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn environment_display_round_trips() {
    for env in [
        Environment::Development,
        Environment::Test,
        Environment::Production,
    ] {
        assert_eq!(parse_environment(&env.to_string()).unwrap(), env);
    }
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("producton").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MBIMPORT_ENV"));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.marketplace_id, 1);
    assert_eq!(cfg.marketplace_name, "ozon");
    assert_eq!(cfg.bridge_host, "https://bridge.example.com/");
    assert_eq!(cfg.bridge_login, "importer");
    assert_eq!(cfg.bridge_password, "s3cret");
    assert_eq!(cfg.http_timeout_secs, 100);
    assert_eq!(cfg.user_agent, "mbimport/0.1 (catalog-import)");
    assert_eq!(cfg.max_attempts, 3);
    assert_eq!(cfg.backoff_base_ms, 1000);
    assert_eq!(cfg.max_concurrent_products, 1);
    assert_eq!(cfg.product_type_marker, "Тип");
}

#[test]
fn build_app_config_fails_without_marketplace_id() {
    let mut map = full_env();
    map.remove("MBIMPORT_MARKETPLACE_ID");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "MBIMPORT_MARKETPLACE_ID"),
        "expected MissingEnvVar(MBIMPORT_MARKETPLACE_ID), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_non_numeric_marketplace_id() {
    let mut map = full_env();
    map.insert("MBIMPORT_MARKETPLACE_ID", "ozon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MBIMPORT_MARKETPLACE_ID"),
        "expected InvalidEnvVar(MBIMPORT_MARKETPLACE_ID), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_credentials() {
    for var in ["MARKETS_BRIDGE_LOGIN", "MARKETS_BRIDGE_PASSWORD"] {
        let mut map = full_env();
        map.remove(var);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == var),
            "expected MissingEnvVar({var}), got: {result:?}"
        );
    }
}

#[test]
fn build_app_config_rejects_non_http_host() {
    let mut map = full_env();
    map.insert("MARKETS_BRIDGE_HOST", "bridge.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKETS_BRIDGE_HOST"),
        "expected InvalidEnvVar(MARKETS_BRIDGE_HOST), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_attempts() {
    let mut map = full_env();
    map.insert("MBIMPORT_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MBIMPORT_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(MBIMPORT_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = full_env();
    map.insert("MBIMPORT_HTTP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MBIMPORT_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MBIMPORT_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_concurrency() {
    let mut map = full_env();
    map.insert("MBIMPORT_MAX_CONCURRENT_PRODUCTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MBIMPORT_MAX_CONCURRENT_PRODUCTS"),
        "expected InvalidEnvVar(MBIMPORT_MAX_CONCURRENT_PRODUCTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("MBIMPORT_ENV", "production");
    map.insert("MBIMPORT_MAX_ATTEMPTS", "5");
    map.insert("MBIMPORT_BACKOFF_BASE_MS", "250");
    map.insert("MBIMPORT_MAX_CONCURRENT_PRODUCTS", "8");
    map.insert("MBIMPORT_PRODUCT_TYPE_MARKER", "Type");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.backoff_base_ms, 250);
    assert_eq!(cfg.max_concurrent_products, 8);
    assert_eq!(cfg.product_type_marker, "Type");
}

#[test]
fn build_app_config_rejects_blank_marker() {
    let mut map = full_env();
    map.insert("MBIMPORT_PRODUCT_TYPE_MARKER", "  ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MBIMPORT_PRODUCT_TYPE_MARKER"),
        "expected InvalidEnvVar(MBIMPORT_PRODUCT_TYPE_MARKER), got: {result:?}"
    );
}

#[test]
fn debug_redacts_password() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("s3cret"), "password leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
