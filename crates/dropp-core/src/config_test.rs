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
fn parse_environment_rejects_unknown() {
    let result = parse_environment("staging");
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPP_ENV"),
        "expected InvalidEnvVar(DROPP_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.items_path.to_str(), Some("./config/items.yaml"));
    assert_eq!(cfg.history_path.to_str(), Some("./data/snapshots.json"));
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert_eq!(cfg.scraper_user_agent, "dropp/0.1 (stock-monitor)");
    assert_eq!(cfg.scraper_max_concurrent_items, 4);
    assert_eq!(cfg.scraper_max_retries, 3);
    assert_eq!(cfg.scraper_retry_backoff_base_secs, 5);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("DROPP_ENV", "production");
    map.insert("DROPP_LOG_LEVEL", "debug");
    map.insert("DROPP_ITEMS_PATH", "/etc/dropp/items.yaml");
    map.insert("DROPP_HISTORY_PATH", "/var/lib/dropp/snapshots.json");
    map.insert("DROPP_SCRAPER_MAX_CONCURRENT_ITEMS", "16");
    map.insert("DROPP_SCRAPER_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.items_path.to_str(), Some("/etc/dropp/items.yaml"));
    assert_eq!(
        cfg.history_path.to_str(),
        Some("/var/lib/dropp/snapshots.json")
    );
    assert_eq!(cfg.scraper_max_concurrent_items, 16);
    assert_eq!(cfg.scraper_max_retries, 0);
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("DROPP_SCRAPER_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPP_SCRAPER_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(DROPP_SCRAPER_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_negative_retries() {
    let mut map = HashMap::new();
    map.insert("DROPP_SCRAPER_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPP_SCRAPER_MAX_RETRIES"),
        "expected InvalidEnvVar(DROPP_SCRAPER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_trims_numeric_values() {
    let mut map = HashMap::new();
    map.insert("DROPP_SCRAPER_RETRY_BACKOFF_BASE_SECS", " 10 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper_retry_backoff_base_secs, 10);
}
