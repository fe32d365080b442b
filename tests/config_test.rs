use flowsmith::config::{ENV_API_KEY, ENV_MODEL, ENV_REDIS_URL, Settings};
use flowsmith::generative::http::DEFAULT_ENDPOINT;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    let engine = settings.engine_settings();
    assert_eq!(engine.generation_timeout, Duration::from_secs(30));
    assert_eq!(engine.cache_ttl, Duration::from_secs(3600));
    assert_eq!(engine.cache_prefix, "flowsmith:package");
    assert_eq!(settings.redis_url, None);
    assert_eq!(settings.generator.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
generation_timeout_secs: 5
analyzer:
  enterprise_penalty_seconds: 40
layout:
  spacing: 300
"#
    )
    .unwrap();

    let settings = Settings::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(settings.generation_timeout_secs, 5);
    assert_eq!(settings.cache_ttl_secs, 3600);
    assert_eq!(settings.analyzer.enterprise_penalty_seconds, 40);
    assert_eq!(settings.analyzer.base_seconds, 5);
    assert_eq!(settings.layout.spacing, 300);
    assert_eq!(settings.layout.origin_x, 240);
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_REDIS_URL, "redis://cache:6379/"),
        (ENV_API_KEY, "secret"),
        (ENV_MODEL, "small-model"),
    ]);

    let mut settings = Settings::default();
    settings.apply_env(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.redis_url.as_deref(), Some("redis://cache:6379/"));
    assert_eq!(settings.generator.api_key, "secret");
    assert_eq!(settings.generator.model, "small-model");
    assert_eq!(settings.generator.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn test_missing_settings_file_is_an_error() {
    assert!(Settings::load(Some("/nonexistent/flowsmith.yaml")).is_err());
}
