use crate::analysis::config::AnalyzerConfig;
use crate::compiler::synthesizer::LayoutConfig;
use crate::generative::http::GeneratorConfig;
use crate::runtime::engine::EngineSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

pub const ENV_REDIS_URL: &str = "FLOWSMITH_REDIS_URL";
pub const ENV_GENERATOR_URL: &str = "FLOWSMITH_GENERATOR_URL";
pub const ENV_API_KEY: &str = "FLOWSMITH_API_KEY";
pub const ENV_MODEL: &str = "FLOWSMITH_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache_ttl_secs: u64,
    pub generation_timeout_secs: u64,
    pub cache_prefix: String,
    /// In-memory cache when unset.
    pub redis_url: Option<String>,
    pub generator: GeneratorConfig,
    pub analyzer: AnalyzerConfig,
    pub layout: LayoutConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            cache_ttl_secs: engine.cache_ttl.as_secs(),
            generation_timeout_secs: engine.generation_timeout.as_secs(),
            cache_prefix: engine.cache_prefix,
            redis_url: None,
            generator: GeneratorConfig::default(),
            analyzer: AnalyzerConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml_file(file_path: &str) -> Result<Settings> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read settings from {}", file_path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to deserialize settings from {}", file_path))
    }

    /// Settings file if given, defaults otherwise, then environment overrides.
    pub fn load(file_path: Option<&str>) -> Result<Settings> {
        let mut settings = match file_path {
            Some(path) => Settings::from_yaml_file(path)?,
            None => Settings::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_REDIS_URL) {
            self.redis_url = Some(url);
        }
        if let Some(url) = lookup(ENV_GENERATOR_URL) {
            self.generator.endpoint = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.generator.api_key = key;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.generator.model = model;
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_prefix: self.cache_prefix.clone(),
        }
    }
}
