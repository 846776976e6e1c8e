use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "triage";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub cache_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
}

impl LlmProvider {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" | "" => Ok(LlmProvider::OpenAi),
            other => Err(AppError::Configuration(format!(
                "unsupported LLM provider '{other}' (supported: openai)"
            ))),
        }
    }
}

/// On-disk configuration. Every field is optional; unset values fall back to
/// environment overrides and then to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok())
    }

    /// Environment values win over stored ones.
    pub fn resolve(
        stored: StoredConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let pick = |key: &str, stored: Option<String>| {
            env_lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or(stored)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let llm_provider = pick("TRIAGE_LLM_PROVIDER", stored.llm_provider)
            .map(|value| LlmProvider::parse(&value))
            .transpose()?
            .unwrap_or(LlmProvider::OpenAi);
        let openai_api_key = pick("TRIAGE_OPENAI_API_KEY", stored.openai_api_key)
            .or_else(|| pick("OPENAI_API_KEY", None));
        let openai_base_url = pick("TRIAGE_OPENAI_BASE_URL", stored.openai_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model =
            pick("TRIAGE_MODEL", stored.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = pick("TRIAGE_TIMEOUT_SECS", stored.request_timeout_secs)
            .map(|value| parse_number::<u64>("request timeout", &value))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_retries = pick("TRIAGE_MAX_RETRIES", stored.max_retries)
            .map(|value| parse_number::<u32>("max retries", &value))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_RETRIES);
        let cache_enabled = pick("TRIAGE_CACHE_ENABLED", stored.cache_enabled)
            .map(|value| parse_flag(&value))
            .transpose()?
            .unwrap_or(true);

        Ok(Self {
            llm_provider,
            openai_api_key,
            openai_base_url,
            model,
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries,
            cache_enabled,
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .parse::<T>()
        .map_err(|_| AppError::Configuration(format!("{field} must be a number, got '{value}'")))
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "cache_enabled must be true or false, got '{other}'"
        ))),
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os("TRIAGE_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn resolves_defaults() {
        let config = AppConfig::resolve(StoredConfig::default(), env_from(&[])).unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.cache_enabled);
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            model: Some("stored-model".to_string()),
            openai_api_key: Some("stored-key".to_string()),
            max_retries: Some("5".to_string()),
            cache_enabled: Some("false".to_string()),
            ..StoredConfig::default()
        };
        let config = AppConfig::resolve(
            stored,
            env_from(&[("TRIAGE_MODEL", "env-model"), ("OPENAI_API_KEY", "fallback")]),
        )
        .unwrap();
        assert_eq!(config.model, "env-model");
        assert_eq!(config.openai_api_key.as_deref(), Some("stored-key"));
        assert_eq!(config.max_retries, 5);
        assert!(!config.cache_enabled);
    }

    #[test]
    fn falls_back_to_generic_api_key() {
        let config =
            AppConfig::resolve(StoredConfig::default(), env_from(&[("OPENAI_API_KEY", "sk-1")]))
                .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let result = AppConfig::resolve(
            StoredConfig::default(),
            env_from(&[("TRIAGE_TIMEOUT_SECS", "soon")]),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn parses_provider_names() {
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert!(matches!(
            LlmProvider::parse("gemini"),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn unknown_provider_fails_resolution() {
        let stored = StoredConfig {
            llm_provider: Some("gemini".to_string()),
            ..StoredConfig::default()
        };
        let result = AppConfig::resolve(stored, env_from(&[]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn environment_toggles_reply_cache() {
        let stored = StoredConfig {
            cache_enabled: Some("true".to_string()),
            ..StoredConfig::default()
        };
        let config =
            AppConfig::resolve(stored, env_from(&[("TRIAGE_CACHE_ENABLED", "off")])).unwrap();
        assert!(!config.cache_enabled);

        let result = AppConfig::resolve(
            StoredConfig::default(),
            env_from(&[("TRIAGE_CACHE_ENABLED", "sometimes")]),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn stored_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        assert_eq!(StoredConfig::load_from(&path).unwrap(), StoredConfig::default());

        let stored = StoredConfig {
            model: Some("gpt-4o-mini".to_string()),
            ..StoredConfig::default()
        };
        stored.save_to(&path).unwrap();
        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }
}
