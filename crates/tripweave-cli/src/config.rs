//! Backend settings resolution: CLI flag > env var > default.

use std::time::Duration;
use tripweave_llm::LlmConfig;

/// Connection overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendFlags {
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// `0` disables the timeout.
    pub timeout_secs: Option<u64>,
}

pub fn resolve_llm_config(flags: &BackendFlags) -> LlmConfig {
    apply_flags(LlmConfig::from_env(), flags)
}

fn apply_flags(mut config: LlmConfig, flags: &BackendFlags) -> LlmConfig {
    if let Some(url) = &flags.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(model) = &flags.model {
        config.model = model.clone();
    }
    match flags.timeout_secs {
        Some(0) => config.timeout = None,
        Some(secs) => config.timeout = Some(Duration::from_secs(secs)),
        None => {}
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_config() -> LlmConfig {
        LlmConfig::from_lookup(|key| match key {
            "TRIPWEAVE_API_KEY" => Some("sk-env".to_string()),
            "TRIPWEAVE_MODEL" => Some("env-model".to_string()),
            "TRIPWEAVE_TIMEOUT_SECS" => Some("30".to_string()),
            _ => None,
        })
    }

    #[test]
    fn flags_win_over_env() {
        let flags = BackendFlags {
            base_url: Some("http://localhost:8080/v1/".to_string()),
            model: Some("flag-model".to_string()),
            timeout_secs: Some(5),
        };
        let config = apply_flags(env_config(), &flags);
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "flag-model");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn env_survives_without_flags() {
        let config = apply_flags(env_config(), &BackendFlags::default());
        assert_eq!(config.model, "env-model");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.base_url, tripweave_llm::DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let flags = BackendFlags {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(apply_flags(env_config(), &flags).timeout, None);
    }
}
