use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_WORDS_DIR: &str = "words";
pub const ENV_DEEPSEEK_API_KEY: &str = "DEEPSEEK_API_KEY";
pub const ENV_API_TOKEN_HASHES: &str = "EMOTION_API_TOKEN_HASHES";
pub const ENV_WORDS_DIR: &str = "EMOTION_WORDS_DIR";

/// Maximum accepted input length in characters.
pub const MAX_TEXT_LEN: usize = 10_000;
/// At most this many unknown words are sent to the external classifier per
/// request, to keep request latency bounded.
pub const MAX_UNKNOWN_WORDS_PER_REQUEST: usize = 5;
/// A word only participates in aggregation when its dominant emotion
/// probability exceeds this.
pub const CONFIDENCE_THRESHOLD: f64 = 0.25;
/// Sliding-window rate limit: this many requests per window per token.
pub const RATE_LIMIT_MAX_REQUESTS: usize = 100;
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub words_dir: PathBuf,
    pub deepseek_api_key: Option<ApiKey>,
    pub token_hashes: Vec<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api key must not be empty")]
    EmptyApiKey,
    #[error("bind address must not be empty")]
    EmptyBindAddr,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiKey::new(v)?)),
        None => match env.var(env_key) {
            Some(v) => Ok(Some(ApiKey::new(v)?)),
            None => Ok(None),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

/// Token hashes are supplied as a comma-separated list of lowercase SHA-256
/// hex digests. An empty list disables authentication.
pub fn resolve_token_hashes(env_key: &str, env: &impl Env) -> Vec<String> {
    env.var(env_key)
        .map(|raw| {
            raw.split(',')
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_DEEPSEEK_API_KEY, "env-key");
        let key = resolve_api_key(Some("cli-key".to_owned()), ENV_DEEPSEEK_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "cli-key");
    }

    #[test]
    fn api_key_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_DEEPSEEK_API_KEY, "env-key");
        let key = resolve_api_key(None, ENV_DEEPSEEK_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "env-key");
    }

    #[test]
    fn api_key_absent_when_both_missing() {
        let env = MapEnv::default();
        let key = resolve_api_key(None, ENV_DEEPSEEK_API_KEY, &env).expect("valid");
        assert!(key.is_none());
    }

    #[test]
    fn empty_api_key_rejected() {
        let env = MapEnv::default();
        let err = resolve_api_key(Some("  ".to_owned()), ENV_DEEPSEEK_API_KEY, &env).unwrap_err();
        assert_eq!(err, ConfigError::EmptyApiKey);
    }

    #[test]
    fn token_hashes_parsed_and_lowercased() {
        let env = MapEnv::default().with_var(ENV_API_TOKEN_HASHES, "ABC123, def456 ,,");
        let hashes = resolve_token_hashes(ENV_API_TOKEN_HASHES, &env);
        assert_eq!(hashes, vec!["abc123".to_owned(), "def456".to_owned()]);
    }

    #[test]
    fn token_hashes_empty_when_unset() {
        let env = MapEnv::default();
        assert!(resolve_token_hashes(ENV_API_TOKEN_HASHES, &env).is_empty());
    }

    #[test]
    fn resolve_string_with_default_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_WORDS_DIR, "data/words");
        let v = resolve_string_with_default(None, ENV_WORDS_DIR, &env, DEFAULT_WORDS_DIR);
        assert_eq!(v, "data/words");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret").expect("valid");
        assert_eq!(format!("{key:?}"), "ApiKey(**redacted**)");
    }
}
