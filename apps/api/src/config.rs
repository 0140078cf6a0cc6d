use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Quiet period before a session rescore runs.
    pub score_debounce_ms: u64,
    /// Idle scoring sessions are dropped after this many seconds.
    pub session_ttl_secs: u64,
    /// Upper bound on any single text field accepted by the API.
    pub max_text_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            score_debounce_ms: 500,
            session_ttl_secs: 1800,
            max_text_bytes: 200_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            score_debounce_ms: parse_env("SCORE_DEBOUNCE_MS", defaults.score_debounce_ms)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            max_text_bytes: parse_env("MAX_TEXT_BYTES", defaults.max_text_bytes)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("TAILOR_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TAILOR_TEST_BAD_NUMBER", "five hundred");
        let result: Result<u64> = parse_env("TAILOR_TEST_BAD_NUMBER", 500);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("TAILOR_TEST_GOOD_NUMBER", " 250 ");
        let value: u64 = parse_env("TAILOR_TEST_GOOD_NUMBER", 500).unwrap();
        assert_eq!(value, 250);
    }
}
