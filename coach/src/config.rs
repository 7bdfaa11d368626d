//! Configuration for the coach.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable. Command-line flags in the binary
//! take precedence over both.

use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the analysis backend.
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default directory for rolling log files.
const DEFAULT_LOG_DIR: &str = "logs";

/// Default per-request timeout (in seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of games requested for review.
const DEFAULT_GAMES_LIMIT: usize = 20;

/// Get the analysis backend base URL.
///
/// Priority:
/// 1. `COACH_API_URL` env variable if set
/// 2. `http://127.0.0.1:8000` as fallback
pub fn get_api_url() -> String {
    if let Ok(url) = std::env::var("COACH_API_URL") {
        return url;
    }

    DEFAULT_API_URL.to_string()
}

/// Get the username whose moves are analysed.
///
/// Read from `COACH_USERNAME`; unset or blank means no username.
pub fn get_username() -> Option<String> {
    std::env::var("COACH_USERNAME")
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Get the directory for log files.
///
/// Priority:
/// 1. `COACH_LOG_DIR` env variable if set
/// 2. `logs` as fallback
pub fn get_log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COACH_LOG_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Get the request timeout in seconds.
///
/// Priority:
/// 1. `COACH_TIMEOUT_SECS` env variable if set (falls back to default if
///    the value cannot be parsed as a `u64`)
/// 2. `30` seconds as fallback
pub fn get_timeout_secs() -> u64 {
    if let Ok(timeout) = std::env::var("COACH_TIMEOUT_SECS") {
        return timeout.parse().unwrap_or(DEFAULT_TIMEOUT_SECS);
    }

    DEFAULT_TIMEOUT_SECS
}

/// Get how many games to list for review.
///
/// Priority:
/// 1. `COACH_GAMES_LIMIT` env variable if set (falls back to default if
///    the value is not a positive integer)
/// 2. `20` as fallback
pub fn get_games_limit() -> usize {
    if let Ok(limit) = std::env::var("COACH_GAMES_LIMIT") {
        return limit
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_GAMES_LIMIT);
    }

    DEFAULT_GAMES_LIMIT
}

/// All runtime settings in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    pub api_url: String,
    pub username: Option<String>,
    pub log_dir: PathBuf,
    pub timeout: Duration,
    pub games_limit: usize,
}

impl CoachConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: get_api_url(),
            username: get_username(),
            log_dir: get_log_dir(),
            timeout: Duration::from_secs(get_timeout_secs()),
            games_limit: get_games_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_url() {
        let url = get_api_url();
        match std::env::var("COACH_API_URL") {
            Ok(val) => assert_eq!(url, val),
            Err(_) => assert_eq!(url, DEFAULT_API_URL),
        }
    }

    #[test]
    fn test_get_log_dir() {
        let dir = get_log_dir();
        match std::env::var("COACH_LOG_DIR") {
            Ok(val) => assert_eq!(dir, PathBuf::from(val)),
            Err(_) => assert_eq!(dir, PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }

    #[test]
    fn test_get_timeout_secs_default() {
        if std::env::var("COACH_TIMEOUT_SECS").is_err() {
            assert_eq!(get_timeout_secs(), DEFAULT_TIMEOUT_SECS);
        }
    }

    #[test]
    fn test_get_games_limit_default() {
        if std::env::var("COACH_GAMES_LIMIT").is_err() {
            assert_eq!(get_games_limit(), DEFAULT_GAMES_LIMIT);
        }
    }

    #[test]
    fn test_from_env_matches_getters() {
        let config = CoachConfig::from_env();
        assert_eq!(config.api_url, get_api_url());
        assert_eq!(config.username, get_username());
        assert_eq!(config.timeout, Duration::from_secs(get_timeout_secs()));
    }
}
