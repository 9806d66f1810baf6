//! Demo daemon configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use gridboard_core::roles::Role;

/// Default per-request timeout against the remote store, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default cache directory for the local fallback store.
const DEFAULT_CACHE_DIR: &str = ".gridboard-cache";

/// Errors loading the daemon configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("GRIDBOARD_USER_ROLE must be student, teacher, or admin: {0}")]
    InvalidRole(String),
}

/// Configuration for the demo daemon binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote widget store API.
    pub api_url: String,
    /// The user to load the dashboard for.
    pub user_id: String,
    /// The user's role (drives demo provisioning).
    pub role: Role,
    /// Directory holding the local fallback blobs.
    pub cache_dir: PathBuf,
    /// Per-request timeout against the remote store.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default             |
    /// |--------------------------|----------|---------------------|
    /// | `GRIDBOARD_API_URL`      | yes      | --                  |
    /// | `GRIDBOARD_USER_ID`      | yes      | --                  |
    /// | `GRIDBOARD_USER_ROLE`    | no       | `student`           |
    /// | `GRIDBOARD_CACHE_DIR`    | no       | `.gridboard-cache`  |
    /// | `GRIDBOARD_TIMEOUT_SECS` | no       | `10`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("GRIDBOARD_API_URL")
            .map_err(|_| ConfigError::MissingVar("GRIDBOARD_API_URL"))?;

        let user_id = std::env::var("GRIDBOARD_USER_ID")
            .map_err(|_| ConfigError::MissingVar("GRIDBOARD_USER_ID"))?;

        let role: Role = std::env::var("GRIDBOARD_USER_ROLE")
            .unwrap_or_else(|_| "student".into())
            .parse()
            .map_err(ConfigError::InvalidRole)?;

        let cache_dir: PathBuf = std::env::var("GRIDBOARD_CACHE_DIR")
            .unwrap_or_else(|_| DEFAULT_CACHE_DIR.into())
            .into();

        let timeout_secs: u64 = std::env::var("GRIDBOARD_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            user_id,
            role,
            cache_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutations are process-wide, so all assertions share one test.
    #[test]
    fn from_env_validates_and_defaults() {
        std::env::remove_var("GRIDBOARD_API_URL");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar("GRIDBOARD_API_URL"))
        ));

        std::env::set_var("GRIDBOARD_API_URL", "http://localhost:3000");
        std::env::remove_var("GRIDBOARD_USER_ID");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar("GRIDBOARD_USER_ID"))
        ));

        std::env::set_var("GRIDBOARD_USER_ID", "u-1");
        std::env::set_var("GRIDBOARD_USER_ROLE", "principal");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidRole(_))
        ));

        std::env::set_var("GRIDBOARD_USER_ROLE", "teacher");
        let config = Config::from_env().expect("config should load");
        assert_eq!(config.role, Role::Teacher);
        assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(
            config.request_timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }
}
