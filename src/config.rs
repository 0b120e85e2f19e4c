use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::gate::GatePaths;

#[derive(Clone)]
pub struct Config {
    // External API
    pub api_url: String,
    pub api_key: String,
    pub api_timeout_secs: u64,

    // Server
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,

    // Gate
    pub login_path: String,
    pub user_prefix: String,
    pub admin_prefix: String,

    // Session cookies
    pub user_session_ttl_secs: u64,
    pub admin_session_ttl_secs: u64,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("login_path", &self.login_path)
            .field("user_prefix", &self.user_prefix)
            .field("admin_prefix", &self.admin_prefix)
            .field("user_session_ttl_secs", &self.user_session_ttl_secs)
            .field("admin_session_ttl_secs", &self.admin_session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env is optional; production sets variables directly
        let _ = dotenvy::dotenv();

        let api_url =
            env::var("API_URL").map_err(|_| ConfigError::MissingVar("API_URL".to_string()))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "API_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }
        let api_url = api_url.trim_end_matches('/').to_string();

        let api_key = env::var("API_KEY").unwrap_or_default();
        let api_timeout_secs = parse_env_or_default("API_TIMEOUT_SECS", 10)?;
        if api_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));

        let login_path = path_var("LOGIN_PATH", "/login")?;
        let user_prefix = prefix_var("USER_PREFIX", "/dashboard")?;
        let admin_prefix = prefix_var("ADMIN_PREFIX", "/admin")?;

        let user_session_ttl_secs = parse_env_or_default("USER_SESSION_TTL_SECS", 604_800)?;
        let admin_session_ttl_secs = parse_env_or_default("ADMIN_SESSION_TTL_SECS", 86_400)?;
        let cookie_secure = parse_env_or_default("COOKIE_SECURE", false)?;

        Ok(Config {
            api_url,
            api_key,
            api_timeout_secs,
            bind_addr,
            static_dir,
            login_path,
            user_prefix,
            admin_prefix,
            user_session_ttl_secs,
            admin_session_ttl_secs,
            cookie_secure,
        })
    }

    pub fn gate_paths(&self) -> GatePaths {
        GatePaths {
            user_prefix: self.user_prefix.clone(),
            admin_prefix: self.admin_prefix.clone(),
        }
    }
}

/// Absolute path variable.
fn path_var(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    if !value.starts_with('/') {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must start with '/'".to_string(),
        ));
    }
    Ok(value)
}

/// Protected prefix variable: absolute, no trailing slash.
fn prefix_var(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = path_var(key, default)?;
    if value.len() < 2 || value.ends_with('/') {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must name a path segment and not end with '/'".to_string(),
        ));
    }
    Ok(value)
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests mutate process-wide env vars; run them one at a time.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    const VARS: &[&str] = &[
        "API_URL",
        "API_KEY",
        "API_TIMEOUT_SECS",
        "BIND_ADDR",
        "STATIC_DIR",
        "LOGIN_PATH",
        "USER_PREFIX",
        "ADMIN_PREFIX",
        "USER_SESSION_TTL_SECS",
        "ADMIN_SESSION_TTL_SECS",
        "COOKIE_SECURE",
    ];

    fn set(key: &str, value: &str) {
        env::set_var(key, value);
    }

    fn clear_test_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    /// Pin every variable so a stray `.env` cannot change the outcome.
    fn set_baseline() {
        clear_test_env();
        set("API_URL", "https://api.example.com/");
        set("API_KEY", "");
        set("API_TIMEOUT_SECS", "10");
        set("BIND_ADDR", "0.0.0.0:3000");
        set("STATIC_DIR", "static");
        set("LOGIN_PATH", "/login");
        set("USER_PREFIX", "/dashboard");
        set("ADMIN_PREFIX", "/admin");
        set("USER_SESSION_TTL_SECS", "604800");
        set("ADMIN_SESSION_TTL_SECS", "86400");
        set("COOKIE_SECURE", "false");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        set("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_config_values() {
        let _guard = lock_test();
        set_baseline();

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.api_key, "");
        assert_eq!(config.api_timeout_secs, 10);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.gate_paths(), GatePaths::default());
        assert_eq!(config.user_session_ttl_secs, 604_800);
        assert_eq!(config.admin_session_ttl_secs, 86_400);
        assert!(!config.cookie_secure);

        clear_test_env();
    }

    #[test]
    fn test_invalid_api_url_scheme() {
        let _guard = lock_test();
        set_baseline();
        set("API_URL", "ftp://api.example.com");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "API_URL"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        set_baseline();
        set("BIND_ADDR", "invalid_address");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "BIND_ADDR"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_cookie_secure() {
        let _guard = lock_test();
        set_baseline();
        set("COOKIE_SECURE", "yes");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "COOKIE_SECURE"
        ));

        clear_test_env();
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let _guard = lock_test();
        set_baseline();
        set("API_TIMEOUT_SECS", "0");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "API_TIMEOUT_SECS"
        ));

        clear_test_env();
    }

    #[test]
    fn test_prefix_validation() {
        let _guard = lock_test();
        set_baseline();

        set("ADMIN_PREFIX", "admin");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "ADMIN_PREFIX"
        ));

        set("ADMIN_PREFIX", "/admin/");
        assert!(Config::from_env().is_err());

        set("ADMIN_PREFIX", "/");
        assert!(Config::from_env().is_err());

        set("ADMIN_PREFIX", "/console");
        set("USER_PREFIX", "/app");
        let config = Config::from_env().unwrap();
        assert_eq!(config.gate_paths().admin_prefix, "/console");
        assert_eq!(config.gate_paths().user_prefix, "/app");

        clear_test_env();
    }

    #[test]
    fn test_login_path_must_be_absolute() {
        let _guard = lock_test();
        set_baseline();
        set("LOGIN_PATH", "login");

        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "LOGIN_PATH"
        ));

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let _guard = lock_test();
        set_baseline();
        set("API_KEY", "super-secret-key");

        let config = Config::from_env().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));

        clear_test_env();
    }
}
