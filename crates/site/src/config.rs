//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WHEELS_ADMIN_USERNAME` - Username for the seeded admin account
//! - `WHEELS_ADMIN_PASSWORD` - Password for the seeded admin account
//!   (validated against placeholder patterns and low entropy)
//!
//! ## Optional
//! - `WHEELS_HOST` - Bind address (default: 127.0.0.1)
//! - `WHEELS_PORT` - Listen port (default: 3000)
//! - `WHEELS_BASE_URL` - Public URL for the site (default: <http://localhost:3000>)
//! - `WHEELS_API_BASE_URL` - Base URL of the remote Wheels REST API
//!   (default: <https://wheels-api-r0ea.onrender.com>)
//! - `WHEELS_DATA_DIR` - Directory for the local user roster (default: ./data)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive).
///
/// The admin credential used to live in source; now that it arrives via the
/// environment, refuse to boot with an obvious stand-in value.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "senha",
    "admin123",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Base URL of the remote Wheels REST API
    pub api_base_url: String,
    /// Directory holding the local key-value store files
    pub data_dir: PathBuf,
    /// Seeded admin credential
    pub admin: AdminSeedConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Seeded admin account configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminSeedConfig {
    /// Admin login username
    pub username: String,
    /// Admin login password
    pub password: SecretString,
}

impl std::fmt::Debug for AdminSeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeedConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the admin password fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WHEELS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WHEELS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WHEELS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WHEELS_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("WHEELS_BASE_URL", "http://localhost:3000");
        let api_base_url = get_env_or_default(
            "WHEELS_API_BASE_URL",
            "https://wheels-api-r0ea.onrender.com",
        );
        let data_dir = PathBuf::from(get_env_or_default("WHEELS_DATA_DIR", "./data"));

        let admin = AdminSeedConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            api_base_url,
            data_dir,
            admin,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminSeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = get_required_env("WHEELS_ADMIN_USERNAME")?;
        let password = get_required_env("WHEELS_ADMIN_PASSWORD")?;
        validate_admin_password(&password, "WHEELS_ADMIN_PASSWORD")?;

        Ok(Self {
            username,
            password: SecretString::from(password),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that the admin password is not a placeholder and is not trivially
/// guessable.
fn validate_admin_password(password: &str, var_name: &str) -> Result<(), ConfigError> {
    if password.len() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_PASSWORD_LENGTH,
                password.len()
            ),
        ));
    }

    let lower = password.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(password);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated password."
            ),
        ));
    }

    Ok(())
}

/// Expose the admin password for seeding the auth service.
///
/// Lives here so `secrecy` usage stays contained in the config layer.
#[must_use]
pub fn expose_admin_password(admin: &AdminSeedConfig) -> &str {
    admin.password.expose_secret()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_admin_password_placeholder() {
        let result = validate_admin_password("your-admin-password-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_admin_password_legacy_default_rejected() {
        // The credential that used to be hardcoded must never boot
        let result = validate_admin_password("admin123admin123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_admin_password_too_short() {
        assert!(validate_admin_password("aB3$xY9!", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_admin_password_low_entropy() {
        let result = validate_admin_password("aaaabbbbaaaabbbb", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_admin_password_valid() {
        assert!(validate_admin_password("aB3$xY9!mK2@nL5#", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = SiteConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api_base_url: "https://wheels-api-r0ea.onrender.com".to_string(),
            data_dir: PathBuf::from("./data"),
            admin: AdminSeedConfig {
                username: "admin".to_string(),
                password: SecretString::from("aB3$xY9!mK2@nL5#"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_admin_config_debug_redacts_password() {
        let admin = AdminSeedConfig {
            username: "admin".to_string(),
            password: SecretString::from("super_secret_admin_pw"),
        };

        let debug_output = format!("{admin:?}");
        assert!(debug_output.contains("admin"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_admin_pw"));
    }
}
