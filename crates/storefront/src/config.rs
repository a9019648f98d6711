//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy).
//!   Optional only when `DEBUG_MODE=true`, in which case a fixed development
//!   secret is used.
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: `http://{host}:{port}`)
//! - `PRODUCTS_DATABASE_URL` - Product store (default: `sqlite://products.db`)
//! - `CARTS_DATABASE_URL` - Cart store (default: `sqlite://carts.db`)
//! - `ACCOUNTS_DATABASE_URL` - Account store (default: `sqlite://accounts.db`)
//! - `TOKEN_TTL_HOURS` - Auth token lifetime (default: 24)
//! - `DEBUG_MODE` - `true` relaxes secret checks and exposes error detail
//! - `STOREFRONT_STATIC_DIR` - Static asset directory
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
const MIN_SECRET_BITS_PER_CHAR: f64 = 3.3;

/// Signing secret used when `DEBUG_MODE=true` and `JWT_SECRET` is unset.
const DEBUG_JWT_SECRET: &str = "corner-store-debug-only-signing-key";

/// Fragments that show up in copied `.env` templates, matched case-insensitively.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "changeme",
    "placeholder",
    "example",
    "secret",
    "password",
    "your-",
    "xxx",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Connection URLs for the three `SQLite` stores
    pub databases: DatabaseUrls,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Auth token lifetime in hours
    pub token_ttl_hours: i64,
    /// Debug flag
    pub debug: bool,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// `SQLite` connection URLs, one file per store.
#[derive(Debug, Clone)]
pub struct DatabaseUrls {
    pub products: String,
    pub carts: String,
    pub accounts: String,
}

impl Default for DatabaseUrls {
    fn default() -> Self {
        Self {
            products: "sqlite://products.db".to_string(),
            carts: "sqlite://carts.db".to_string(),
            accounts: "sqlite://accounts.db".to_string(),
        }
    }
}

impl DatabaseUrls {
    /// Load database URLs from environment, falling back to local files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            products: get_env_or_default("PRODUCTS_DATABASE_URL", &defaults.products),
            carts: get_env_or_default("CARTS_DATABASE_URL", &defaults.carts),
            accounts: get_env_or_default("ACCOUNTS_DATABASE_URL", &defaults.accounts),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the signing secret fails validation (outside debug mode).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let debug = parse_bool(&get_env_or_default("DEBUG_MODE", "false"));

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_optional_env("STOREFRONT_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"));

        let jwt_secret = load_jwt_secret(debug)?;

        let token_ttl_hours = parse_token_ttl(&get_env_or_default("TOKEN_TTL_HOURS", "24"))?;

        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        Ok(Self {
            host,
            port,
            base_url,
            databases: DatabaseUrls::from_env(),
            jwt_secret,
            token_ttl_hours,
            debug,
            static_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the built-in debug signing secret is in use.
    #[must_use]
    pub fn uses_debug_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEBUG_JWT_SECRET
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Interpret common truthy spellings.
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Parse `TOKEN_TTL_HOURS`: whole hours from 1 to [`MAX_TOKEN_TTL_HOURS`].
fn parse_token_ttl(value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "TOKEN_TTL_HOURS".to_string(),
                format!("must be a whole number of hours from 1 to {MAX_TOKEN_TTL_HOURS}"),
            )
        })
}

/// Load `JWT_SECRET`, checking its strength unless running in debug mode.
fn load_jwt_secret(debug: bool) -> Result<SecretString, ConfigError> {
    match get_optional_env("JWT_SECRET") {
        Some(value) => {
            let secret = SecretString::from(value);
            if !debug {
                check_signing_secret(secret.expose_secret()).map_err(|reason| {
                    ConfigError::InsecureSecret("JWT_SECRET".to_string(), reason)
                })?;
            }
            Ok(secret)
        }
        None if debug => Ok(SecretString::from(DEBUG_JWT_SECRET)),
        None => Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string())),
    }
}

/// Reject secrets that are short, templated, or repetitive.
///
/// Anyone holding the secret can mint a token for any username, so a weak
/// one is a startup error rather than a warning.
fn check_signing_secret(value: &str) -> Result<(), String> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(format!(
            "must be at least {MIN_SECRET_LENGTH} characters (got {})",
            value.len()
        ));
    }

    let lower = value.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(*f)) {
        return Err(format!("looks like a placeholder (contains '{fragment}')"));
    }

    let bits = bits_per_char(value);
    if bits < MIN_SECRET_BITS_PER_CHAR {
        return Err(format!(
            "too repetitive ({bits:.2} bits/char, need {MIN_SECRET_BITS_PER_CHAR:.1}); generate it randomly"
        ));
    }

    Ok(())
}

/// Shannon entropy of the character distribution.
#[allow(clippy::cast_precision_loss)]
fn bits_per_char(value: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in value.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total = value.chars().count() as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: base_url.to_string(),
            databases: DatabaseUrls::default(),
            jwt_secret: SecretString::from("x".repeat(32)),
            token_ttl_hours: 24,
            debug: false,
            static_dir: PathBuf::from("static"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_bits_per_char() {
        assert!(bits_per_char("aaaaaaa").abs() < f64::EPSILON);
        assert!((bits_per_char("abab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_signing_secret_checks() {
        assert!(check_signing_secret("short").is_err());
        assert!(check_signing_secret(&"a".repeat(40)).is_err());
        assert!(check_signing_secret("changeme-changeme-changeme-changeme").is_err());
        // A bare word is rejected regardless of length checks.
        assert!(check_signing_secret("secret").is_err());
        assert!(check_signing_secret("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6_").is_ok());
    }

    #[test]
    fn test_token_ttl_bounds() {
        assert_eq!(parse_token_ttl("24").unwrap(), 24);
        assert_eq!(parse_token_ttl("8760").unwrap(), 8760);
        assert!(parse_token_ttl("0").is_err());
        assert!(parse_token_ttl("-5").is_err());
        assert!(parse_token_ttl("8761").is_err());
        assert!(parse_token_ttl("3000000000").is_err());
        assert!(parse_token_ttl("soon").is_err());
    }

    #[test]
    fn test_uses_debug_secret() {
        let mut config = test_config("http://localhost");
        assert!(!config.uses_debug_secret());
        config.jwt_secret = SecretString::from(DEBUG_JWT_SECRET);
        assert!(config.uses_debug_secret());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config("http://localhost:5000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        assert!(!test_config("http://localhost:5000").secure_cookies());
        assert!(test_config("https://shop.example").secure_cookies());
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let mut config = test_config("http://localhost");
        config.jwt_secret = SecretString::from("super_secret_signing_value_1234567");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_signing_value_1234567"));
    }
}
