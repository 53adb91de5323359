//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NAMEPORT_API_KEY` - Partner API key attached to every registrar request
//! - `NAMEPORT_APP_DOMAIN` - Origin domain placed in the sign-in challenge
//! - `NAMEPORT_APP_URI` - Origin URI placed in the sign-in challenge
//!
//! ## Optional
//! - `NAMEPORT_API_BASE_URL` - Registrar API base (default: the public API)
//! - `NAMEPORT_DEFAULT_NETWORK` - Network preselected for resolution (default: CORE)

use std::collections::HashMap;

use secrecy::SecretString;
use thiserror::Error;

use nameport_core::Network;

/// Public registrar API base used when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api-public.d3.app/v1";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Nameport client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct NameportConfig {
    /// Registrar API base URL (no trailing slash)
    pub api_base_url: String,
    /// Partner API key sent on every registrar request
    pub api_key: SecretString,
    /// Origin domain for the sign-in challenge (e.g. app.nameport.id)
    pub app_domain: String,
    /// Origin URI for the sign-in challenge (e.g. <https://app.nameport.id>)
    pub app_uri: String,
    /// Network preselected for resolution and sign-in chain id
    pub default_network: Network,
}

impl std::fmt::Debug for NameportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameportConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[REDACTED]")
            .field("app_domain", &self.app_domain)
            .field("app_uri", &self.app_uri)
            .field("default_network", &self.default_network)
            .finish()
    }
}

impl NameportConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("NAMEPORT_API_BASE_URL", DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        let api_key = get_validated_secret("NAMEPORT_API_KEY")?;
        let app_domain = get_required_env("NAMEPORT_APP_DOMAIN")?;
        let app_uri = get_valid_url("NAMEPORT_APP_URI")?;
        let default_network = get_env_or_default("NAMEPORT_DEFAULT_NETWORK", "CORE")
            .parse::<Network>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("NAMEPORT_DEFAULT_NETWORK".to_owned(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            api_key,
            app_domain,
            app_uri,
            default_network,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a required environment variable that must parse as an absolute URL.
fn get_valid_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    validate_url(&value, key)?;
    Ok(value)
}

fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_owned(), e.to_string()))?;
    Ok(())
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

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the registrar."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> NameportConfig {
        NameportConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
            app_domain: "app.nameport.id".to_owned(),
            app_uri: "https://app.nameport.id".to_owned(),
            default_network: Network::Core,
        }
    }

    #[test]
    fn test_shannon_entropy_degenerate_inputs() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_url_rejects_relative_values() {
        assert!(validate_url("https://app.nameport.id", "TEST_VAR").is_ok());
        assert!(matches!(
            validate_url("app.nameport.id/path", "TEST_VAR").unwrap_err(),
            ConfigError::InvalidEnvVar(_, _)
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("app.nameport.id"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("aB3$xY9"));
    }
}
