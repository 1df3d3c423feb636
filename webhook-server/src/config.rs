//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables. A `.env` file in the
//! working directory is loaded first when present.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::web::SignatureEncoding;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
pub const DEFAULT_SIGNATURE_HEADER: &str = "X-Signature";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared HMAC secret for webhook verification
    pub webhook_secret: Option<String>,

    /// Route the webhook endpoint is mounted on
    pub webhook_path: String,

    /// Header carrying the webhook signature
    pub signature_header: String,

    /// Transport encoding of the signature header
    pub signature_encoding: SignatureEncoding,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    /// Time in-flight requests get to finish after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", DEFAULT_PORT),

            webhook_secret: env::var("WEBHOOK_SECRET").ok(),

            webhook_path: parse_webhook_path("WEBHOOK_PATH"),

            signature_header: env::var("SIGNATURE_HEADER")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_SIGNATURE_HEADER.to_string()),

            signature_encoding: parse_or("SIGNATURE_ENCODING", SignatureEncoding::Hex),

            max_body_bytes: parse_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),

            shutdown_timeout: Duration::from_secs(parse_or(
                "SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            )),
        }
    }

    /// Load a `.env` file (if any) and then read the environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "dotenv_load_failed"),
        }
        Self::from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            webhook_secret: None,
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
            signature_encoding: SignatureEncoding::Hex,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("webhook_secret_set", &self.webhook_secret.is_some())
            .field("webhook_path", &self.webhook_path)
            .field("signature_header", &self.signature_header)
            .field("signature_encoding", &self.signature_encoding)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid.
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Read the webhook route, falling back to the default when unset or unusable.
///
/// Route parameters (`:name`) and wildcards (`*rest`) are rejected: the
/// webhook lives on one fixed path.
fn parse_webhook_path(name: &str) -> String {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return DEFAULT_WEBHOOK_PATH.to_string(),
    };

    let path = normalize_path(&raw);
    if path.contains([':', '*']) {
        warn!(env_var = name, value = %raw, "Invalid route path, using default");
        return DEFAULT_WEBHOOK_PATH.to_string();
    }

    path
}

/// Ensure a route path starts with exactly one `/`.
fn normalize_path(raw: &str) -> String {
    format!("/{}", raw.trim().trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_valid() {
        env::set_var("HOOKIFY_TEST_PORT", "9090");
        let result: u16 = parse_or("HOOKIFY_TEST_PORT", 8080);
        assert_eq!(result, 9090);
        env::remove_var("HOOKIFY_TEST_PORT");
    }

    #[test]
    fn test_parse_or_invalid_falls_back() {
        env::set_var("HOOKIFY_TEST_BODY", "lots");
        let result: usize = parse_or("HOOKIFY_TEST_BODY", 42);
        assert_eq!(result, 42);
        env::remove_var("HOOKIFY_TEST_BODY");
    }

    #[test]
    fn test_parse_or_default() {
        let result: u64 = parse_or("HOOKIFY_NONEXISTENT_VAR", 5);
        assert_eq!(result, 5);
    }

    #[test]
    fn test_parse_or_encoding() {
        env::set_var("HOOKIFY_TEST_ENCODING", "BASE64");
        let result = parse_or("HOOKIFY_TEST_ENCODING", SignatureEncoding::Hex);
        assert_eq!(result, SignatureEncoding::Base64);

        env::set_var("HOOKIFY_TEST_ENCODING", "morse");
        let result = parse_or("HOOKIFY_TEST_ENCODING", SignatureEncoding::Hex);
        assert_eq!(result, SignatureEncoding::Hex);
        env::remove_var("HOOKIFY_TEST_ENCODING");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("webhook"), "/webhook");
        assert_eq!(normalize_path("/hooks/apple"), "/hooks/apple");
        assert_eq!(normalize_path("//double"), "/double");
    }

    #[test]
    fn test_parse_webhook_path() {
        env::set_var("HOOKIFY_TEST_PATH", "hooks/apple");
        assert_eq!(parse_webhook_path("HOOKIFY_TEST_PATH"), "/hooks/apple");
        env::remove_var("HOOKIFY_TEST_PATH");

        assert_eq!(parse_webhook_path("HOOKIFY_TEST_PATH"), DEFAULT_WEBHOOK_PATH);
    }

    #[test]
    fn test_parse_webhook_path_rejects_route_syntax() {
        for raw in ["/hooks/:", "/hooks/:id", "/*", "/hooks/*rest"] {
            env::set_var("HOOKIFY_TEST_ROUTE_SYNTAX", raw);
            assert_eq!(
                parse_webhook_path("HOOKIFY_TEST_ROUTE_SYNTAX"),
                DEFAULT_WEBHOOK_PATH,
                "{raw} was accepted"
            );
        }
        env::remove_var("HOOKIFY_TEST_ROUTE_SYNTAX");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.webhook_path, "/webhook");
        assert_eq!(config.signature_header, "X-Signature");
        assert_eq!(config.signature_encoding, SignatureEncoding::Hex);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config {
            webhook_secret: Some("hunter2".to_string()),
            ..Config::default()
        };

        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("webhook_secret_set: true"));
    }
}
