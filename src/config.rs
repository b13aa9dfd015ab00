//! Environment-driven configuration, read once at startup.
//!
//! The binary loads a `.env` file first via dotenvy, so every variable here
//! can live in that file during development. A missing credential is not
//! fatal: requests may carry their own `apiKey`, and the handler rejects the
//! rest with a client error.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IMGEN_UPSTREAM must be 'gemini' or 'openrouter', got '{0}'")]
    InvalidUpstream(String),

    #[error("IMGEN_ADDR is not a valid socket address: {0}")]
    InvalidAddr(#[from] std::net::AddrParseError),

    #[error("IMGEN_TIMEOUT_SECS is not a number: {0}")]
    InvalidTimeout(#[from] std::num::ParseIntError),
}

/// Which upstream style the gateway relays to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// The Google Generative Language API, one-shot `generateContent` calls.
    Gemini,
    /// The OpenRouter chat-completions relay.
    OpenRouter,
}

impl UpstreamKind {
    /// Environment variable holding the server-side credential for this
    /// upstream.
    pub fn key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl FromStr for UpstreamKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(ConfigError::InvalidUpstream(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamKind,
    /// Server-side credential; requests may still override it with `apiKey`.
    pub api_key: Option<String>,
    /// Base URL override for the selected upstream. Mainly points test
    /// suites at a stub server.
    pub upstream_url: Option<String>,
    pub addr: SocketAddr,
    /// Outbound request timeout. Expiry surfaces like any other transport
    /// failure.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: UpstreamKind::OpenRouter,
            api_key: None,
            upstream_url: None,
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `IMGEN_UPSTREAM` | `openrouter` (alias `google` for `gemini`) |
    /// | `GEMINI_API_KEY` / `OPENROUTER_API_KEY` | unset |
    /// | `IMGEN_UPSTREAM_URL` | provider default |
    /// | `IMGEN_ADDR` | `0.0.0.0:8080` |
    /// | `IMGEN_TIMEOUT_SECS` | `60` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let upstream = match std::env::var("IMGEN_UPSTREAM") {
            Ok(value) => value.parse()?,
            Err(_) => UpstreamKind::OpenRouter,
        };

        let api_key = std::env::var(upstream.key_env()).ok();
        let upstream_url = std::env::var("IMGEN_UPSTREAM_URL").ok();

        let addr = std::env::var("IMGEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()?;

        let timeout = match std::env::var("IMGEN_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(value.parse()?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            upstream,
            api_key,
            upstream_url,
            addr,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_kind_parses_aliases() {
        assert_eq!("gemini".parse::<UpstreamKind>().unwrap(), UpstreamKind::Gemini);
        assert_eq!("google".parse::<UpstreamKind>().unwrap(), UpstreamKind::Gemini);
        assert_eq!(
            "OpenRouter".parse::<UpstreamKind>().unwrap(),
            UpstreamKind::OpenRouter
        );
        assert!("azure".parse::<UpstreamKind>().is_err());
    }

    #[test]
    fn key_env_names_follow_the_upstream() {
        assert_eq!(UpstreamKind::Gemini.key_env(), "GEMINI_API_KEY");
        assert_eq!(UpstreamKind::OpenRouter.key_env(), "OPENROUTER_API_KEY");
    }

    #[test]
    fn default_config_is_openrouter_on_8080() {
        let config = Config::default();
        assert_eq!(config.upstream, UpstreamKind::OpenRouter);
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }
}
