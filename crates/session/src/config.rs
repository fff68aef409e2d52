//! Resolver configuration (environment-driven).

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the [`ResolutionMode`].
pub const RESOLUTION_MODE_VAR: &str = "OUTPOST_RESOLUTION_MODE";

/// How the resolver treats a missing profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Server-rendered surfaces: a missing profile fails resolution.
    #[default]
    Strict,
    /// Client-only surfaces: a missing profile falls back to identity-provider fields.
    Lenient,
}

impl FromStr for ResolutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ConfigError::Invalid {
                key: RESOLUTION_MODE_VAR,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub mode: ResolutionMode,
}

impl ResolverConfig {
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup. Unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(RESOLUTION_MODE_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => ResolutionMode::default(),
        };
        Ok(Self { mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_strict() {
        let config = ResolverConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.mode, ResolutionMode::Strict);
    }

    #[test]
    fn reads_mode_case_insensitively() {
        let config = ResolverConfig::from_lookup(|key| {
            (key == RESOLUTION_MODE_VAR).then(|| " Lenient ".to_string())
        })
        .unwrap();
        assert_eq!(config.mode, ResolutionMode::Lenient);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = ResolverConfig::from_lookup(|_| Some("relaxed".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: RESOLUTION_MODE_VAR,
                value: "relaxed".to_string()
            }
        );
    }
}
