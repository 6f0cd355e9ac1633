//! Runner configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! None of it reaches discount-core; it only controls where the runner reads
//! from, how it writes, and how loudly it logs.

use std::env;
use std::path::PathBuf;

/// Environment variable naming an input file (default: stdin).
pub const ENV_INPUT: &str = "DISCOUNT_FUNCTION_INPUT";

/// Environment variable enabling pretty-printed output.
pub const ENV_PRETTY: &str = "DISCOUNT_FUNCTION_PRETTY";

/// Environment variable with the log filter used when `RUST_LOG` is unset.
pub const ENV_LOG: &str = "DISCOUNT_FUNCTION_LOG";

/// Default log filter. Quiet: the runner is invoked once per cart evaluation.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Read input from this file instead of stdin.
    pub input_path: Option<PathBuf>,

    /// Pretty-print the output JSON.
    pub pretty: bool,

    /// Fallback `EnvFilter` directive.
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            input_path: None,
            pretty: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input_path = lookup(ENV_INPUT)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let pretty = match lookup(ENV_PRETTY) {
            None => false,
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue(ENV_PRETTY.to_string()))?,
        };

        let log_filter = lookup(ENV_LOG)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(RunnerConfig {
            input_path,
            pretty,
            log_filter,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn test_values_from_env() {
        let config = RunnerConfig::from_lookup(lookup(&[
            (ENV_INPUT, "/tmp/input.json"),
            (ENV_PRETTY, "TRUE"),
            (ENV_LOG, "discount_core=debug"),
        ]))
        .unwrap();

        assert_eq!(config.input_path, Some(PathBuf::from("/tmp/input.json")));
        assert!(config.pretty);
        assert_eq!(config.log_filter, "discount_core=debug");
    }

    #[test]
    fn test_invalid_pretty_flag() {
        let err = RunnerConfig::from_lookup(lookup(&[(ENV_PRETTY, "maybe")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DISCOUNT_FUNCTION_PRETTY");
    }
}
