//! Relay configuration.

use crate::runtime::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api.casinoscores.com/svc-evolution-game-events/api/xxxtremelightningroulette/latest";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// What to do when the upstream declares JSON but the body does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidJsonPolicy {
    /// Fail the request with `502 Bad Gateway`.
    #[default]
    Fail,
    /// Relay the raw body as received.
    PassThrough,
}

impl FromStr for InvalidJsonPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(InvalidJsonPolicy::Fail),
            "passthrough" | "pass-through" => Ok(InvalidJsonPolicy::PassThrough),
            other => Err(format!("expected `fail` or `passthrough`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Fetched with GET on every request.
    pub upstream_url: String,
    /// Sent as `User-Agent` on the outbound request.
    pub user_agent: String,
    pub invalid_json: InvalidJsonPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            invalid_json: InvalidJsonPolicy::default(),
        }
    }
}

impl RelayConfig {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            ..Self::default()
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn invalid_json(mut self, policy: InvalidJsonPolicy) -> Self {
        self.invalid_json = policy;
        self
    }

    /// Read `RELAY_UPSTREAM_URL`, `RELAY_USER_AGENT` and `RELAY_INVALID_JSON`
    /// from the process environment, keeping defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("RELAY_UPSTREAM_URL") {
            config.upstream_url = url;
        }
        if let Some(user_agent) = lookup("RELAY_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(policy) = crate::runtime::parse_var(&lookup, "RELAY_INVALID_JSON")? {
            config.invalid_json = policy;
        }
        config.validate()?;
        Ok(config)
    }

    /// The upstream must be an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.upstream_url)
            .map(|_| ())
            .map_err(|source| ConfigError::InvalidUrl {
                value: self.upstream_url.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_roulette_feed() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.invalid_json, InvalidJsonPolicy::Fail);
    }

    #[test]
    fn reads_overrides() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("RELAY_UPSTREAM_URL", "http://127.0.0.1:9000/latest"),
            ("RELAY_USER_AGENT", "fitrelay/0.1"),
            ("RELAY_INVALID_JSON", "PassThrough"),
        ]))
        .unwrap();

        assert_eq!(config.upstream_url, "http://127.0.0.1:9000/latest");
        assert_eq!(config.user_agent, "fitrelay/0.1");
        assert_eq!(config.invalid_json, InvalidJsonPolicy::PassThrough);
    }

    #[test]
    fn rejects_relative_url() {
        let err = RelayConfig::from_lookup(lookup(&[("RELAY_UPSTREAM_URL", "/latest")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = RelayConfig::from_lookup(lookup(&[("RELAY_INVALID_JSON", "ignore")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn policy_deserializes_lowercase() {
        let policy: InvalidJsonPolicy = serde_json::from_str("\"passthrough\"").unwrap();
        assert_eq!(policy, InvalidJsonPolicy::PassThrough);
    }
}
