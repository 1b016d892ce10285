//! SDK configuration: credentials, environment, endpoint and per-network
//! settings. Built in code, from a JSON file, or from `PEERADS_*` variables.

use crate::error::{PeerAdsError, Result};
use peerads_adapter::{key_fingerprint, NetworkConfig, Reward};
use peerads_runtime::RewardPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.peerads.io/api/v1";
pub const DEFAULT_PLATFORM: &str = "ios";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = PeerAdsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(PeerAdsError::Config(format!("unknown environment: {other}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewarded-ad defaults handed to every rewarded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardedConfig {
    pub duration_secs: u64,
    pub default_reward_type: String,
    pub default_reward_amount: u32,
}

impl Default for RewardedConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            default_reward_type: "coins".into(),
            default_reward_amount: 10,
        }
    }
}

impl RewardedConfig {
    pub fn policy(&self) -> RewardPolicy {
        RewardPolicy {
            watch_duration: Duration::from_secs(self.duration_secs),
            default_reward: Reward::new(
                self.default_reward_type.clone(),
                self.default_reward_amount,
            ),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_key: String,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub test_api_key: Option<String>,
    #[serde(default)]
    pub test_secret_key: Option<String>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Passed through to network adapters; the SDK itself does not branch on it.
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub rewarded: RewardedConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: None,
            test_api_key: None,
            test_secret_key: None,
            environment: Environment::Production,
            api_url: default_api_url(),
            platform: default_platform(),
            test_mode: false,
            networks: BTreeMap::new(),
            rewarded: RewardedConfig::default(),
        }
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_test_keys(
        mut self,
        api_key: impl Into<String>,
        secret_key: Option<String>,
    ) -> Self {
        self.test_api_key = Some(api_key.into());
        self.test_secret_key = secret_key;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_network(mut self, name: impl Into<String>, config: NetworkConfig) -> Self {
        self.networks.insert(name.into(), config);
        self
    }

    /// Reads `PEERADS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Config::new(get("PEERADS_API_KEY").unwrap_or_default());
        config.secret_key = get("PEERADS_SECRET_KEY");
        config.test_api_key = get("PEERADS_TEST_API_KEY");
        config.test_secret_key = get("PEERADS_TEST_SECRET_KEY");
        if let Some(env) = get("PEERADS_ENV") {
            config.environment = env.parse()?;
        }
        if let Some(url) = get("PEERADS_API_URL") {
            config.api_url = url;
        }
        if let Some(flag) = get("PEERADS_TEST_MODE") {
            config.test_mode = parse_flag(&flag)?;
        }
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| PeerAdsError::Config(format!("invalid config json: {e}")))
    }

    /// The api key for the selected environment. The test environment has
    /// no fallback to the production key.
    pub fn active_api_key(&self) -> Result<&str> {
        let key = match self.environment {
            Environment::Production => Some(self.api_key.as_str()),
            Environment::Test => self.test_api_key.as_deref(),
        };
        match key {
            Some(k) if !k.is_empty() => Ok(k),
            _ => Err(PeerAdsError::Config(format!(
                "no api key configured for {} environment",
                self.environment
            ))),
        }
    }

    pub fn active_secret_key(&self) -> Option<&str> {
        match self.environment {
            Environment::Production => self.secret_key.as_deref(),
            Environment::Test => self.test_secret_key.as_deref(),
        }
        .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        self.active_api_key()?;
        reqwest::Url::parse(&self.api_url)
            .map_err(|e| PeerAdsError::Config(format!("invalid api url {:?}: {e}", self.api_url)))?;
        if self.platform.trim().is_empty() {
            return Err(PeerAdsError::Config("platform must not be empty".into()));
        }
        Ok(())
    }

    pub fn reward_policy(&self) -> RewardPolicy {
        self.rewarded.policy()
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(PeerAdsError::Config(format!("invalid boolean: {other}"))),
    }
}

fn masked(key: Option<&str>) -> Option<String> {
    key.map(key_fingerprint)
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &key_fingerprint(&self.api_key))
            .field("secret_key", &masked(self.secret_key.as_deref()))
            .field("test_api_key", &masked(self.test_api_key.as_deref()))
            .field("test_secret_key", &masked(self.test_secret_key.as_deref()))
            .field("environment", &self.environment)
            .field("api_url", &self.api_url)
            .field("platform", &self.platform)
            .field("test_mode", &self.test_mode)
            .field("networks", &self.networks.keys().collect::<Vec<_>>())
            .field("rewarded", &self.rewarded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn production_uses_live_keys() {
        let cfg = Config::new("pk_live")
            .with_secret_key("sk_live")
            .with_test_keys("pk_test", Some("sk_test".into()));
        assert_eq!(cfg.active_api_key().unwrap(), "pk_live");
        assert_eq!(cfg.active_secret_key(), Some("sk_live"));
    }

    #[test]
    fn test_environment_uses_test_keys() {
        let cfg = Config::new("pk_live")
            .with_secret_key("sk_live")
            .with_test_keys("pk_test", Some("sk_test".into()))
            .with_environment(Environment::Test);
        assert_eq!(cfg.active_api_key().unwrap(), "pk_test");
        assert_eq!(cfg.active_secret_key(), Some("sk_test"));
    }

    #[test]
    fn test_environment_never_falls_back() {
        let cfg = Config::new("pk_live")
            .with_secret_key("sk_live")
            .with_environment(Environment::Test);
        assert!(matches!(cfg.active_api_key(), Err(PeerAdsError::Config(_))));
        assert_eq!(cfg.active_secret_key(), None);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let cfg = Config::from_lookup(lookup(&[
            ("PEERADS_API_KEY", "pk_live"),
            ("PEERADS_SECRET_KEY", "sk_live"),
            ("PEERADS_TEST_API_KEY", "pk_test"),
            ("PEERADS_ENV", "test"),
            ("PEERADS_API_URL", "http://127.0.0.1:3000/api/v1"),
            ("PEERADS_TEST_MODE", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.environment, Environment::Test);
        assert_eq!(cfg.api_url, "http://127.0.0.1:3000/api/v1");
        assert!(cfg.test_mode);
        assert_eq!(cfg.active_api_key().unwrap(), "pk_test");
        assert_eq!(cfg.active_secret_key(), None);
    }

    #[test]
    fn from_lookup_defaults() {
        let cfg = Config::from_lookup(lookup(&[("PEERADS_API_KEY", "pk")])).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.platform, "ios");
        assert_eq!(cfg.environment, Environment::Production);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unparsable_api_url_fails_validation() {
        assert!(Config::new("pk").with_api_url("not a url").validate().is_err());
        assert!(Config::new("pk").with_api_url("").validate().is_err());
    }

    #[test]
    fn from_lookup_rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("PEERADS_ENV", "staging")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PEERADS_TEST_MODE", "maybe")])).is_err());
    }

    #[test]
    fn json_config_with_networks() {
        let raw = r#"{
            "apiKey": "pk",
            "networks": {"applovin": {"sdkKey": "abc"}},
            "rewarded": {"durationSecs": 15}
        }"#;
        let cfg = Config::from_json(raw).unwrap();
        assert_eq!(cfg.networks["applovin"]["sdkKey"], "abc");
        let policy = cfg.reward_policy();
        assert_eq!(policy.watch_duration, Duration::from_secs(15));
        assert_eq!(policy.default_reward, Reward::new("coins", 10));
    }

    #[test]
    fn debug_hides_credentials() {
        let cfg = Config::new("pk_live_secret").with_secret_key("sk_live_secret");
        let out = format!("{cfg:?}");
        assert!(!out.contains("pk_live_secret"));
        assert!(!out.contains("sk_live_secret"));
        assert!(out.contains("b3:"));
    }
}
