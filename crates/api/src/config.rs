use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Service settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the default groups and categories into the empty store.
    pub seed: bool,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_addr = lookup("HUDDLE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("HUDDLE_BIND_ADDR is not a socket address: `{raw_addr}`"))?;

        let seed = match lookup("HUDDLE_SEED") {
            None => true,
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("HUDDLE_SEED must be true or false, got `{raw}`"))?,
        };

        Ok(Self { bind_addr, seed })
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.seed);
    }

    #[test]
    fn seed_can_be_disabled() {
        let config = ApiConfig::from_lookup(|key| (key == "HUDDLE_SEED").then(|| "false".into())).unwrap();
        assert!(!config.seed);
    }

    #[test]
    fn bad_bind_addr_is_rejected() {
        let err = ApiConfig::from_lookup(|key| (key == "HUDDLE_BIND_ADDR").then(|| "nope".into()))
            .unwrap_err();
        assert!(err.to_string().contains("HUDDLE_BIND_ADDR"));
    }
}
