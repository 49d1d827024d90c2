use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

/// Built-in secret for local development. `main` warns loudly when the
/// service starts with it.
pub const DEV_TOKEN_SECRET: &str = "authgate-dev-secret";

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub token_secret: String,
    pub token_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub enforce_sessions: bool,
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize)]
struct AuthGateConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    token_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    bcrypt_cost: Option<u32>,
    enforce_sessions: Option<bool>,
    seed_demo_data: Option<bool>,
}

impl AuthGateConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("AUTHGATE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse AUTHGATE_BIND")?;
        let metrics_bind = std::env::var("AUTHGATE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse AUTHGATE_METRICS_BIND")?;
        let token_secret =
            std::env::var("AUTHGATE_TOKEN_SECRET").unwrap_or_else(|_| DEV_TOKEN_SECRET.to_string());
        let token_ttl_secs = std::env::var("AUTHGATE_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .with_context(|| "parse AUTHGATE_TOKEN_TTL_SECS")?;
        let bcrypt_cost = std::env::var("AUTHGATE_BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse()
            .with_context(|| "parse AUTHGATE_BCRYPT_COST")?;
        let enforce_sessions = parse_bool_env("AUTHGATE_ENFORCE_SESSIONS")?;
        let seed_demo_data = parse_bool_env("AUTHGATE_SEED_DEMO_DATA")?;
        Ok(Self {
            bind_addr,
            metrics_bind,
            token_secret,
            token_ttl_secs,
            bcrypt_cost,
            enforce_sessions,
            seed_demo_data,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("AUTHGATE_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read AUTHGATE_CONFIG: {path}"))?;
            let override_cfg: AuthGateConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse authgate config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.token_secret {
                config.token_secret = value;
            }
            if let Some(value) = override_cfg.token_ttl_secs {
                config.token_ttl_secs = value;
            }
            if let Some(value) = override_cfg.bcrypt_cost {
                config.bcrypt_cost = value;
            }
            if let Some(value) = override_cfg.enforce_sessions {
                config.enforce_sessions = value;
            }
            if let Some(value) = override_cfg.seed_demo_data {
                config.seed_demo_data = value;
            }
        }
        Ok(config)
    }
}

fn parse_bool_env(key: &'static str) -> Result<bool> {
    match std::env::var(key) {
        Ok(value) => match value.as_str() {
            "1" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "false" | "FALSE" | "False" | "" => Ok(false),
            other => anyhow::bail!("parse {key}: unrecognized boolean {other:?}"),
        },
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        for key in [
            "AUTHGATE_BIND",
            "AUTHGATE_METRICS_BIND",
            "AUTHGATE_TOKEN_SECRET",
            "AUTHGATE_TOKEN_TTL_SECS",
            "AUTHGATE_BCRYPT_COST",
            "AUTHGATE_ENFORCE_SESSIONS",
            "AUTHGATE_SEED_DEMO_DATA",
            "AUTHGATE_CONFIG",
        ] {
            std::env::remove_var(key);
        }
        let config = AuthGateConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.metrics_bind.port(), 9090);
        assert_eq!(config.token_secret, DEV_TOKEN_SECRET);
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(!config.enforce_sessions);
        assert!(!config.seed_demo_data);
    }

    #[test]
    #[serial]
    fn env_overrides_are_parsed() {
        std::env::set_var("AUTHGATE_BIND", "127.0.0.1:9999");
        std::env::set_var("AUTHGATE_ENFORCE_SESSIONS", "true");
        std::env::set_var("AUTHGATE_TOKEN_TTL_SECS", "600");
        let config = AuthGateConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 9999);
        assert!(config.enforce_sessions);
        assert_eq!(config.token_ttl_secs, 600);
        std::env::remove_var("AUTHGATE_BIND");
        std::env::remove_var("AUTHGATE_ENFORCE_SESSIONS");
        std::env::remove_var("AUTHGATE_TOKEN_TTL_SECS");
    }

    #[test]
    #[serial]
    fn bad_boolean_is_an_error() {
        std::env::set_var("AUTHGATE_ENFORCE_SESSIONS", "maybe");
        let err = AuthGateConfig::from_env().err().expect("parse failure");
        assert!(err.to_string().contains("AUTHGATE_ENFORCE_SESSIONS"));
        std::env::remove_var("AUTHGATE_ENFORCE_SESSIONS");
    }
}
