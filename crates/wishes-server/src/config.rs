use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

use wishes_api::rate_limit::RateLimitPolicy;

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub rate_limit: RateLimitPolicy,
    pub sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("WISHES_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "WISHES_PORT", 3000)?;
        let db_path: PathBuf = lookup("WISHES_DB_PATH")
            .unwrap_or_else(|| "wishes.db".into())
            .into();

        let defaults = RateLimitPolicy::default();
        let limit: u32 = parse_or(&lookup, "WISHES_RATE_LIMIT", defaults.limit)?;
        let window_secs: u64 = parse_or(&lookup, "WISHES_RATE_WINDOW_SECS", defaults.window.as_secs())?;
        let sweep_secs: u64 = parse_or(&lookup, "WISHES_SWEEP_INTERVAL_SECS", 60)?;

        if limit == 0 {
            bail!("WISHES_RATE_LIMIT must be at least 1");
        }
        if window_secs == 0 || sweep_secs == 0 {
            bail!("WISHES_RATE_WINDOW_SECS and WISHES_SWEEP_INTERVAL_SECS must be positive");
        }

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            addr,
            db_path,
            rate_limit: RateLimitPolicy {
                limit,
                window: Duration::from_secs(window_secs),
            },
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {} value '{}'", key, raw)),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("wishes.db"));
        assert_eq!(cfg.rate_limit, RateLimitPolicy::default());
        assert_eq!(cfg.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("WISHES_HOST", "127.0.0.1"),
            ("WISHES_PORT", "8080"),
            ("WISHES_RATE_LIMIT", "5"),
            ("WISHES_RATE_WINDOW_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.rate_limit.limit, 5);
        assert_eq!(cfg.rate_limit.window, Duration::from_secs(30));
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(config(&[("WISHES_PORT", "eighty")]).is_err());
        assert!(config(&[("WISHES_RATE_LIMIT", "0")]).is_err());
        assert!(config(&[("WISHES_SWEEP_INTERVAL_SECS", "0")]).is_err());
    }
}
