use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_dir: PathBuf,
    pub session_dir: PathBuf,
    /// File stem the logged-in user is stored under.
    pub session_key: String,

    // Synthetic data
    pub seed_days: u32,
    pub seed: Option<u64>,

    // Simulated latency
    pub login_delay: Duration,
    pub submit_delay: Duration,

    pub demo_email: Option<String>,
    pub demo_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            session_dir: PathBuf::from(".session"),
            session_key: "currentUser".to_string(),
            seed_days: 30,
            seed: None,
            login_delay: Duration::from_millis(800),
            submit_delay: Duration::from_millis(800),
            demo_email: None,
            demo_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .with_context(|| format!("{key} must be a whole number of milliseconds")),
                None => Ok(default),
            }
        };

        Ok(Self {
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            session_dir: lookup("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
            session_key: lookup("SESSION_KEY").unwrap_or(defaults.session_key),

            seed_days: match lookup("SEED_DAYS") {
                Some(v) => v.trim().parse::<u32>().context("SEED_DAYS must be a number")?,
                None => defaults.seed_days,
            },
            seed: lookup("SEED")
                .map(|v| v.trim().parse::<u64>().context("SEED must be an unsigned integer"))
                .transpose()?,

            login_delay: millis("LOGIN_DELAY_MS", defaults.login_delay)?,
            submit_delay: millis("SUBMIT_DELAY_MS", defaults.submit_delay)?,

            demo_email: lookup("DEMO_EMAIL"),
            demo_password: lookup("DEMO_PASSWORD"),
        })
    }

    /// No simulated latency; used where a caller should not sleep.
    pub fn without_delays(mut self) -> Self {
        self.login_delay = Duration::ZERO;
        self.submit_delay = Duration::ZERO;
        self
    }
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
    fn missing_keys_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.session_key, "currentUser");
        assert_eq!(config.seed_days, 30);
        assert_eq!(config.seed, None);
        assert_eq!(config.login_delay, Duration::from_millis(800));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SEED", "7"),
            ("SEED_DAYS", "10"),
            ("SUBMIT_DELAY_MS", "0"),
            ("SESSION_DIR", "/tmp/sessions"),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.seed_days, 10);
        assert_eq!(config.submit_delay, Duration::ZERO);
        assert_eq!(config.session_dir, PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("LOGIN_DELAY_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("LOGIN_DELAY_MS"));
    }
}
