//! Pool and fleet configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::{IntakeRules, RobotKind, DEFAULT_PRIORITY, HEAVY_THRESHOLD};

/// Environment variable overriding [`PoolConfig::heavy_threshold`].
pub const ENV_HEAVY_THRESHOLD: &str = "AUTOMAIL_HEAVY_THRESHOLD";
/// Environment variable overriding [`PoolConfig::default_priority`].
pub const ENV_DEFAULT_PRIORITY: &str = "AUTOMAIL_DEFAULT_PRIORITY";
/// Environment variable overriding [`PoolConfig::audit_capacity`].
pub const ENV_AUDIT_CAPACITY: &str = "AUTOMAIL_AUDIT_CAPACITY";
/// Environment variable listing the fleet, e.g. `standard,careful,weak`.
pub const ENV_ROBOTS: &str = "AUTOMAIL_ROBOTS";

/// Mail pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Weight at or above which mail counts as heavy.
    pub heavy_threshold: u32,
    /// Priority for mail without an explicit level.
    pub default_priority: u32,
    /// Events kept by the in-memory audit sink; zero disables auditing.
    pub audit_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            heavy_threshold: HEAVY_THRESHOLD,
            default_priority: DEFAULT_PRIORITY,
            audit_capacity: 0,
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.heavy_threshold == 0 {
            return Err("heavy_threshold must be greater than 0".into());
        }
        Ok(())
    }

    /// Intake rules derived from this configuration.
    pub const fn intake_rules(&self) -> IntakeRules {
        IntakeRules {
            heavy_threshold: self.heavy_threshold,
            default_priority: self.default_priority,
        }
    }
}

/// Root configuration: the pool plus the fleet it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomailConfig {
    /// Pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
    /// Robots to build, in id order starting at 1.
    #[serde(default = "default_robots")]
    pub robots: Vec<RobotKind>,
}

fn default_robots() -> Vec<RobotKind> {
    vec![RobotKind::Standard, RobotKind::Careful, RobotKind::Weak]
}

impl Default for AutomailConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            robots: default_robots(),
        }
    }
}

impl AutomailConfig {
    /// Validate the pool and ensure at least one robot exists.
    pub fn validate(&self) -> Result<(), String> {
        self.pool
            .validate()
            .map_err(|e| format!("pool invalid: {e}"))?;
        if self.robots.is_empty() {
            return Err("at least one robot must be defined".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` if present, then read `AUTOMAIL_*` variables on top of
    /// the defaults.
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(format!("failed to load .env: {e}"));
            }
        }
        Self::from_vars(std::env::vars())
    }

    /// Apply `AUTOMAIL_*` key/value pairs on top of the defaults and
    /// validate. Unrelated keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = Self::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_HEAVY_THRESHOLD => cfg.pool.heavy_threshold = parse_var(ENV_HEAVY_THRESHOLD, value)?,
                ENV_DEFAULT_PRIORITY => cfg.pool.default_priority = parse_var(ENV_DEFAULT_PRIORITY, value)?,
                ENV_AUDIT_CAPACITY => cfg.pool.audit_capacity = parse_var(ENV_AUDIT_CAPACITY, value)?,
                ENV_ROBOTS => {
                    cfg.robots = value
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(str::parse)
                        .collect::<Result<_, _>>()
                        .map_err(|e| format!("{ENV_ROBOTS}: {e}"))?;
                }
                _ => {}
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| format!("{key}: {e}"))
}
