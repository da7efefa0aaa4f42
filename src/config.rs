use crate::checking::constants::{DEFAULT_NTFY_SERVER, DEFAULT_SCHEDULER_API_BASE, HTTP_TIMEOUT};
use crate::models::service::ServiceKind;
use anyhow::{Context, Result, anyhow};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Single fixed location watched for one topic
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalConfig {
    pub service: ServiceKind,
    pub location_id: String,
    pub ntfy_topic: String,
    pub minimum_slots: Vec<u32>,
}

/// Subscriptions loaded from MongoDB
#[derive(Debug, Clone, PartialEq)]
pub struct MultiUserConfig {
    pub service: ServiceKind,
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Personal(PersonalConfig),
    MultiUser(MultiUserConfig),
}

/// Process configuration, read once at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub ntfy_server: String,
    pub scheduler_api_base: String,
    pub cors_allowed_origin: String,
    pub http_timeout: Duration,
    pub schedule_interval: Duration,
    pub invocation_timeout: Duration,
    pub bind_address: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let service = ServiceKind::from_name(&env.or("SERVICE_TYPE", "Global Entry"));

        let mode = if env.or("PERSONAL_MODE", "false") == "true" {
            Mode::Personal(PersonalConfig {
                service,
                location_id: env.required("LOCATION_ID")?,
                ntfy_topic: env.required("NTFY_TOPIC")?,
                minimum_slots: parse_minimum_slots(&env.or("MINIMUM_SLOTS", "1")),
            })
        } else {
            Mode::MultiUser(MultiUserConfig {
                service,
                mongodb_uri: env.required("MONGODB_URI")?,
                database: env.or("MONGODB_DATABASE", "global-entry-appointment-db"),
                collection: env.or("MONGODB_COLLECTION", "subscriptions"),
            })
        };

        let schedule_interval = Duration::from_secs(env.parsed("SCHEDULE_INTERVAL_SECS", 60)?);
        if schedule_interval.is_zero() {
            return Err(anyhow!("SCHEDULE_INTERVAL_SECS must be positive"));
        }

        Ok(Config {
            mode,
            ntfy_server: env.url("NTFY_SERVER", DEFAULT_NTFY_SERVER)?,
            scheduler_api_base: env.url("SCHEDULER_API_BASE", DEFAULT_SCHEDULER_API_BASE)?,
            cors_allowed_origin: env.or("CORS_ALLOWED_ORIGIN", "*"),
            http_timeout: Duration::from_secs(
                env.parsed("HTTP_TIMEOUT_SECS", HTTP_TIMEOUT.as_secs())?,
            ),
            schedule_interval,
            invocation_timeout: Duration::from_secs(env.parsed("INVOCATION_TIMEOUT_SECS", 60)?),
            bind_address: env.or("BIND_ADDRESS", "0.0.0.0"),
            port: env.parsed("PORT", 8080)?,
        })
    }

    pub fn is_personal(&self) -> bool {
        matches!(self.mode, Mode::Personal(_))
    }
}

/// Comma separated thresholds; non-positive or unparsable entries are
/// dropped and an empty result falls back to `[1]`.
pub fn parse_minimum_slots(raw: &str) -> Vec<u32> {
    let slots: Vec<u32> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|&minimum| minimum > 0)
        .collect();

    if slots.is_empty() { vec![1] } else { slots }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| anyhow!("missing required environment variable {key}"))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid value {raw:?} for {key}")),
            None => Ok(default),
        }
    }

    fn url(&self, key: &str, default: &str) -> Result<String> {
        let raw = self.or(key, default);
        Url::parse(&raw).with_context(|| format!("invalid URL {raw:?} for {key}"))?;
        Ok(raw)
    }
}
