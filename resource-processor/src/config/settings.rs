//! Settings loaded from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::ProcessorError;

const DEFAULT_KAFKA_URL: &str = "localhost:9092";
const DEFAULT_KAFKA_GROUP_ID: &str = "challenge-resource-processor";
const DEFAULT_RESOURCE_TOPIC: &str = "challenge.notification.events";
const DEFAULT_REGISTRATION_TOPIC: &str = "notifications.kafka.queue.java.test";
const DEFAULT_UPDATE_ES_URL: &str = "https://api.topcoder.com/v4/esfeeder/challenges";
const DEFAULT_UPDATE_ES_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_BATCH_SIZE: usize = 50;
const DEFAULT_BATCH_TIMEOUT_MS: u64 = 100;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "debug";

/// Kafka connection and batching settings.
#[derive(Debug, Clone)]
pub struct KafkaSettings {
    pub url: String,
    pub group_id: String,
    /// Client certificate in PEM form.
    pub client_cert: Option<String>,
    /// Client certificate key in PEM form.
    pub client_cert_key: Option<String>,
    pub batch_size: usize,
    pub batch_timeout: Duration,
}

impl KafkaSettings {
    /// Certificate and key, when both are configured.
    pub fn tls(&self) -> Option<(&str, &str)> {
        match (&self.client_cert, &self.client_cert_key) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }
}

/// Logging settings.
///
/// Loaded on their own so tracing is up before the remaining settings are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub disabled: bool,
    pub json: bool,
}

impl LogSettings {
    /// Load `LOG_LEVEL`, `DISABLE_LOGGING` and `LOG_FORMAT` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            disabled: parse_flag(lookup("DISABLE_LOGGING")),
            json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        }
    }
}

/// All processor settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub kafka: KafkaSettings,
    pub resource_topic: String,
    pub registration_topic: String,
    pub update_es_url: String,
    pub update_es_timeout: Duration,
    pub port: u16,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `KAFKA_URL`: Kafka broker addresses (default: localhost:9092)
    /// - `KAFKA_GROUP_ID`: Consumer group ID (default: challenge-resource-processor)
    /// - `KAFKA_CLIENT_CERT` / `KAFKA_CLIENT_CERT_KEY`: PEM client certificate and key
    /// - `RESOURCE_TOPIC`: Resource topic (default: challenge.notification.events)
    /// - `REGISTRATION_TOPIC`: Registration topic (default: notifications.kafka.queue.java.test)
    /// - `UPDATE_ES_CHALLENGE_DETAILS_URL`: ES feeder endpoint
    /// - `UPDATE_ES_TIMEOUT_MS`: Re-index request timeout (default: 10000)
    /// - `KAFKA_BATCH_SIZE` / `KAFKA_BATCH_TIMEOUT_MS`: Batching (default: 50 / 100)
    /// - `PORT`: Health endpoint port (default: 3000)
    /// - `LOG_LEVEL`, `DISABLE_LOGGING`, `LOG_FORMAT`: Logging
    pub fn from_env() -> Result<Self, ProcessorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProcessorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secret = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let settings = Self {
            kafka: KafkaSettings {
                url: text("KAFKA_URL", DEFAULT_KAFKA_URL),
                group_id: text("KAFKA_GROUP_ID", DEFAULT_KAFKA_GROUP_ID),
                client_cert: secret("KAFKA_CLIENT_CERT"),
                client_cert_key: secret("KAFKA_CLIENT_CERT_KEY"),
                batch_size: parse_or(&lookup, "KAFKA_BATCH_SIZE", DEFAULT_BATCH_SIZE),
                batch_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "KAFKA_BATCH_TIMEOUT_MS",
                    DEFAULT_BATCH_TIMEOUT_MS,
                )),
            },
            resource_topic: text("RESOURCE_TOPIC", DEFAULT_RESOURCE_TOPIC),
            registration_topic: text("REGISTRATION_TOPIC", DEFAULT_REGISTRATION_TOPIC),
            update_es_url: text("UPDATE_ES_CHALLENGE_DETAILS_URL", DEFAULT_UPDATE_ES_URL),
            update_es_timeout: Duration::from_millis(parse_or(
                &lookup,
                "UPDATE_ES_TIMEOUT_MS",
                DEFAULT_UPDATE_ES_TIMEOUT_MS,
            )),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            log: LogSettings::from_lookup(&lookup),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Topics the consumer subscribes to.
    pub fn topics(&self) -> Vec<String> {
        vec![self.resource_topic.clone(), self.registration_topic.clone()]
    }

    fn validate(&self) -> Result<(), ProcessorError> {
        let url = self.update_es_url.trim();
        if url.is_empty() {
            return Err(ProcessorError::config(
                "UPDATE_ES_CHALLENGE_DETAILS_URL must not be empty",
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ProcessorError::config(format!(
                "UPDATE_ES_CHALLENGE_DETAILS_URL must be an http(s) URL, got {}",
                url
            )));
        }
        if self.resource_topic.trim().is_empty() || self.registration_topic.trim().is_empty() {
            return Err(ProcessorError::config("Kafka topic names must not be empty"));
        }
        if self.resource_topic == self.registration_topic {
            return Err(ProcessorError::config(format!(
                "RESOURCE_TOPIC and REGISTRATION_TOPIC must differ, both are {}",
                self.resource_topic
            )));
        }
        Ok(())
    }
}

/// Parse a variable, falling back to the default with a warning.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

fn parse_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ProcessorError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();

        assert_eq!(settings.kafka.url, "localhost:9092");
        assert_eq!(settings.kafka.group_id, "challenge-resource-processor");
        assert!(settings.kafka.tls().is_none());
        assert_eq!(settings.kafka.batch_size, 50);
        assert_eq!(settings.kafka.batch_timeout, Duration::from_millis(100));
        assert_eq!(
            settings.topics(),
            vec![
                "challenge.notification.events".to_string(),
                "notifications.kafka.queue.java.test".to_string()
            ]
        );
        assert_eq!(
            settings.update_es_url,
            "https://api.topcoder.com/v4/esfeeder/challenges"
        );
        assert_eq!(settings.update_es_timeout, Duration::from_millis(10_000));
        assert_eq!(settings.port, 3000);
        assert_eq!(
            settings.log,
            LogSettings {
                level: "debug".to_string(),
                disabled: false,
                json: false
            }
        );
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("KAFKA_URL", "broker-1:9093,broker-2:9093"),
            ("KAFKA_CLIENT_CERT", "CERT"),
            ("KAFKA_CLIENT_CERT_KEY", "KEY"),
            ("RESOURCE_TOPIC", "resources"),
            ("REGISTRATION_TOPIC", "registrations"),
            ("UPDATE_ES_CHALLENGE_DETAILS_URL", "http://localhost:8080/feeder"),
            ("UPDATE_ES_TIMEOUT_MS", "2500"),
            ("PORT", "8081"),
            ("LOG_LEVEL", "info"),
            ("DISABLE_LOGGING", "TRUE"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(settings.kafka.url, "broker-1:9093,broker-2:9093");
        assert_eq!(settings.kafka.tls(), Some(("CERT", "KEY")));
        assert_eq!(settings.topics(), vec!["resources", "registrations"]);
        assert_eq!(settings.update_es_timeout, Duration::from_millis(2500));
        assert_eq!(settings.port, 8081);
        assert!(settings.log.disabled);
        assert!(settings.log.json);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let settings = load(&[("PORT", "not-a-port"), ("KAFKA_BATCH_SIZE", "-1")]).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.kafka.batch_size, 50);
    }

    #[test]
    fn test_partial_tls_is_disabled() {
        let settings = load(&[("KAFKA_CLIENT_CERT", "CERT"), ("KAFKA_CLIENT_CERT_KEY", "")]).unwrap();
        assert!(settings.kafka.tls().is_none());
    }

    #[test]
    fn test_invalid_url() {
        for url in ["", "   ", "ftp://feeder/challenges", "localhost:8080"] {
            let result = load(&[("UPDATE_ES_CHALLENGE_DETAILS_URL", url)]);
            assert!(
                matches!(result, Err(ProcessorError::ConfigError(_))),
                "url {:?} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_log_settings_load_without_other_settings() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LOG_LEVEL", "warn"),
            ("LOG_FORMAT", "JSON"),
            ("UPDATE_ES_CHALLENGE_DETAILS_URL", "not a url"),
            ("PORT", "not-a-port"),
        ]);
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());

        assert_eq!(
            LogSettings::from_lookup(lookup),
            LogSettings {
                level: "warn".to_string(),
                disabled: false,
                json: true
            }
        );
        assert!(Settings::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_identical_topics() {
        let result = load(&[("RESOURCE_TOPIC", "events"), ("REGISTRATION_TOPIC", "events")]);
        assert!(matches!(result, Err(ProcessorError::ConfigError(_))));
    }
}
