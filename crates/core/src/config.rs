use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::{NetpulseError, NetpulseResult};
use crate::tags::TagSpec;

/// Raw settings as they appear in the environment or config file.
///
/// Key names match the environment variables of the original deployment
/// (`INFLUX_DB_ADDRESS`, `SPEEDTEST_INTERVAL`, ...). Everything is optional
/// and defaulted; conversion into [`AppConfig`] validates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub namespace: String,
    pub influx_db_address: String,
    pub influx_db_port: u16,
    pub influx_db_org: String,
    pub influx_db_token: String,
    pub influx_db_bucket: String,
    pub influx_db_tags: Option<String>,
    pub ping_targets: String,
    /// Minutes between speed tests.
    pub speedtest_interval: u64,
    pub speedtest_server_id: String,
    /// Seconds between ping sweeps.
    pub ping_interval: u64,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            namespace: "None".to_string(),
            influx_db_address: "http://influxdb".to_string(),
            influx_db_port: 8086,
            influx_db_org: String::new(),
            influx_db_token: String::new(),
            influx_db_bucket: "speedtests".to_string(),
            influx_db_tags: None,
            ping_targets: "1.1.1.1, 8.8.8.8".to_string(),
            speedtest_interval: 180,
            speedtest_server_id: String::new(),
            ping_interval: 120,
        }
    }
}

/// Metrics store connection settings.
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub address: String,
    pub port: u16,
    pub org: String,
    pub token: String,
    pub bucket: String,
}

/// Validated, immutable application configuration.
///
/// Constructed once at startup and passed by reference into the scheduler
/// and both workers; there is no runtime reconfiguration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub namespace: String,
    pub influx: InfluxConfig,
    pub tag_spec: TagSpec,
    pub ping_targets: Vec<String>,
    /// Scheduler ticks (seconds) between speed tests.
    pub speedtest_cadence_secs: u64,
    /// Fixed server to test against; `None` selects automatically.
    pub speedtest_server_id: Option<String>,
    /// Scheduler ticks (seconds) between ping sweeps.
    pub ping_cadence_secs: u64,
}

impl AppConfig {
    /// Load from an optional TOML file overlaid with environment variables.
    pub fn load(config_path: &str) -> NetpulseResult<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()
            .map_err(|e| NetpulseError::Configuration(e.to_string()))?;
        let raw: RawSettings = settings
            .try_deserialize()
            .map_err(|e| NetpulseError::Configuration(e.to_string()))?;
        Self::from_settings(raw)
    }

    /// Validate raw settings and convert units.
    pub fn from_settings(raw: RawSettings) -> NetpulseResult<Self> {
        if raw.speedtest_interval == 0 {
            return Err(NetpulseError::Configuration(
                "SPEEDTEST_INTERVAL must be at least 1 minute".to_string(),
            ));
        }
        if raw.ping_interval == 0 {
            return Err(NetpulseError::Configuration(
                "PING_INTERVAL must be at least 1 second".to_string(),
            ));
        }

        // Fail fast on a bad tag spec instead of at the first formatted point.
        let tag_spec = TagSpec::parse(raw.influx_db_tags.as_deref())?;

        let ping_targets: Vec<String> = raw
            .ping_targets
            .split(',')
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .map(str::to_string)
            .collect();
        if ping_targets.is_empty() {
            return Err(NetpulseError::Configuration(
                "PING_TARGETS must name at least one target".to_string(),
            ));
        }

        let speedtest_server_id = if raw.speedtest_server_id.is_empty() {
            None
        } else {
            Some(raw.speedtest_server_id)
        };

        Ok(Self {
            namespace: raw.namespace,
            influx: InfluxConfig {
                address: raw.influx_db_address,
                port: raw.influx_db_port,
                org: raw.influx_db_org,
                token: raw.influx_db_token,
                bucket: raw.influx_db_bucket,
            },
            tag_spec,
            ping_targets,
            speedtest_cadence_secs: raw.speedtest_interval * 60,
            speedtest_server_id,
            ping_cadence_secs: raw.ping_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_deployment() {
        let config = AppConfig::from_settings(RawSettings::default()).unwrap();

        assert_eq!(config.namespace, "None");
        assert_eq!(config.influx.address, "http://influxdb");
        assert_eq!(config.influx.port, 8086);
        assert_eq!(config.influx.bucket, "speedtests");
        assert_eq!(config.tag_spec, TagSpec::NamespaceOnly);
        assert_eq!(config.ping_targets, vec!["1.1.1.1", "8.8.8.8"]);
        assert_eq!(config.speedtest_cadence_secs, 180 * 60);
        assert_eq!(config.speedtest_server_id, None);
        assert_eq!(config.ping_cadence_secs, 120);
    }

    #[test]
    fn speedtest_interval_is_minutes() {
        let raw = RawSettings {
            speedtest_interval: 5,
            ..RawSettings::default()
        };
        let config = AppConfig::from_settings(raw).unwrap();
        assert_eq!(config.speedtest_cadence_secs, 300);
    }

    #[test]
    fn zero_cadences_are_rejected() {
        let raw = RawSettings {
            speedtest_interval: 0,
            ..RawSettings::default()
        };
        assert!(AppConfig::from_settings(raw).is_err());

        let raw = RawSettings {
            ping_interval: 0,
            ..RawSettings::default()
        };
        assert!(AppConfig::from_settings(raw).is_err());
    }

    #[test]
    fn bad_tag_spec_fails_at_startup() {
        let raw = RawSettings {
            influx_db_tags: Some("isp, bogus_tag".to_string()),
            ..RawSettings::default()
        };
        let err = AppConfig::from_settings(raw).unwrap_err();
        assert!(matches!(err, NetpulseError::UnknownTag { .. }));
    }

    #[test]
    fn targets_are_trimmed_and_empty_entries_dropped() {
        let raw = RawSettings {
            ping_targets: " 1.1.1.1 ,, 8.8.8.8 ".to_string(),
            ..RawSettings::default()
        };
        let config = AppConfig::from_settings(raw).unwrap();
        assert_eq!(config.ping_targets, vec!["1.1.1.1", "8.8.8.8"]);
    }

    #[test]
    fn configured_server_id_is_kept() {
        let raw = RawSettings {
            speedtest_server_id: "4302".to_string(),
            ..RawSettings::default()
        };
        let config = AppConfig::from_settings(raw).unwrap();
        assert_eq!(config.speedtest_server_id.as_deref(), Some("4302"));
    }
}
