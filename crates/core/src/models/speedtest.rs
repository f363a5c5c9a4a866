use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parsed output of `speedtest -f json`.
///
/// The CLI emits more than this; only the fields the tagging and formatting
/// pipeline consumes are modelled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedtestResult {
    pub timestamp: DateTime<Utc>,
    pub isp: String,
    pub interface: InterfaceInfo,
    pub server: ServerInfo,
    pub ping: LatencyStats,
    pub download: TransferStats,
    pub upload: TransferStats,
    pub result: ResultLink,
    #[serde(default)]
    pub packet_loss: Option<f64>,
}

/// Local network interface the test ran on.
///
/// `isVpn` is kept as a raw JSON value: older CLI builds emit the string
/// "false"/"true", newer ones a boolean, and the vpn_enabled tag only treats
/// the literal string "false" as disabled (see `tags`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub internal_ip: String,
    pub mac_addr: String,
    #[serde(default)]
    pub is_vpn: Option<serde_json::Value>,
    pub external_ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub country: String,
    pub host: String,
    pub port: u16,
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatencyStats {
    pub jitter: f64,
    pub latency: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferStats {
    /// Bytes per second.
    pub bandwidth: f64,
    pub bytes: i64,
    /// Milliseconds spent in this phase.
    pub elapsed: i64,
}

/// Link to the published result on the speedtest site.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultLink {
    pub id: String,
    pub url: String,
}

/// Outcome of a single latency probe against one target.
#[derive(Debug, Clone, PartialEq)]
pub struct PingOutcome {
    pub success: bool,
    /// Round-trip time in milliseconds, 0.0 when the probe failed.
    pub rtt_ms: f64,
}

impl PingOutcome {
    pub fn success(rtt_ms: f64) -> Self {
        Self {
            success: true,
            rtt_ms,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            rtt_ms: 0.0,
        }
    }
}

/// Canonical CLI output used by tests across the crate.
#[cfg(test)]
pub(crate) const SAMPLE_JSON: &str = r#"{
        "type": "result",
        "timestamp": "2024-05-01T12:00:00Z",
        "ping": {"jitter": 0.5, "latency": 12.3},
        "download": {"bandwidth": 100000000, "bytes": 500000000, "elapsed": 5001},
        "upload": {"bandwidth": 12500000, "bytes": 60000000, "elapsed": 4800},
        "isp": "Example ISP",
        "interface": {
            "internalIp": "192.168.1.10",
            "name": "eth0",
            "macAddr": "AA:BB:CC:DD:EE:FF",
            "isVpn": "false",
            "externalIp": "203.0.113.7"
        },
        "server": {
            "id": 4302,
            "host": "speedtest.example.net",
            "port": 8080,
            "name": "Example Server",
            "location": "Amsterdam",
            "country": "Netherlands",
            "ip": "198.51.100.4"
        },
        "result": {"id": "abcd-1234", "url": "https://www.speedtest.net/result/c/abcd-1234"}
    }"#;

#[cfg(test)]
pub(crate) fn sample_result() -> SpeedtestResult {
    serde_json::from_str(SAMPLE_JSON).expect("sample JSON is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_output() {
        let result: SpeedtestResult = serde_json::from_str(SAMPLE_JSON).unwrap();
        assert_eq!(result.isp, "Example ISP");
        assert_eq!(result.server.id, 4302);
        assert_eq!(result.download.bandwidth, 100_000_000.0);
        assert_eq!(result.timestamp.timestamp_millis(), 1_714_564_800_000);
        assert!(result.packet_loss.is_none());
    }

    #[test]
    fn packet_loss_is_read_when_present() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        value["packetLoss"] = serde_json::json!(2.5);
        let result: SpeedtestResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.packet_loss, Some(2.5));
    }

    #[test]
    fn tolerates_boolean_vpn_flag() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        value["interface"]["isVpn"] = serde_json::json!(false);
        let result: SpeedtestResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.interface.is_vpn, Some(serde_json::json!(false)));
    }
}
