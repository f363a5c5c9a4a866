use async_trait::async_trait;
use tracing::debug;

use netpulse_core::{InfluxConfig, MetricPoint, MetricsSink, NetpulseError, NetpulseResult};

/// InfluxDB v2 write client.
///
/// One HTTP POST per batch against `/api/v2/write` with millisecond
/// precision. `reqwest::Client` pools connections internally and is safe to
/// share across the ping and speed-test workers.
pub struct InfluxSink {
    client: reqwest::Client,
    write_url: String,
    org: String,
    token: String,
}

impl InfluxSink {
    pub fn new(config: &InfluxConfig) -> NetpulseResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| NetpulseError::Sink(e.to_string()))?;
        Ok(Self {
            client,
            write_url: write_url(&config.address, config.port),
            org: config.org.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl MetricsSink for InfluxSink {
    async fn write(&self, bucket: &str, points: &[MetricPoint]) -> NetpulseResult<()> {
        let body = points
            .iter()
            .map(MetricPoint::to_line_protocol)
            .collect::<Vec<_>>()
            .join("\n");
        debug!(bucket, count = points.len(), "writing points");

        let response = self
            .client
            .post(&self.write_url)
            .query(&[("org", self.org.as_str()), ("bucket", bucket), ("precision", "ms")])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| NetpulseError::Sink(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NetpulseError::Sink(format!(
                "write to bucket {bucket} rejected with status {status}: {detail}"
            )));
        }
        Ok(())
    }
}

// The original deployment configured the address without a scheme
// ("influxdb"); an HTTP client needs one.
fn write_url(address: &str, port: u16) -> String {
    let base = if address.contains("://") {
        format!("{address}:{port}")
    } else {
        format!("http://{address}:{port}")
    };
    format!("{base}/api/v2/write")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_url_appends_port_and_path() {
        assert_eq!(
            write_url("http://influxdb", 8086),
            "http://influxdb:8086/api/v2/write"
        );
    }

    #[test]
    fn write_url_defaults_to_http_scheme() {
        assert_eq!(
            write_url("influxdb", 8086),
            "http://influxdb:8086/api/v2/write"
        );
        assert_eq!(
            write_url("https://influx.example.com", 443),
            "https://influx.example.com:443/api/v2/write"
        );
    }
}
