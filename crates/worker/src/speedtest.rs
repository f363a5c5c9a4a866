use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{error, info};

use netpulse_core::format::{normalize_bandwidth, speedtest_points};
use netpulse_core::{AppConfig, MetricPoint, MetricsSink, NetpulseResult, SpeedtestResult};

const SPEEDTEST_BIN: &str = "speedtest";

/// One speed-test measurement cycle.
///
/// Invokes the external CLI, parses its JSON output, formats the five metric
/// points and writes them as one batch. Every failure is logged here; nothing
/// escapes the cycle, the next trigger simply tries again.
pub struct SpeedtestWorker {
    config: Arc<AppConfig>,
    sink: Arc<dyn MetricsSink>,
}

impl SpeedtestWorker {
    pub fn new(config: Arc<AppConfig>, sink: Arc<dyn MetricsSink>) -> Self {
        Self { config, sink }
    }

    pub async fn run_cycle(&self) {
        if let Err(e) = self.measure().await {
            error!("speed test cycle failed: {e}");
        }
    }

    async fn measure(&self) -> NetpulseResult<()> {
        match &self.config.speedtest_server_id {
            Some(id) => info!(server_id = %id, "starting speed test with manual server choice"),
            None => info!("starting speed test with automatic server choice"),
        }

        let output = Command::new(SPEEDTEST_BIN)
            .args(self.tool_args())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The cycle may be aborted by the scheduler; take the orphaned
            // CLI process down with it.
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            error!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                stdout = %String::from_utf8_lossy(&output.stdout),
                "speed test failed, nothing written"
            );
            return Ok(());
        }

        let points = self.points_from_output(&output.stdout)?;
        self.sink.write(&self.config.influx.bucket, &points).await?;
        info!(points = points.len(), "speed test results written");
        Ok(())
    }

    fn tool_args(&self) -> Vec<String> {
        let mut args = vec![
            "--accept-license".to_string(),
            "--accept-gdpr".to_string(),
            "-f".to_string(),
            "json".to_string(),
        ];
        if let Some(id) = &self.config.speedtest_server_id {
            args.push(format!("--server-id={id}"));
        }
        args
    }

    /// Parse the CLI JSON and format it into the five tagged points.
    fn points_from_output(&self, stdout: &[u8]) -> NetpulseResult<Vec<MetricPoint>> {
        let result: SpeedtestResult = serde_json::from_slice(stdout)?;
        info!(
            timestamp = %result.timestamp,
            latency_ms = result.ping.latency,
            download_mbps = normalize_bandwidth(result.download.bandwidth),
            upload_mbps = normalize_bandwidth(result.upload.bandwidth),
            isp = %result.isp,
            external_ip = %result.interface.external_ip,
            server_id = result.server.id,
            server_name = %result.server.name,
            server_location = %result.server.location,
            "speed test successful"
        );

        let tags = self
            .config
            .tag_spec
            .resolve(&result, &self.config.namespace);
        Ok(speedtest_points(&result, &tags))
    }
}
