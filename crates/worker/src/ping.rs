use std::sync::Arc;

use tracing::{debug, error};

use netpulse_core::format::ping_point;
use netpulse_core::{AppConfig, MetricsSink, Pinger};

/// One ping sweep over the configured targets.
///
/// Each target is probed once and its point written individually; a failure
/// on one target never stops the remaining ones.
pub struct PingWorker {
    config: Arc<AppConfig>,
    sink: Arc<dyn MetricsSink>,
    pinger: Arc<dyn Pinger>,
}

impl PingWorker {
    pub fn new(config: Arc<AppConfig>, sink: Arc<dyn MetricsSink>, pinger: Arc<dyn Pinger>) -> Self {
        Self {
            config,
            sink,
            pinger,
        }
    }

    pub async fn run_cycle(&self) {
        for target in &self.config.ping_targets {
            let outcome = self.pinger.probe(target).await;
            debug!(
                target,
                success = outcome.success,
                rtt_ms = outcome.rtt_ms,
                "probe finished"
            );

            let point = ping_point(target, &outcome, &self.config.namespace);
            if let Err(e) = self
                .sink
                .write(&self.config.influx.bucket, std::slice::from_ref(&point))
                .await
            {
                error!(target, "failed to write ping point: {e}");
            }
        }
    }
}
