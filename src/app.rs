use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use netpulse_core::{AppConfig, MetricsSink, Pinger};
use netpulse_dispatcher::Scheduler;
use netpulse_infrastructure::{IcmpPinger, InfluxSink};

/// Wires the sink, the pinger and the scheduler together and runs until a
/// shutdown signal arrives. The scheduler itself never returns; measurement
/// failures stay inside their cycles.
pub struct Application {
    config: Arc<AppConfig>,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub async fn run(self) -> Result<()> {
        let sink: Arc<dyn MetricsSink> = Arc::new(
            InfluxSink::new(&self.config.influx).context("failed to build metrics sink")?,
        );
        let pinger: Arc<dyn Pinger> = Arc::new(IcmpPinger::new());

        let scheduler = Scheduler::new(Arc::clone(&self.config), sink, pinger);
        let scheduler_task = tokio::spawn(scheduler.run());
        info!("netpulse started");

        signal::ctrl_c()
            .await
            .context("failed to listen for shutdown signal")?;
        info!("shutdown signal received, stopping scheduler");
        scheduler_task.abort();

        Ok(())
    }
}
