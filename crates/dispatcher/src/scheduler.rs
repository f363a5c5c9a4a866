use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use netpulse_core::{AppConfig, MetricsSink, Pinger};
use netpulse_worker::{PingWorker, SpeedtestWorker};

/// One scheduler tick per second.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A worker kind is due whenever the counter sits on a multiple of its
/// cadence; tick zero triggers everything.
fn cycle_due(tick: u64, cadence: u64) -> bool {
    tick == 0 || tick % cadence == 0
}

/// Advance the tick counter, resetting when it reaches the bound.
///
/// The reset only keeps the counter's magnitude bounded; triggers are decided
/// by independent modulo checks. The reset lands *before* the increment, so
/// the counter is zero only on the very first iteration.
fn advance_tick(tick: u64, reset_bound: u64) -> u64 {
    let tick = if tick % reset_bound == 0 { 0 } else { tick };
    tick + 1
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WorkerKind {
    Ping,
    Speedtest,
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerKind::Ping => write!(f, "ping"),
            WorkerKind::Speedtest => write!(f, "speedtest"),
        }
    }
}

/// Holds the at-most-one live instance of a worker kind.
///
/// Replacing is strict: a still-running predecessor is aborted first, no
/// drain, no queuing. An in-flight write may be lost; the next cycle is a
/// complete measurement anyway.
struct WorkerSlot {
    kind: WorkerKind,
    handle: Option<JoinHandle<()>>,
}

impl WorkerSlot {
    fn new(kind: WorkerKind) -> Self {
        Self { kind, handle: None }
    }

    fn replace<F>(&mut self, cycle: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.handle.take() {
            if !previous.is_finished() {
                warn!(worker = %self.kind, "previous cycle still running, aborting it");
                previous.abort();
            }
        }
        debug!(worker = %self.kind, "launching cycle");
        self.handle = Some(tokio::spawn(cycle));
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

/// Dual-cadence control loop driving the ping and speed-test workers.
///
/// Single-threaded and cooperative: each second it decides per worker kind
/// whether to (re)launch, fire-and-forget. It never awaits worker completion
/// and has no exit condition of its own.
pub struct Scheduler {
    config: Arc<AppConfig>,
    sink: Arc<dyn MetricsSink>,
    pinger: Arc<dyn Pinger>,
    tick: u64,
    reset_bound: u64,
    ping_slot: WorkerSlot,
    speedtest_slot: WorkerSlot,
}

impl Scheduler {
    pub fn new(config: Arc<AppConfig>, sink: Arc<dyn MetricsSink>, pinger: Arc<dyn Pinger>) -> Self {
        let reset_bound = config
            .ping_cadence_secs
            .saturating_mul(config.speedtest_cadence_secs);
        Self {
            config,
            sink,
            pinger,
            tick: 0,
            reset_bound,
            ping_slot: WorkerSlot::new(WorkerKind::Ping),
            speedtest_slot: WorkerSlot::new(WorkerKind::Speedtest),
        }
    }

    pub async fn run(mut self) {
        info!(
            ping_cadence_secs = self.config.ping_cadence_secs,
            speedtest_cadence_secs = self.config.speedtest_cadence_secs,
            "scheduler started"
        );
        let mut ticker = interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.step();
        }
    }

    /// One scheduler iteration: trigger whatever is due, advance the counter.
    fn step(&mut self) {
        if cycle_due(self.tick, self.config.ping_cadence_secs) {
            let worker = PingWorker::new(
                Arc::clone(&self.config),
                Arc::clone(&self.sink),
                Arc::clone(&self.pinger),
            );
            self.ping_slot
                .replace(async move { worker.run_cycle().await });
        }

        if cycle_due(self.tick, self.config.speedtest_cadence_secs) {
            let worker = SpeedtestWorker::new(Arc::clone(&self.config), Arc::clone(&self.sink));
            self.speedtest_slot
                .replace(async move { worker.run_cycle().await });
        }

        self.tick = advance_tick(self.tick, self.reset_bound);
    }
}
