use async_trait::async_trait;

use crate::errors::NetpulseResult;
use crate::models::{MetricPoint, PingOutcome};

/// Write access to the metrics store.
///
/// Implementations must be safe to call concurrently from multiple tasks;
/// the ping and speed-test workers share one handle.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn write(&self, bucket: &str, points: &[MetricPoint]) -> NetpulseResult<()>;
}

/// Single-packet latency probe facility.
///
/// A probe that fails (unreachable, timeout, resolution error) is data, not
/// an error, so the contract is infallible.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn probe(&self, target: &str) -> PingOutcome;
}
