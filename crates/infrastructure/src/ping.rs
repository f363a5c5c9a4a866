use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, warn};

use netpulse_core::{PingOutcome, Pinger};

const PAYLOAD_SIZE: usize = 128;
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// ICMP echo probe facility.
///
/// One 128-byte echo per probe under a 1-second deadline. Every failure mode
/// (resolution, raw socket, timeout) degrades to `PingOutcome::failure()`.
pub struct IcmpPinger {
    payload: [u8; PAYLOAD_SIZE],
    probe_timeout: Duration,
}

impl IcmpPinger {
    pub fn new() -> Self {
        Self {
            payload: [0; PAYLOAD_SIZE],
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    async fn resolve(&self, target: &str) -> Option<IpAddr> {
        if let Ok(addr) = target.parse::<IpAddr>() {
            return Some(addr);
        }
        match lookup_host((target, 0)).await {
            Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
            Err(e) => {
                warn!(target, "failed to resolve ping target: {e}");
                None
            }
        }
    }
}

impl Default for IcmpPinger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pinger for IcmpPinger {
    async fn probe(&self, target: &str) -> PingOutcome {
        let Some(addr) = self.resolve(target).await else {
            return PingOutcome::failure();
        };

        match timeout(self.probe_timeout, surge_ping::ping(addr, &self.payload)).await {
            Ok(Ok((_packet, rtt))) => {
                let rtt_ms = rtt.as_secs_f64() * 1000.0;
                debug!(target, rtt_ms, "probe succeeded");
                PingOutcome::success(rtt_ms)
            }
            Ok(Err(e)) => {
                debug!(target, "probe failed: {e}");
                PingOutcome::failure()
            }
            Err(_) => {
                debug!(target, "probe timed out");
                PingOutcome::failure()
            }
        }
    }
}
