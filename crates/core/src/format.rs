use std::collections::BTreeMap;

use crate::models::{MetricPoint, PingOutcome, SpeedtestResult};
use crate::tags::NAMESPACE_TAG;

/// 1 Mb/s = 125000 B/s.
const BYTES_PER_SEC_PER_MBPS: f64 = 125_000.0;

/// Convert a bytes-per-second bandwidth into megabits per second.
pub fn normalize_bandwidth(bytes_per_sec: f64) -> f64 {
    bytes_per_sec / BYTES_PER_SEC_PER_MBPS
}

// Missing packet loss is not an error; the field defaults to 0.
fn packet_loss(result: &SpeedtestResult) -> i64 {
    result.packet_loss.map(|loss| loss as i64).unwrap_or(0)
}

/// Map one speed-test result into its five metric points.
///
/// All points share the result timestamp and the given tag mapping.
pub fn speedtest_points(
    result: &SpeedtestResult,
    tags: &BTreeMap<String, String>,
) -> Vec<MetricPoint> {
    let timestamp = result.timestamp.timestamp_millis();
    let mut points = vec![
        MetricPoint::new("ping")
            .field("jitter", result.ping.jitter)
            .field("latency", result.ping.latency)
            .timestamp_ms(timestamp),
        MetricPoint::new("download")
            .field("bandwidth", normalize_bandwidth(result.download.bandwidth))
            .field("bytes", result.download.bytes)
            .field("elapsed", result.download.elapsed)
            .timestamp_ms(timestamp),
        MetricPoint::new("upload")
            .field("bandwidth", normalize_bandwidth(result.upload.bandwidth))
            .field("bytes", result.upload.bytes)
            .field("elapsed", result.upload.elapsed)
            .timestamp_ms(timestamp),
        MetricPoint::new("packetloss")
            .field("packetLoss", packet_loss(result))
            .timestamp_ms(timestamp),
        // Denormalized aggregate for convenience querying.
        MetricPoint::new("speeds")
            .field("jitter", result.ping.jitter)
            .field("latency", result.ping.latency)
            .field("packetLoss", packet_loss(result))
            .field("bandwidth_down", normalize_bandwidth(result.download.bandwidth))
            .field("bytes_down", result.download.bytes)
            .field("elapsed_down", result.download.elapsed)
            .field("bandwidth_up", normalize_bandwidth(result.upload.bandwidth))
            .field("bytes_up", result.upload.bytes)
            .field("elapsed_up", result.upload.elapsed)
            .timestamp_ms(timestamp),
    ];

    for point in &mut points {
        for (name, value) in tags {
            point.add_tag(name.clone(), value.clone());
        }
    }
    points
}

/// Map one latency probe outcome into a `pings` point.
///
/// The target tag carries the literal configured string, not a resolved
/// address. No timestamp is set; the store assigns arrival time.
pub fn ping_point(target: &str, outcome: &PingOutcome, namespace: &str) -> MetricPoint {
    let mut point = MetricPoint::new("pings")
        .field("success", i64::from(outcome.success))
        .field("rtt", outcome.rtt_ms);
    point.add_tag(NAMESPACE_TAG, namespace);
    point.add_tag("target", target);
    point
}
