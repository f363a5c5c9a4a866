pub mod point;
pub mod speedtest;

pub use point::{FieldValue, MetricPoint};
pub use speedtest::{
    InterfaceInfo, LatencyStats, PingOutcome, ResultLink, ServerInfo, SpeedtestResult,
    TransferStats,
};
