pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod tags;
pub mod traits;

pub use config::{AppConfig, InfluxConfig};
pub use errors::{NetpulseError, NetpulseResult};
pub use models::{MetricPoint, PingOutcome, SpeedtestResult};
pub use tags::TagSpec;
pub use traits::{MetricsSink, Pinger};
