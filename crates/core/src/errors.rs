use thiserror::Error;

/// Error type shared across the collector
#[derive(Debug, Error)]
pub enum NetpulseError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown tag name in tag specification: {name}")]
    UnknownTag { name: String },

    #[error("speedtest invocation failed: {0}")]
    SpeedtestInvocation(#[from] std::io::Error),

    #[error("speedtest output did not match the expected structure: {0}")]
    SpeedtestOutput(#[from] serde_json::Error),

    #[error("metrics sink error: {0}")]
    Sink(String),
}

/// Unified Result type
pub type NetpulseResult<T> = std::result::Result<T, NetpulseError>;
