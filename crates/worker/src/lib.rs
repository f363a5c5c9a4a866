pub mod ping;
pub mod speedtest;

#[cfg(test)]
mod test_utils;

pub use ping::PingWorker;
pub use speedtest::SpeedtestWorker;
