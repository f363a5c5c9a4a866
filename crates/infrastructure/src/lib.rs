pub mod influx;
pub mod ping;

pub use influx::InfluxSink;
pub use ping::IcmpPinger;
