pub mod mocks {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use netpulse_core::config::RawSettings;
    use netpulse_core::{
        AppConfig, MetricPoint, MetricsSink, NetpulseError, NetpulseResult, PingOutcome, Pinger,
    };

    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::from_settings(RawSettings::default()).expect("valid defaults");
        config.namespace = "testing".to_string();
        config
    }

    pub fn sample_output() -> String {
        r#"{
            "type": "result",
            "timestamp": "2024-05-01T12:00:00Z",
            "ping": {"jitter": 0.5, "latency": 12.3},
            "download": {"bandwidth": 100000000, "bytes": 500000000, "elapsed": 5001},
            "upload": {"bandwidth": 12500000, "bytes": 60000000, "elapsed": 4800},
            "isp": "Example ISP",
            "interface": {
                "internalIp": "192.168.1.10",
                "name": "eth0",
                "macAddr": "AA:BB:CC:DD:EE:FF",
                "isVpn": "false",
                "externalIp": "203.0.113.7"
            },
            "server": {
                "id": 4302,
                "host": "speedtest.example.net",
                "port": 8080,
                "name": "Example Server",
                "location": "Amsterdam",
                "country": "Netherlands",
                "ip": "198.51.100.4"
            },
            "result": {"id": "abcd-1234", "url": "https://www.speedtest.net/result/c/abcd-1234"}
        }"#
        .to_string()
    }

    /// Sink that records every successful write for assertions.
    pub struct RecordingSink {
        writes: Mutex<Vec<(String, Vec<MetricPoint>)>>,
        fail_next: AtomicBool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_next: AtomicBool::new(false),
            }
        }

        /// Sink whose first write fails, the rest succeed.
        pub fn failing_first() -> Self {
            let sink = Self::new();
            sink.fail_next.store(true, Ordering::SeqCst);
            sink
        }

        pub fn writes(&self) -> Vec<(String, Vec<MetricPoint>)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetricsSink for RecordingSink {
        async fn write(&self, bucket: &str, points: &[MetricPoint]) -> NetpulseResult<()> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(NetpulseError::Sink("injected failure".to_string()));
            }
            self.writes
                .lock()
                .unwrap()
                .push((bucket.to_string(), points.to_vec()));
            Ok(())
        }
    }

    /// Pinger returning pre-scripted outcomes per target.
    pub struct ScriptedPinger {
        outcomes: HashMap<String, PingOutcome>,
    }

    impl ScriptedPinger {
        pub fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
            }
        }

        pub fn outcome(mut self, target: &str, outcome: PingOutcome) -> Self {
            self.outcomes.insert(target.to_string(), outcome);
            self
        }
    }

    #[async_trait]
    impl Pinger for ScriptedPinger {
        async fn probe(&self, target: &str) -> PingOutcome {
            self.outcomes
                .get(target)
                .cloned()
                .unwrap_or_else(PingOutcome::failure)
        }
    }
}
