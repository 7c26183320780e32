use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Bytes captured per frame.
    #[serde(default = "default_snaplen")]
    pub snaplen: i32,

    /// Put the interface into promiscuous mode.
    #[serde(default = "default_promiscuous")]
    pub promiscuous: bool,

    /// Read timeout on the capture handle; bounds how long shutdown can
    /// lag behind the cancellation signal.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: i32,

    /// BPF filter applied to the handle.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: default_snaplen(),
            promiscuous: default_promiscuous(),
            read_timeout_ms: default_read_timeout_ms(),
            filter: default_filter(),
        }
    }
}

fn default_snaplen() -> i32 {
    65535
}

fn default_promiscuous() -> bool {
    true
}

fn default_read_timeout_ms() -> i32 {
    1000
}

fn default_filter() -> String {
    "udp and port 53".to_string()
}
