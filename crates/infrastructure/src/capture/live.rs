use super::frame;
use dns_sentry_domain::{wire, CaptureConfig, DomainError};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Live DNS sniffer feeding query names into the ingress channel.
///
/// The pcap read loop is blocking, so it runs on a dedicated blocking
/// task; the read timeout doubles as the cancellation poll interval.
pub struct CaptureLoop {
    device: String,
    handle: pcap::Capture<pcap::Active>,
    ingress: UnboundedSender<String>,
    shutdown: CancellationToken,
}

impl CaptureLoop {
    /// Opens the device and applies the BPF filter. A failure here is
    /// fatal to startup; nothing can be observed without a handle.
    pub fn open(
        device: &str,
        config: &CaptureConfig,
        ingress: UnboundedSender<String>,
        shutdown: CancellationToken,
    ) -> Result<Self, DomainError> {
        let mut handle = pcap::Capture::from_device(device)
            .map_err(|e| DomainError::CaptureFailed(format!("open '{device}': {e}")))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .timeout(config.read_timeout_ms)
            .open()
            .map_err(|e| DomainError::CaptureFailed(format!("activate '{device}': {e}")))?;

        handle
            .filter(&config.filter, true)
            .map_err(|e| DomainError::CaptureFailed(format!("filter '{}': {e}", config.filter)))?;

        Ok(Self {
            device: device.to_string(),
            handle,
            ingress,
            shutdown,
        })
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.run())
    }

    fn run(mut self) {
        info!(device = %self.device, "Capture started");

        while !self.shutdown.is_cancelled() {
            match self.handle.next_packet() {
                Ok(packet) => {
                    let Some(payload) = frame::dns_payload(packet.data) else {
                        continue;
                    };
                    for domain in wire::extract_queries(&payload) {
                        if self.ingress.send(domain).is_err() {
                            // Receiver gone; the pipeline is shutting down.
                            return;
                        }
                    }
                }
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => {
                    error!(error = %e, device = %self.device, "Capture read failed");
                    break;
                }
            }
        }

        info!(device = %self.device, "Capture stopped");
    }
}
