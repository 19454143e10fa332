use std::net::SocketAddr;

use super::BODY_OVERHEAD_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // Upper bound on request bodies, blob limit plus JSON envelope
    pub max_body_bytes: usize,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, max_blob_bytes: usize) -> Self {
        let max_body_bytes = max_blob_bytes.saturating_add(BODY_OVERHEAD_BYTES);
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, max_body_bytes={}",
            listen_addr,
            max_body_bytes
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            max_body_bytes,
        }
    }
}

impl From<&crate::Config> for Config {
    fn from(service: &crate::Config) -> Self {
        Self::new(service.listen_addr, service.max_blob_bytes)
    }
}
