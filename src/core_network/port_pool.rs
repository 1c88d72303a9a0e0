use crate::config::DataConfig;
use crate::core_network::error::DataError;
use log::{debug, info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Range of ports handed out to passive data listeners.
///
/// Shared by every session through an `Arc`. A port counts as allocated for
/// as long as the returned listener is alive: the OS refuses a second bind,
/// and scans are serialized by `scan_lock` so that two sessions never race
/// through the range at the same time.
#[derive(Debug)]
pub struct PortPool {
    bind_address: Ipv4Addr,
    min_port: u16,
    max_port: u16,
    retries: u32,
    retry_delay: Duration,
    scan_lock: Mutex<()>,
}

impl PortPool {
    pub fn new(
        bind_address: Ipv4Addr,
        min_port: u16,
        max_port: u16,
        retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            bind_address,
            min_port,
            max_port,
            retries,
            retry_delay,
            scan_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(
            config.bind_address,
            config.min_port,
            config.max_port,
            config.passive_retries,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    pub fn range(&self) -> (u16, u16) {
        (self.min_port, self.max_port)
    }

    /// Binds the first free port of `[min_port, max_port)`.
    ///
    /// A busy port is skipped. When the whole range is busy the scan is
    /// repeated up to `retries` more times, pausing `retry_delay` between
    /// scans, before giving up with [`DataError::PortPoolExhausted`].
    pub async fn acquire(&self) -> Result<(TcpListener, u16), DataError> {
        let attempts = self.retries.saturating_add(1);
        for attempt in 0..attempts {
            if attempt > 0 {
                warn!(
                    "All ports in [{}, {}) are occupied. Retrying ({}/{})...",
                    self.min_port, self.max_port, attempt, self.retries
                );
                tokio::time::sleep(self.retry_delay).await;
            }

            if let Some(found) = self.scan().await {
                return Ok(found);
            }
        }

        Err(DataError::PortPoolExhausted {
            min: self.min_port,
            max: self.max_port,
            attempts,
        })
    }

    async fn scan(&self) -> Option<(TcpListener, u16)> {
        let _guard = self.scan_lock.lock().await;
        for port in self.min_port..self.max_port {
            match TcpListener::bind(SocketAddrV4::new(self.bind_address, port)).await {
                Ok(listener) => {
                    info!("Listening on port {}", port);
                    return Some((listener, port));
                }
                Err(e) => debug!("Port {} is occupied: {}", port, e),
            }
        }
        None
    }
}
