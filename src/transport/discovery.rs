//! # Discovery
//!
//! Hosts announce themselves by sending an [`Offer`] datagram to the discovery
//! port once per interval. Players listen on that port and take the first offer
//! that decodes; anything else on the port is dropped and listening goes on.
//!
//! Delivery is best-effort: a lost offer is simply replaced by the next one.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::net::UdpSocket;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, info, instrument, warn};

use crate::config::{DiscoveryConfig, DISCOVERY_BUFFER_SIZE};
use crate::core::message::{Offer, WireMessage};
use crate::error::Result;
use crate::utils::metrics::Metrics;

/// A host found through an offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredHost {
    /// Sender IP combined with the port carried in the offer
    pub address: SocketAddr,
    pub server_name: String,
}

/// Periodic sender of one fixed offer.
pub struct Announcer {
    socket: UdpSocket,
    target: SocketAddr,
    payload: Vec<u8>,
    interval: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl Announcer {
    /// Bind an ephemeral broadcast-capable socket that will send `offer` to the configured target.
    pub async fn bind(config: &DiscoveryConfig, offer: &Offer) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_broadcast(true)?;
        Ok(Self {
            socket,
            target: config.target()?,
            payload: offer.to_bytes(),
            interval: config.interval,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Send the offer every interval, forever. Send failures are logged and skipped.
    #[instrument(skip(self), fields(target = %self.target))]
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        info!("Broadcasting offers");
        while ticks.next().await.is_some() {
            match self.socket.send_to(&self.payload, self.target).await {
                Ok(_) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.offer_sent();
                    }
                }
                Err(e) => warn!(error = %e, "Failed to send offer"),
            }
        }
    }
}

/// Bind the listening side of discovery on `port` for all interfaces.
pub async fn bind_listener(port: u16) -> Result<UdpSocket> {
    let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
    Ok(socket)
}

/// Receive datagrams until one decodes as an offer; return that host.
#[instrument(skip(socket))]
pub async fn listen_for_offer(socket: &UdpSocket) -> Result<DiscoveredHost> {
    let mut buf = [0u8; DISCOVERY_BUFFER_SIZE];
    loop {
        let (len, from) = socket.recv_from(&mut buf).await?;
        match Offer::from_bytes(&buf[..len]) {
            Ok(offer) => {
                let host = DiscoveredHost {
                    address: SocketAddr::new(from.ip(), offer.port),
                    server_name: offer.server_name,
                };
                info!(server = %host.server_name, address = %host.address, "Received offer");
                return Ok(host);
            }
            Err(e) => {
                debug!(peer = %from, bytes = len, error = %e, "Ignoring datagram");
            }
        }
    }
}
