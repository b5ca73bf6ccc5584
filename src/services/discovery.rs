//! LAN discovery of timer servers over UDP broadcast

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use thiserror::Error;
use tokio::{
    net::UdpSocket,
    time::{timeout_at, Instant},
};
use tracing::{debug, info};

use crate::endpoint::Endpoint;

pub const DISCOVERY_REQUEST: &[u8] = b"POKER_TIMER_DISCOVERY";
pub const DISCOVERY_REPLY: &str = "POKER_TIMER_SERVER";
pub const DISCOVERY_PORT: u16 = 8888;
/// Port the timer HTTP server listens on
pub const SERVER_HTTP_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to send the discovery request and how long to listen for replies
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub target: SocketAddr,
    pub listen_for: Duration,
    pub server_port: u16,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            target: SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), DISCOVERY_PORT),
            listen_for: Duration::from_millis(3000),
            server_port: SERVER_HTTP_PORT,
        }
    }
}

/// Broadcast a discovery request and collect every server that answers
/// before the listening window closes. Duplicates are dropped; order is
/// the order replies arrived in.
pub async fn discover_servers(config: &DiscoveryConfig) -> Result<Vec<Endpoint>, DiscoveryError> {
    let bind_addr = match config.target.ip() {
        IpAddr::V4(ip) if ip.is_loopback() => SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        _ => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.set_broadcast(true)?;

    debug!("Sending discovery request to {}", config.target);
    socket.send_to(DISCOVERY_REQUEST, config.target).await?;

    let deadline = Instant::now() + config.listen_for;
    let mut found = Vec::new();
    let mut buf = [0u8; 1024];

    // Elapsed deadline ends the loop
    while let Ok(received) = timeout_at(deadline, socket.recv_from(&mut buf)).await {
        let (len, from) = received?;
        match parse_reply(&buf[..len], from, config.server_port) {
            Some(endpoint) if !found.contains(&endpoint) => {
                info!("Found timer server at {}", endpoint);
                found.push(endpoint);
            }
            Some(_) => {}
            None => debug!("Ignoring unexpected discovery reply from {}", from),
        }
    }

    debug!("Discovery finished with {} server(s)", found.len());
    Ok(found)
}

/// Turn a discovery reply into the endpoint of the server that sent it
pub fn parse_reply(payload: &[u8], from: SocketAddr, server_port: u16) -> Option<Endpoint> {
    let text = std::str::from_utf8(payload).ok()?;
    if text.trim() != DISCOVERY_REPLY {
        return None;
    }

    let host = match from.ip() {
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{}]", ip),
    };
    Endpoint::parse(&format!("http://{}:{}", host, server_port)).ok()
}
