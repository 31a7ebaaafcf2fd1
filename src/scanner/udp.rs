//! UDP prober.
//!
//! Sends a single empty datagram and waits for any response. UDP is
//! connectionless and response-optional, so most outcomes are
//! ambiguous by nature:
//!
//! 1. a datagram comes back -> port is open (rare: most services
//!    ignore an empty payload, so `Open` under-reports by design);
//! 2. an ICMP port-unreachable surfaces as a local socket error ->
//!    `closed|filtered`;
//! 3. silence until the timeout -> `open|filtered`.
//!
//! No per-service payloads are sent; one generic probe covers every
//! port.

use crate::scanner::plan::ProbeTask;
use crate::scanner::probe::{PortStatus, Probe, ProbeResult};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// UDP send-then-receive prober.
pub struct UdpProber {
    timeout: Duration,
}

impl UdpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn probe_port(&self, task: ProbeTask) -> io::Result<PortStatus> {
        let addr = SocketAddr::new(task.ip, task.port.as_u16());

        // Ephemeral local port, family matching the target.
        let local: SocketAddr = if task.ip.is_ipv4() {
            "0.0.0.0:0".parse().expect("literal addr")
        } else {
            "[::]:0".parse().expect("literal addr")
        };

        // A bind failure is resource exhaustion, not a property of the
        // target port; it propagates and aborts the scan.
        let socket = UdpSocket::bind(local).await?;
        socket.connect(addr).await?;

        if let Err(e) = socket.send(&[]).await {
            return classify_transport_error(e);
        }

        let mut buf = [0u8; 1024];
        match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => Ok(PortStatus::Open),
            Ok(Err(e)) => classify_transport_error(e),
            Err(_) => Ok(PortStatus::OpenFiltered),
        }
    }
}

#[async_trait]
impl Probe for UdpProber {
    async fn probe(&self, task: ProbeTask) -> io::Result<ProbeResult> {
        let status = self.probe_port(task).await?;
        tracing::debug!(port = %task.port, %status, "udp probe done");
        Ok(ProbeResult::new(task, status))
    }
}

/// Map a send/recv error to a status, or propagate it as fatal.
///
/// On a connected UDP socket, a pending ICMP port-unreachable is
/// delivered as ECONNREFUSED on the next send or recv.
fn classify_transport_error(e: io::Error) -> io::Result<PortStatus> {
    use io::ErrorKind::*;
    match e.kind() {
        ConnectionRefused | ConnectionReset | ConnectionAborted | HostUnreachable
        | NetworkUnreachable | PermissionDenied => Ok(PortStatus::ClosedFiltered),
        _ => Err(e),
    }
}
