//! TCP connect prober.
//!
//! Performs a full three-way handshake using the operating system's
//! socket API. Requires no privileges and is the most reliable probe
//! method, at the cost of being trivially visible to the target.

use crate::scanner::plan::ProbeTask;
use crate::scanner::probe::{PortStatus, Probe, ProbeResult};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// TCP connect prober.
///
/// Classification:
/// - handshake completes -> `Open`
/// - actively rejected at the transport layer -> `Closed`
/// - no response before the timeout -> `Filtered`
///
/// A single attempt is authoritative for one scan pass; retries belong
/// to a caller issuing a new scan.
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for TcpProber {
    async fn probe(&self, task: ProbeTask) -> io::Result<ProbeResult> {
        let addr = SocketAddr::new(task.ip, task.port.as_u16());

        let status = match timeout(self.timeout, TcpStream::connect(addr)).await {
            // Stream dropped immediately; the probe only cares that the
            // handshake completed.
            Ok(Ok(_stream)) => PortStatus::Open,
            Ok(Err(e)) => classify_connect_error(e)?,
            Err(_) => PortStatus::Filtered,
        };

        tracing::debug!(port = %task.port, %status, "tcp probe done");
        Ok(ProbeResult::new(task, status))
    }
}

/// Map a failed connect to a status, or propagate it as fatal.
///
/// Unreachable-network and permission errors count as `Filtered`: the
/// probe got no answer from the port itself, which is indistinguishable
/// from a firewall drop at this layer (a local firewall rule surfaces
/// as EACCES/EPERM on connect).
fn classify_connect_error(e: io::Error) -> io::Result<PortStatus> {
    use io::ErrorKind::*;
    match e.kind() {
        ConnectionRefused | ConnectionReset | ConnectionAborted => Ok(PortStatus::Closed),
        TimedOut | HostUnreachable | NetworkUnreachable | PermissionDenied => {
            Ok(PortStatus::Filtered)
        }
        _ => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, ScanMethod};
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::TcpListener;

    fn task(port: u16) -> ProbeTask {
        ProbeTask {
            method: ScanMethod::Tcp,
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: Port::new(port).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_open_port_on_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = TcpProber::new(Duration::from_millis(500));
        let result = prober.probe(task(port)).await.unwrap();
        assert_eq!(result.status, PortStatus::Open);
        assert_eq!(result.port.as_u16(), port);
    }

    #[tokio::test]
    async fn test_closed_port_on_loopback() {
        // Grab an ephemeral port, then release it so nothing listens.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = TcpProber::new(Duration::from_millis(500));
        let result = prober.probe(task(port)).await.unwrap();
        assert_eq!(result.status, PortStatus::Closed);
    }

    #[tokio::test]
    async fn test_unroutable_address_is_filtered() {
        // TEST-NET-1 (RFC 5737) is not routed; the connect should sit
        // silent until the timeout.
        let prober = TcpProber::new(Duration::from_millis(100));
        let result = prober
            .probe(ProbeTask {
                method: ScanMethod::Tcp,
                ip: "192.0.2.1".parse().unwrap(),
                port: Port::new(81).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(result.status, PortStatus::Filtered);
    }
}
