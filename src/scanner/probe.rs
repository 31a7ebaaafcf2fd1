//! Probe outcome model and the prober abstraction.
//!
//! A prober turns one raw socket attempt into a reachability
//! classification. Ambiguous socket outcomes (timeout, refusal, ICMP
//! errors surfaced locally) are folded into the returned status and
//! never escape as errors; an `Err` from a prober means the probe could
//! not run at all and aborts the whole scan.

use crate::scanner::plan::ProbeTask;
use crate::types::{Port, ScanMethod};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::net::IpAddr;

/// Reachability classification of a probed port.
///
/// TCP probes produce `Open`, `Closed` or `Filtered`. UDP probes
/// produce `Open`, `OpenFiltered` or `ClosedFiltered`: without raw
/// ICMP inspection, silence on a UDP port cannot distinguish an open
/// service that ignored the probe from a firewall drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// Port is open (connection completed or a datagram came back).
    Open,
    /// Port is closed (connection actively refused).
    Closed,
    /// No response before the timeout, likely dropped by a firewall.
    Filtered,
    /// UDP silence: open but unresponsive, or filtered.
    #[serde(rename = "open|filtered")]
    OpenFiltered,
    /// UDP transport error: closed, or filtered with an ICMP reject.
    #[serde(rename = "closed|filtered")]
    ClosedFiltered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::OpenFiltered => write!(f, "open|filtered"),
            Self::ClosedFiltered => write!(f, "closed|filtered"),
        }
    }
}

/// The immutable outcome of a single port probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub method: ScanMethod,
    pub ip: IpAddr,
    pub port: Port,
    pub status: PortStatus,
}

impl ProbeResult {
    /// Build the result for a completed probe task.
    pub fn new(task: ProbeTask, status: PortStatus) -> Self {
        Self {
            method: task.method,
            ip: task.ip,
            port: task.port,
            status,
        }
    }
}

/// Trait for port prober implementations.
///
/// Each probe owns its socket exclusively for its lifetime; the socket
/// is released on every exit path. Implementations must bound their
/// blocking calls by their configured timeout so a cooperative
/// scheduler never lets one slow probe stall another past its deadline.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe one (method, port) pair and classify the outcome.
    async fn probe(&self, task: ProbeTask) -> io::Result<ProbeResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
        assert_eq!(PortStatus::OpenFiltered.to_string(), "open|filtered");
        assert_eq!(PortStatus::ClosedFiltered.to_string(), "closed|filtered");
    }

    #[test]
    fn test_status_serializes_with_pipe_names() {
        let json = serde_json::to_string(&PortStatus::OpenFiltered).unwrap();
        assert_eq!(json, "\"open|filtered\"");
        let json = serde_json::to_string(&PortStatus::ClosedFiltered).unwrap();
        assert_eq!(json, "\"closed|filtered\"");
    }
}
