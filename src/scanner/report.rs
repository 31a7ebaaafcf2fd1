//! Report assembly.
//!
//! Merges completed probe results into the consumer-facing report.
//! Results are sorted by (method, port) ascending, so both the text
//! renderer and JSON consumers see the same stable order regardless of
//! completion order. Downstream consumers may rely on that ordering.

use crate::scanner::probe::{PortStatus, ProbeResult};
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;

/// The finalized result set for one scan invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub ip: IpAddr,
    /// Number of tasks submitted to the engine. Equals `results.len()`
    /// unless the scan was cancelled or aborted.
    pub probes_planned: usize,
    pub open: usize,
    pub closed: usize,
    pub filtered: usize,
    pub ambiguous: usize,
    pub duration_ms: u64,
    pub cancelled: bool,
    pub results: Vec<ProbeResult>,
}

impl ScanReport {
    /// Freeze a batch of results into a report.
    pub fn assemble(
        ip: IpAddr,
        mut results: Vec<ProbeResult>,
        probes_planned: usize,
        cancelled: bool,
        duration: Duration,
    ) -> Self {
        results.sort_by_key(|r| (r.method, r.port));

        let mut open = 0;
        let mut closed = 0;
        let mut filtered = 0;
        let mut ambiguous = 0;
        for result in &results {
            match result.status {
                PortStatus::Open => open += 1,
                PortStatus::Closed => closed += 1,
                PortStatus::Filtered => filtered += 1,
                PortStatus::OpenFiltered | PortStatus::ClosedFiltered => ambiguous += 1,
            }
        }

        Self {
            ip,
            probes_planned,
            open,
            closed,
            filtered,
            ambiguous,
            duration_ms: duration.as_millis() as u64,
            cancelled,
            results,
        }
    }

    /// True when every planned probe produced a result.
    pub fn is_complete(&self) -> bool {
        self.results.len() == self.probes_planned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, ScanMethod};
    use std::net::Ipv4Addr;

    fn result(method: ScanMethod, port: u16, status: PortStatus) -> ProbeResult {
        ProbeResult {
            method,
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: Port::new(port).unwrap(),
            status,
        }
    }

    #[test]
    fn test_results_sorted_by_method_then_port() {
        let report = ScanReport::assemble(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            vec![
                result(ScanMethod::Udp, 53, PortStatus::OpenFiltered),
                result(ScanMethod::Tcp, 443, PortStatus::Open),
                result(ScanMethod::Tcp, 22, PortStatus::Closed),
            ],
            3,
            false,
            Duration::from_millis(10),
        );

        let order: Vec<(ScanMethod, u16)> = report
            .results
            .iter()
            .map(|r| (r.method, r.port.as_u16()))
            .collect();
        assert_eq!(
            order,
            vec![
                (ScanMethod::Tcp, 22),
                (ScanMethod::Tcp, 443),
                (ScanMethod::Udp, 53),
            ]
        );
        assert!(report.is_complete());
    }

    #[test]
    fn test_status_counts() {
        let report = ScanReport::assemble(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            vec![
                result(ScanMethod::Tcp, 1, PortStatus::Open),
                result(ScanMethod::Tcp, 2, PortStatus::Closed),
                result(ScanMethod::Tcp, 3, PortStatus::Filtered),
                result(ScanMethod::Udp, 4, PortStatus::OpenFiltered),
                result(ScanMethod::Udp, 5, PortStatus::ClosedFiltered),
            ],
            5,
            false,
            Duration::ZERO,
        );
        assert_eq!(
            (report.open, report.closed, report.filtered, report.ambiguous),
            (1, 1, 1, 2)
        );
    }

    #[test]
    fn test_partial_report_is_not_complete() {
        let report = ScanReport::assemble(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            vec![result(ScanMethod::Tcp, 1, PortStatus::Open)],
            10,
            true,
            Duration::ZERO,
        );
        assert!(!report.is_complete());
        assert!(report.cancelled);
    }
}
