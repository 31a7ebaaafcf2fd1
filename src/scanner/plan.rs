//! Scan plan: expansion of a target into independent probe tasks.

use crate::types::{Port, ScanMethod, ScanTarget};
use std::net::IpAddr;

/// One unit of work for the engine: a single (method, port) probe.
///
/// Tasks are independent and order-insensitive; no task depends on
/// another's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeTask {
    pub method: ScanMethod,
    pub ip: IpAddr,
    pub port: Port,
}

/// Expands a `ScanTarget` into an ordered task list.
pub struct ScanPlan;

impl ScanPlan {
    /// Flatten the target into one task per (method, port) pair.
    ///
    /// Enumeration order is stable: methods in TCP-first order, ports
    /// ascending within each method. Dispatch to the worker pool does
    /// not preserve this order; only the final report does.
    pub fn build(target: &ScanTarget) -> Vec<ProbeTask> {
        let ip = target.ip();
        let mut tasks = Vec::with_capacity(target.probe_count());
        for method in target.methods() {
            for port in target.ports(method) {
                tasks.push(ProbeTask { method, ip, port });
            }
        }
        tasks
    }
}
