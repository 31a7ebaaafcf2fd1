//! Scan target types.
//!
//! A `ScanTarget` is the validated request the engine operates on: a
//! resolved IP address plus a per-method set of ports. Construction is
//! the validation boundary; once built, the value is immutable and the
//! engine can assume every invariant holds.

use crate::types::port::{Port, PortError, PortList};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Protocol used to probe a port.
///
/// `Ord` follows declaration order, which fixes the method grouping
/// used for report ordering (TCP before UDP).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanMethod {
    Tcp,
    Udp,
}

impl fmt::Display for ScanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

impl FromStr for ScanMethod {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" | "t" => Ok(Self::Tcp),
            "udp" | "u" => Ok(Self::Udp),
            _ => Err(TargetError::UnknownMethod(s.to_string())),
        }
    }
}

/// Error type for target construction and `--ports` group parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("unknown scan method: {0}")]
    UnknownMethod(String),
    #[error("invalid ports group '{0}': expected T:<ports> or U:<ports>")]
    InvalidGroup(String),
    #[error("{0} ports given more than once")]
    DuplicateMethod(ScanMethod),
    #[error("no ports to scan")]
    NoPorts,
    #[error(transparent)]
    Port(#[from] PortError),
}

/// One `--ports` group: a scan method and the ports to probe with it.
///
/// Parsed from the `T:22,80,443` / `U:53,123` syntax. Ranges are
/// accepted inside the list (`T:8000-8010`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPorts {
    pub method: ScanMethod,
    pub ports: PortList,
}

impl FromStr for MethodPorts {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, list) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TargetError::InvalidGroup(s.to_string()))?;
        let method: ScanMethod = prefix.parse()?;
        let ports: PortList = list.parse()?;
        Ok(Self { method, ports })
    }
}

/// A validated scan request: one IP and a non-empty port set per method.
///
/// Invariants enforced at construction:
/// - at least one method is present;
/// - every present method maps to at least one port.
///
/// A method absent from the mapping is simply not scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    ip: IpAddr,
    methods_ports: BTreeMap<ScanMethod, BTreeSet<Port>>,
}

impl ScanTarget {
    /// Build a target from an already-validated method-to-ports mapping.
    pub fn new(
        ip: IpAddr,
        methods_ports: BTreeMap<ScanMethod, BTreeSet<Port>>,
    ) -> Result<Self, TargetError> {
        if methods_ports.is_empty() || methods_ports.values().any(BTreeSet::is_empty) {
            return Err(TargetError::NoPorts);
        }
        Ok(Self { ip, methods_ports })
    }

    /// Build a target from parsed `--ports` groups.
    ///
    /// Giving two groups for the same method is rejected rather than
    /// merged, so a repeated flag surfaces as a usage mistake.
    pub fn from_groups(ip: IpAddr, groups: Vec<MethodPorts>) -> Result<Self, TargetError> {
        let mut methods_ports: BTreeMap<ScanMethod, BTreeSet<Port>> = BTreeMap::new();
        for group in groups {
            if methods_ports.contains_key(&group.method) {
                return Err(TargetError::DuplicateMethod(group.method));
            }
            methods_ports.insert(group.method, group.ports.into_set());
        }
        Self::new(ip, methods_ports)
    }

    /// The target IP address.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Methods to scan, in stable (TCP-first) order.
    pub fn methods(&self) -> impl Iterator<Item = ScanMethod> + '_ {
        self.methods_ports.keys().copied()
    }

    /// Ports for one method, ascending; empty iterator if the method is
    /// not part of this scan.
    pub fn ports(&self, method: ScanMethod) -> impl Iterator<Item = Port> + '_ {
        self.methods_ports
            .get(&method)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Total number of (method, port) pairs.
    pub fn probe_count(&self) -> usize {
        self.methods_ports.values().map(BTreeSet::len).sum()
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} probes)", self.ip, self.probe_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn localhost() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    #[test]
    fn test_method_ports_parsing() {
        let group: MethodPorts = "T:22,80,443".parse().unwrap();
        assert_eq!(group.method, ScanMethod::Tcp);
        assert_eq!(group.ports.len(), 3);

        let group: MethodPorts = "U:53".parse().unwrap();
        assert_eq!(group.method, ScanMethod::Udp);
        assert_eq!(group.ports.len(), 1);

        assert!("22,80".parse::<MethodPorts>().is_err());
        assert!("X:22".parse::<MethodPorts>().is_err());
        assert!("T:".parse::<MethodPorts>().is_err());
    }

    #[test]
    fn test_target_requires_ports() {
        assert!(matches!(
            ScanTarget::new(localhost(), BTreeMap::new()),
            Err(TargetError::NoPorts)
        ));

        let mut empty_tcp = BTreeMap::new();
        empty_tcp.insert(ScanMethod::Tcp, BTreeSet::new());
        assert!(matches!(
            ScanTarget::new(localhost(), empty_tcp),
            Err(TargetError::NoPorts)
        ));
    }

    #[test]
    fn test_target_from_groups() {
        let target = ScanTarget::from_groups(
            localhost(),
            vec![
                "T:22,80".parse().unwrap(),
                "U:53,123".parse().unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(target.probe_count(), 4);
        let methods: Vec<ScanMethod> = target.methods().collect();
        assert_eq!(methods, vec![ScanMethod::Tcp, ScanMethod::Udp]);
        let tcp_ports: Vec<u16> = target.ports(ScanMethod::Tcp).map(Port::as_u16).collect();
        assert_eq!(tcp_ports, vec![22, 80]);
    }

    #[test]
    fn test_target_rejects_duplicate_method() {
        let result = ScanTarget::from_groups(
            localhost(),
            vec!["T:22".parse().unwrap(), "T:80".parse().unwrap()],
        );
        assert!(matches!(result, Err(TargetError::DuplicateMethod(ScanMethod::Tcp))));
    }

    #[test]
    fn test_absent_method_yields_no_ports() {
        let target =
            ScanTarget::from_groups(localhost(), vec!["T:22".parse().unwrap()]).unwrap();
        assert_eq!(target.ports(ScanMethod::Udp).count(), 0);
    }
}
