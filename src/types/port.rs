//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers
//! (1-65535). `PortList` handles the comma-separated list syntax used
//! on the command line, including `a-b` ranges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values and
/// guarantees the engine never sees port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Create a Port without validation. Use only when the value is known valid.
    #[inline]
    pub const fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value as u32))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        if raw < Self::MIN as u32 || raw > Self::MAX as u32 {
            return Err(PortError::OutOfRange(raw));
        }
        Ok(Self(raw as u16))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port list")]
    Empty,
}

/// A de-duplicated, ordered set of ports parsed from a list expression.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "22,80,443"
/// - Range: "8000-8010"
/// - Mixed: "22,80,443,8000-8010"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortList {
    ports: BTreeSet<Port>,
}

impl PortList {
    /// Create an empty port list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single port.
    pub fn insert(&mut self, port: Port) {
        self.ports.insert(port);
    }

    /// Number of unique ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Consume into the underlying ordered set.
    pub fn into_set(self) -> BTreeSet<Port> {
        self.ports
    }
}

impl FromIterator<Port> for PortList {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        Self {
            ports: iter.into_iter().collect(),
        }
    }
}

impl FromStr for PortList {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut list = Self::new();

        for part in s.split(',') {
            let part = part.trim();
            if let Some((lo, hi)) = part.split_once('-') {
                let start: Port = lo.parse()?;
                let end: Port = hi.parse()?;
                if start > end {
                    return Err(PortError::InvalidRange(start.as_u16(), end.as_u16()));
                }
                for p in start.as_u16()..=end.as_u16() {
                    list.insert(Port::new_unchecked(p));
                }
            } else {
                list.insert(part.parse()?);
            }
        }

        if list.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(list)
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
