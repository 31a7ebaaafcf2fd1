//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states
//! unrepresentable: an out-of-range port or an empty port set cannot
//! reach the scan engine.

mod port;
mod target;

pub use port::{Port, PortError, PortList};
pub use target::{MethodPorts, ScanMethod, ScanTarget, TargetError};
