//! # Sounder - A Concurrent TCP/UDP Port Reachability Scanner
//!
//! Sounder probes a target host over a user-specified set of TCP and/or
//! UDP ports and classifies each port's reachability.
//!
//! ## Features
//!
//! - **TCP connect probes**: handshake completion, rejection, or
//!   timeout map to open / closed / filtered
//! - **UDP probes**: send-then-receive with honest ambiguous
//!   classifications (open|filtered, closed|filtered)
//! - **Bounded concurrency**: a fixed-size async worker pool with a
//!   strict one-result-per-task completion contract
//! - **Cancellation**: ctrl-c yields a well-formed partial report
//! - **Two output modes**: streaming text lines and batch JSON
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use sounder::scanner::{EngineConfig, ScanEngine, ScanPlan};
//! use sounder::types::ScanTarget;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target = ScanTarget::from_groups(
//!         "127.0.0.1".parse().unwrap(),
//!         vec!["T:22,80,443".parse().unwrap()],
//!     )
//!     .unwrap();
//!
//!     let engine = ScanEngine::new(EngineConfig::default()).unwrap();
//!     let report = engine.execute(ScanPlan::build(&target)).await.unwrap();
//!
//!     for result in &report.results {
//!         println!("{} port {} is {}", result.method, result.port, result.status);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - validated newtypes and the `ScanTarget` request value
//! - [`scanner`] - probers, scan plan, engine, and report assembly
//! - [`cli`] - clap argument surface producing a validated target
//! - [`output`] - text streaming and JSON rendering
//! - [`error`] - engine error types

pub mod cli;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use scanner::{
    EngineConfig, PortStatus, Probe, ProbeResult, ProbeTask, ScanEngine, ScanPlan, ScanReport,
};
pub use types::{MethodPorts, Port, ScanMethod, ScanTarget};
