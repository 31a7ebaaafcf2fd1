//! Error types for sounder.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe
//! ambiguity is never an error; only configuration faults and fatal
//! execution faults reach these types.

use crate::scanner::ScanReport;
use std::io;
use thiserror::Error;

/// Faults surfaced by the scan engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error: detected before any probe runs.
    #[error("invalid concurrency: {0} (must be a positive integer)")]
    InvalidConcurrency(usize),

    /// Configuration error: the task list was empty.
    #[error("nothing to scan: empty task list")]
    EmptyPlan,

    /// A probe failed in a non-classifiable way (e.g. descriptor
    /// exhaustion). Carries the results gathered before the abort.
    #[error("scan aborted: {source}")]
    Aborted {
        partial: Box<ScanReport>,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
