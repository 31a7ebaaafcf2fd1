//! Scan engine: bounded concurrent execution of probe tasks.
//!
//! The engine runs probe tasks on an unordered future stream whose real
//! concurrency bound is a tokio `Semaphore`. Every submitted task
//! produces exactly one result, and the engine returns only once all
//! dispatched probes have finished or the scan aborts fatally. Probes
//! share no mutable state; the only shared structures are the semaphore
//! and the result sink, which is driven by a single collector loop.

pub mod plan;
pub mod probe;
pub mod report;
pub mod tcp;
pub mod udp;

use crate::error::{EngineError, EngineResult};
use crate::types::ScanMethod;
use futures::stream::{self, StreamExt};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub use plan::{ProbeTask, ScanPlan};
pub use probe::{PortStatus, Probe, ProbeResult};
pub use report::ScanReport;
pub use tcp::TcpProber;
pub use udp::UdpProber;

/// Default per-probe timeout.
///
/// Chosen to bound worst-case duration against filtered hosts; tune it
/// per scan with [`EngineConfig::timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// How many probe futures the execution stream keeps in flight.
/// Deliberately generous: the semaphore, not this buffer, is the real
/// concurrency bound.
const MAX_BUFFERED_PROBES: usize = 1000;

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of probes in flight simultaneously.
    pub concurrency: usize,
    /// Per-probe connect/receive deadline.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Number of available processing units, the default worker count.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1)
}

/// Selects the prober for a task by its scan method.
struct MethodDispatch {
    tcp: TcpProber,
    udp: UdpProber,
}

#[async_trait::async_trait]
impl Probe for MethodDispatch {
    async fn probe(&self, task: ProbeTask) -> io::Result<ProbeResult> {
        match task.method {
            ScanMethod::Tcp => self.tcp.probe(task).await,
            ScanMethod::Udp => self.udp.probe(task).await,
        }
    }
}

/// The scan controller.
///
/// Dispatches probe tasks to a bounded pool and collects their results.
/// Cloneable-by-construction state lives behind `Arc`s so worker tasks
/// can outlive the submission loop.
pub struct ScanEngine {
    concurrency: usize,
    prober: Arc<dyn Probe>,
    cancel: CancellationToken,
}

impl ScanEngine {
    /// Build an engine using the standard TCP and UDP probers.
    ///
    /// Fails fast on a zero concurrency value; no probe runs.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let timeout = config.timeout;
        Self::with_prober(
            config,
            Arc::new(MethodDispatch {
                tcp: TcpProber::new(timeout),
                udp: UdpProber::new(timeout),
            }),
        )
    }

    /// Build an engine around a custom prober. Used by tests to
    /// instrument scheduling without touching the network.
    pub fn with_prober(config: EngineConfig, prober: Arc<dyn Probe>) -> EngineResult<Self> {
        if config.concurrency == 0 {
            return Err(EngineError::InvalidConcurrency(config.concurrency));
        }
        Ok(Self {
            concurrency: config.concurrency,
            prober,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that cancels this scan when triggered.
    ///
    /// Cancellation stops submitting new tasks; in-flight probes finish
    /// within their own timeout and their results are kept.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute all tasks and return the assembled report.
    pub async fn execute(&self, tasks: Vec<ProbeTask>) -> EngineResult<ScanReport> {
        self.execute_streaming(tasks, |_| {}).await
    }

    /// Execute all tasks, invoking `on_result` once per completed probe
    /// in completion order, then return the assembled report.
    ///
    /// The callback sees exactly the results the report contains: on a
    /// fatal abort, probes that finish while the pool drains are both
    /// streamed and kept in the partial report.
    pub async fn execute_streaming<F>(
        &self,
        tasks: Vec<ProbeTask>,
        mut on_result: F,
    ) -> EngineResult<ScanReport>
    where
        F: FnMut(&ProbeResult),
    {
        let Some(first) = tasks.first() else {
            return Err(EngineError::EmptyPlan);
        };
        let ip = first.ip;
        let planned = tasks.len();
        let start = Instant::now();

        tracing::info!(%ip, probes = planned, concurrency = self.concurrency, "scan started");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let prober = Arc::clone(&self.prober);
        let cancel = self.cancel.clone();

        let mut probes = stream::iter(tasks)
            .map(move |task| {
                let semaphore = Arc::clone(&semaphore);
                let prober = Arc::clone(&prober);
                let cancel = cancel.clone();

                async move {
                    // The permit bounds how many probes block in their
                    // connect/receive call at once.
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("semaphore never closed");

                    // A task that has not started yet is dropped on
                    // cancellation; a task holding a permit runs to its
                    // own timeout.
                    if cancel.is_cancelled() {
                        return Ok(None);
                    }

                    prober.probe(task).await.map(Some)
                }
            })
            // High buffering; the semaphore controls how many probes
            // actually reach their socket call.
            .buffer_unordered(self.concurrency.max(MAX_BUFFERED_PROBES));

        let mut results = Vec::with_capacity(planned);
        let mut fatal: Option<io::Error> = None;

        while let Some(outcome) = probes.next().await {
            match outcome {
                Ok(Some(result)) => {
                    // Probes that were already in flight when a fatal
                    // error hit still stream: every result in the
                    // partial report has been seen by the callback.
                    on_result(&result);
                    results.push(result);
                }
                // Skipped after cancellation: no result by contract.
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "probe failed fatally, aborting scan");
                    if fatal.is_none() {
                        fatal = Some(e);
                    }
                    // Stop the remaining queue; in-flight probes drain.
                    self.cancel.cancel();
                }
            }
        }

        let cancelled = fatal.is_none() && self.cancel.is_cancelled();
        let report = ScanReport::assemble(ip, results, planned, cancelled, start.elapsed());

        tracing::info!(
            results = report.results.len(),
            cancelled,
            duration_ms = report.duration_ms,
            "scan finished"
        );

        match fatal {
            Some(source) => Err(EngineError::Aborted {
                partial: Box::new(report),
                source,
            }),
            None => Ok(report),
        }
    }
}
