//! Command-line argument surface.
//!
//! Validation happens here and in the `types` constructors; the engine
//! only ever sees an already-validated `ScanTarget`. Name resolution is
//! deliberately unsupported: the target must be an IP literal.

use crate::scanner::{default_concurrency, EngineConfig, DEFAULT_TIMEOUT};
use crate::types::{MethodPorts, ScanTarget, TargetError};
use clap::Parser;
use std::net::IpAddr;
use std::time::Duration;

/// Sounder - a concurrent TCP/UDP port reachability scanner.
#[derive(Parser, Debug)]
#[command(name = "sounder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP/UDP port reachability scanner", long_about = None)]
pub struct Cli {
    /// Target IP address (IPv4 or IPv6 literal, no hostnames)
    #[arg(value_name = "IP")]
    pub ip: IpAddr,

    /// Ports to probe, grouped by method: "T:22,80,443" or "U:53,123"
    ///
    /// Lists accept ranges ("T:8000-8010"). Repeat the flag to scan
    /// both methods; giving the same method twice is an error.
    #[arg(short = 'p', long = "ports", value_name = "GROUP", required = true)]
    pub ports: Vec<MethodPorts>,

    /// Number of probes in flight at once [default: available CPU cores]
    #[arg(short = 'T', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Per-probe timeout in milliseconds
    #[arg(
        short = 't',
        long = "timeout",
        value_name = "MS",
        default_value_t = DEFAULT_TIMEOUT.as_millis() as u64
    )]
    pub timeout_ms: u64,

    /// Emit the full report as JSON instead of streaming text lines
    #[arg(long)]
    pub json: bool,

    /// Enable verbose (debug-level) logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Assemble the validated scan target from the parsed arguments.
    pub fn target(&self) -> Result<ScanTarget, TargetError> {
        ScanTarget::from_groups(self.ip, self.ports.clone())
    }

    /// Engine tunables derived from the arguments.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            concurrency: self.threads.unwrap_or_else(default_concurrency),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanMethod;

    #[test]
    fn test_parse_minimal_invocation() {
        let cli = Cli::parse_from(["sounder", "127.0.0.1", "-p", "T:22,80"]);
        assert_eq!(cli.ip.to_string(), "127.0.0.1");
        let target = cli.target().unwrap();
        assert_eq!(target.probe_count(), 2);
    }

    #[test]
    fn test_parse_both_methods_and_options() {
        let cli = Cli::parse_from([
            "sounder", "::1", "-p", "U:53", "-p", "T:443", "--threads", "8", "--timeout", "250",
            "--json",
        ]);
        let target = cli.target().unwrap();
        assert_eq!(target.probe_count(), 2);
        assert!(cli.json);
        let config = cli.engine_config();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_timeout_defaults_to_engine_constant() {
        let cli = Cli::parse_from(["sounder", "127.0.0.1", "-p", "T:80"]);
        assert_eq!(cli.engine_config().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_duplicate_method_group_is_an_error() {
        let cli = Cli::parse_from(["sounder", "127.0.0.1", "-p", "T:22", "-p", "T:80"]);
        assert!(matches!(
            cli.target(),
            Err(TargetError::DuplicateMethod(ScanMethod::Tcp))
        ));
    }

    #[test]
    fn test_rejects_non_ip_target() {
        assert!(Cli::try_parse_from(["sounder", "example.com", "-p", "T:80"]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["sounder", "127.0.0.1", "-p", "T:0"]).is_err());
        assert!(Cli::try_parse_from(["sounder", "127.0.0.1", "-p", "T:65536"]).is_err());
    }
}
