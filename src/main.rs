//! Sounder binary entry point.
//!
//! The outermost boundary: parses arguments, wires ctrl-c into the
//! engine's cancellation token, and maps outcomes to exit codes
//! (0 success or cancelled, 1 fatal abort, 2 configuration error).

use clap::Parser;
use sounder::cli::Cli;
use sounder::error::EngineError;
use sounder::output;
use sounder::scanner::{ScanEngine, ScanPlan, ScanReport};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let target = match cli.target() {
        Ok(target) => target,
        Err(e) => {
            output::print_error(&e.to_string());
            return ExitCode::from(2);
        }
    };

    let engine = match ScanEngine::new(cli.engine_config()) {
        Ok(engine) => engine,
        Err(e) => {
            output::print_error(&e.to_string());
            return ExitCode::from(2);
        }
    };

    // Ctrl-c cancels the scan; in-flight probes finish within their
    // own timeout and the partial report is still rendered.
    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let tasks = ScanPlan::build(&target);

    let outcome = if cli.json {
        engine.execute(tasks).await
    } else {
        output::print_header();
        engine.execute_streaming(tasks, output::print_result_line).await
    };

    match outcome {
        Ok(report) => {
            render(&report, cli.json);
            ExitCode::SUCCESS
        }
        Err(EngineError::Aborted { partial, source }) => {
            render(&partial, cli.json);
            output::print_error(&format!("scan aborted: {source}"));
            ExitCode::FAILURE
        }
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::from(2)
        }
    }
}

fn render(report: &ScanReport, json: bool) {
    if json {
        if let Err(e) = output::print_json(report) {
            output::print_error(&format!("failed to write report: {e}"));
        }
    } else {
        output::print_summary(report);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sounder=debug" } else { "sounder=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
