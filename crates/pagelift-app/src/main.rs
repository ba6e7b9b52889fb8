// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagelift — photographed pages in, rectified scans out.
//
// Entry point. Initialises logging, parses arguments, runs one scan session
// and prints the JSON report.

mod cli;
mod session;

use std::process::ExitCode;

use clap::Parser;
use pagelift_core::error::Result;
use pagelift_core::human_errors::humanize_error;

use cli::Cli;
use session::ScanSession;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Pagelift starting");

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Scan failed");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.scan_config()?;
    let session = ScanSession::new(config, &cli.output_dir)?;
    let report = session.run(&cli.inputs).await?;

    let json = serde_json::to_string_pretty(&report)?;
    match &cli.report {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!(report = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
