//! Kestrel - Single-Endpoint Web Security Scanner CLI

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use kestrel::config;
use kestrel::models::Severity;
use kestrel::report;
use kestrel::scanner::delegated::DelegatedProbe;
use kestrel::scanner::ScanEngine;

/// Kestrel - probe a web endpoint for common security misconfigurations
#[derive(Parser)]
#[command(name = "kestrel", version, about, long_about = None)]
struct Cli {
    /// Target URL to scan (http or https)
    target: String,

    /// Print the full result as JSON instead of the filtered report
    #[arg(long)]
    json: bool,

    /// Also run the delegated active scanner (requires a ZAP daemon)
    #[arg(long)]
    zap: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full result as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Severity floor for human-readable output (info, low, medium, high, critical)
    #[arg(long = "min-sev")]
    min_sev: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "kestrel=debug"
    } else {
        "kestrel=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut scan_config = config::load_config(cli.config.as_deref());
    if let Some(ref min_sev) = cli.min_sev {
        scan_config.min_severity = Severity::from_label(min_sev);
    }

    let mut engine = ScanEngine::with_defaults();
    if cli.zap {
        engine.register(Arc::new(DelegatedProbe));
    }

    let result = match engine.run(&cli.target, &scan_config).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {e}", "Scan failed:".red().bold());
            std::process::exit(1);
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = report::json::export(&result, path) {
            eprintln!("{} {e}", "Could not write report:".red().bold());
            std::process::exit(1);
        }
    }

    if cli.json {
        match report::json::render(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{} {e}", "Could not serialize result:".red().bold());
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report::text::render(&result, scan_config.min_severity));
    }

    if result.summary.critical_count > 0 {
        std::process::exit(2);
    }
}
