mod address;
mod cli;
mod output;

use std::io;

use anyhow::{Context, Result};
use bsef_core::{Error, scan_input};
use clap::Parser;
use cli::Args;
use output::MatchWriter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (RUST_LOG overrides; --verbose lowers the default to debug)
    let default_filter = if args.verbose {
        "bsef=debug,bsef_core=debug"
    } else {
        "bsef=warn,bsef_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config = args.to_config();
    let mut writer = MatchWriter::new(io::stdout().lock(), args.json);

    let summary = match scan_input(&config, |offset| writer.emit(offset)) {
        Ok(summary) => summary,
        Err(e) => {
            // Matches printed before an I/O error stay valid.
            if let Err(flush_err) = writer.finish() {
                warn!("Failed to flush matches: {}", flush_err);
            }
            let context = if e.is_config_error() {
                "Invalid configuration".to_string()
            } else if matches!(e, Error::ReportFailed { .. }) {
                "Failed to write matches".to_string()
            } else {
                format!("Failed to scan {}", config.input)
            };
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    writer.finish().context("Failed to write matches")?;
    info!(
        "{} matches in 0x{:X}..0x{:X} ({} bytes read, {} refills)",
        summary.matches,
        summary.window.start,
        summary.window.end,
        summary.bytes_read,
        summary.refills
    );

    Ok(())
}
