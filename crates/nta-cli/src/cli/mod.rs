//! CLI for the NTA traffic-document analyzer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nta_core::config;

use commands::{run_aggregate, run_checksum};

/// Top-level CLI for the NTA traffic-document analyzer.
#[derive(Debug, Parser)]
#[command(name = "nta")]
#[command(about = "NTA: fetch JSON traffic documents and analyze them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the telemetry document and aggregate sent/recv totals per field.
    Aggregate {
        /// Document URL (defaults to aggregate_url from config).
        #[arg(long)]
        url: Option<String>,
    },

    /// Fetch the items document and hash each item on the worker pool.
    Checksum {
        /// Document URL (defaults to items_url from config).
        #[arg(long)]
        url: Option<String>,

        /// Requested worker count (capped at 3; the first use fixes the pool size).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            Some(CliCommand::Aggregate { url }) => run_aggregate(&cfg, url.as_deref())?,
            Some(CliCommand::Checksum { url, workers }) => {
                run_checksum(&cfg, url.as_deref(), workers)?;
            }
            // No subcommand: run both analyses in sequence.
            None => {
                run_aggregate(&cfg, None)?;
                run_checksum(&cfg, None, None)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
