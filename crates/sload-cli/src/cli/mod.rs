//! CLI for the sload resource loader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sload_core::config;

use commands::{run_config, run_load, run_modes, LoadArgs};

/// Top-level CLI for sload.
#[derive(Debug, Parser)]
#[command(name = "sload")]
#[command(about = "sload: load resources through settings-driven modes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load one or more resources.
    Load {
        /// URLs, or `key=value` options applied to the URLs after them.
        /// Values are parsed as JSON, falling back to a plain string.
        #[arg(required = true, value_name = "ARG")]
        args: Vec<String>,

        /// Pin a mode instead of picking one from each URL.
        #[arg(long)]
        mode: Option<String>,

        /// Extra request header, e.g. "Accept: application/json". Repeatable.
        #[arg(long = "header", value_name = "K: V")]
        headers: Vec<String>,

        /// Accept option values without running their validators.
        #[arg(long)]
        no_validate: bool,
    },

    /// List registered modes and the options they add.
    Modes,

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Load {
                args,
                mode,
                headers,
                no_validate,
            } => run_load(
                &cfg,
                &LoadArgs {
                    args,
                    mode,
                    headers,
                    no_validate,
                },
            )?,
            CliCommand::Modes => run_modes(&cfg)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
