use clap::{Args, Parser, Subcommand};
use herald::core::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "herald", version, about = "Announces smoothing pool blocks, bans and donations")]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the feeds and publish new events
    Run(RunArgs),
    /// Validate the configuration and print the ledger
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Run a single tick and exit
    #[arg(long)]
    pub once: bool,

    /// Log messages instead of posting them, the ledger file is left untouched
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Do not require publishing credentials
    #[arg(long)]
    pub skip_credentials: bool,
}
