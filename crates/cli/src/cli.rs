// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Get started:
  mnemo config                       Show the resolved settings
  mnemo check                        Probe the configured store
  mnemo check --host db --port 9000  Probe another endpoint";

#[derive(Parser, Debug)]
#[command(name = "mnemo")]
#[command(about = "Terminal client for a remote knowledge store")]
#[command(
    long_about = "Terminal client for a remote knowledge store.\n\n\
    Keeps working offline when the store is unreachable and replays local \
    changes once the connection comes back."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (defaults to $MNEMO_CONFIG, then the user config dir)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the knowledge store once and report its health
    Check(CheckArgs),

    /// Print the resolved settings as TOML
    Config,
}

/// Per-invocation overrides for `mnemo check`.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Store host
    #[arg(long)]
    pub host: Option<String>,

    /// Store port
    #[arg(long, allow_negative_numbers = true)]
    pub port: Option<i64>,

    /// Connect over TLS (wss://)
    #[arg(long)]
    pub tls: bool,

    /// Dial and call deadline in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
