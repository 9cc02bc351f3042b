//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wheeltab - switch tabs by scrolling the wheel over them
#[derive(Parser, Debug)]
#[command(name = "wheeltab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run; defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the wheel hook and run until interrupted
    Run,

    /// List the supported host applications
    Hosts,

    /// Write the default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
