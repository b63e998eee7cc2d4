//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use the relaxed timing profile (slower thresholds for hand keying)
    #[arg(long)]
    pub relaxed: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pair two simulated engines over a loopback link and send a message
    Demo {
        /// Message to transmit
        message: String,

        /// Cancel the transmission after this many milliseconds
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// Key a dot/dash pattern on a simulated switch and decode it locally
    Key {
        /// Pattern of '.', '-' and ' ' (space separates characters, '/'
        /// separates words), e.g. ".... .."
        pattern: String,
    },
    /// Print the Morse alphabet table
    Table,
}
