use clap::{ArgAction, Parser, Subcommand};

use crate::utils::BANNER;

/// The main command-line interface struct.
#[derive(Parser)]
#[clap(about = "Client Veil", long_about = BANNER)]
pub struct Cli {
    /// The command to be executed.
    #[command(subcommand)]
    pub command: Commands,

    /// Activate verbose mode (-v, -vv for additional levels)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Enum representing the available top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Apply a sequence of control writes to a fixture registry.
    Run {
        /// Control values to write, in order (0 = attach, 1 = detach).
        #[arg(required = true)]
        writes: Vec<String>,

        /// Sibling entries registered ahead of our own.
        #[arg(long, short, value_delimiter = ',', default_value = "alpha,beta")]
        entries: Vec<String>,
    },

    /// Print the enumeration of a freshly built fixture registry.
    List {
        /// Sibling entries registered ahead of our own.
        #[arg(long, short, value_delimiter = ',', default_value = "alpha,beta")]
        entries: Vec<String>,
    },
}
