//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Live temperature monitor for the Nordic Thingy:52.
#[derive(Parser)]
#[command(name = "thingy")]
#[command(author, version, about = "Live temperature monitor for the Nordic Thingy:52", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for nearby Thingy devices
    Scan {
        /// Scan timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Read one temperature sample from a device
    Read {
        /// Device name fragment or address (defaults to the first Thingy in range)
        #[arg(short, long, env = "THINGY_DEVICE")]
        device: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Stream temperature notifications to stdout
    Watch {
        /// Device name fragment or address (defaults to the first Thingy in range)
        #[arg(short, long, env = "THINGY_DEVICE")]
        device: Option<String>,

        /// Stop after this many readings (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        count: u32,
    },

    /// Display device information
    Info {
        /// Device name fragment or address (defaults to the first Thingy in range)
        #[arg(short, long, env = "THINGY_DEVICE")]
        device: Option<String>,
    },

    /// Live dashboard with a temperature chart
    Ui {
        /// Device name fragment or address (defaults to the first Thingy in range)
        #[arg(short, long, env = "THINGY_DEVICE")]
        device: Option<String>,

        /// Number of chart points to retain
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format for scan/read results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_count_default() {
        let cli = Cli::try_parse_from(["thingy", "watch"]).unwrap();
        match cli.command {
            Commands::Watch { count, device } => {
                assert_eq!(count, 0);
                assert!(device.is_none());
            }
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn test_read_format_json() {
        let cli = Cli::try_parse_from(["thingy", "read", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Read { format, .. } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("expected read command"),
        }
    }
}
