use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod tui;

use cli::{Cli, Commands};
use config::Config;
use thingy_core::series::DEFAULT_SERIES_CAPACITY;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Handle completions before tracing init
    if let Commands::Completions { shell } = args.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "thingy", &mut io::stdout());
        return Ok(());
    }

    let filter = if args.quiet {
        EnvFilter::new("warn")
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so the dashboard's alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {}", e);
            Config::default()
        }
    };

    match args.command {
        Commands::Scan { timeout, format } => {
            let timeout = timeout.or(config.scan_timeout).unwrap_or(5);
            commands::scan::cmd_scan(timeout, format, args.quiet, config.no_color).await
        }
        Commands::Read { device, format } => {
            let device = commands::resolve_device(device, &config);
            commands::read::cmd_read(device, format, args.quiet).await
        }
        Commands::Watch { device, count } => {
            let device = commands::resolve_device(device, &config);
            commands::watch::cmd_watch(device, count, config.no_color).await
        }
        Commands::Info { device } => {
            let device = commands::resolve_device(device, &config);
            commands::info::cmd_info(device, args.quiet).await
        }
        Commands::Ui { device, capacity } => {
            let device = commands::resolve_device(device, &config);
            let capacity = capacity
                .or(config.chart_capacity)
                .unwrap_or(DEFAULT_SERIES_CAPACITY);
            tui::run(device, capacity).await
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}
