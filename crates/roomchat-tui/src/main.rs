//! Roomchat terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Try it alone against an in-process relay
//! roomchat
//!
//! # Connect to a relay, pre-filling the login form
//! roomchat --server relay.example:4433 --username alice --room lobby
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use roomchat_tui::{ClientConfig, Mode, runtime};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Roomchat terminal client
#[derive(Parser, Debug)]
#[command(name = "roomchat")]
#[command(about = "End-to-end encrypted room chat in the terminal")]
#[command(version)]
struct Args {
    /// Relay address (host:port) to connect to over QUIC
    ///
    /// If not provided, runs against an in-process relay.
    #[arg(short, long)]
    server: Option<String>,

    /// Username to pre-fill in the login form
    #[arg(short, long, default_value = "")]
    username: String,

    /// Room to pre-fill in the login form
    #[arg(short, long, default_value = "")]
    room: String,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let file = File::create(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    }

    let mode = match &args.server {
        Some(server) => Mode::quic(server).await?,
        None => Mode::Loopback,
    };

    let config = ClientConfig { mode, username: args.username, room: args.room };
    Ok(runtime::run(config).await?)
}
