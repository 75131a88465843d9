//! TCP server for the thermo temperature store.
//!
//! Sensors report readings over the network; clients request daily and
//! weekly statistics over the trailing eight days. All state is in memory
//! and lives as long as the process.

mod error;
mod protocol;
mod render;
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thermo::{ReadConsistency, Store};
use tracing_subscriber::EnvFilter;

use crate::server::{Server, ServerConfig};

/// thermo-server — In-memory temperature statistics over TCP.
#[derive(Parser)]
#[command(name = "thermo-server", version, about)]
struct Cli {
    /// Interface to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "8080")]
    port: u16,

    /// How reports read the store while readings arrive.
    #[arg(long, default_value = "per-lookup")]
    consistency: Consistency,

    /// Seconds to wait for a client to send its request.
    #[arg(long, default_value = "5")]
    read_timeout_secs: u64,
}

/// Command-line spelling of [`ReadConsistency`].
#[derive(Clone, Copy, ValueEnum)]
enum Consistency {
    /// Lock once per bucket lookup; rows may straddle concurrent writes.
    PerLookup,
    /// Copy the store once per report; every row reflects one instant.
    Snapshot,
}

impl From<Consistency> for ReadConsistency {
    fn from(c: Consistency) -> Self {
        match c {
            Consistency::PerLookup => Self::PerLookup,
            Consistency::Snapshot => Self::Snapshot,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("server failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        bind: cli.bind,
        port: cli.port,
        consistency: cli.consistency.into(),
        read_timeout: Duration::from_secs(cli.read_timeout_secs),
    };

    let store = Arc::new(Store::new());
    let consistency = config.consistency;
    let server = Server::bind(config, store)?;
    tracing::info!(addr = %server.local_addr()?, ?consistency, "listening");
    server.serve();

    Ok(())
}
