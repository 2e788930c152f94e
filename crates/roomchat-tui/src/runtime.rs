//! Client wiring
//!
//! Builds the session over the selected transport and hands it, with the
//! terminal driver, to the generic [`roomchat_app::Runtime`].
//!
//! Supports two modes:
//! - Loopback mode: in-process relay, useful to try the client alone
//! - QUIC mode: connection to a relay over QUIC

use std::{io, net::SocketAddr};

use roomchat_app::{App, Bridge, Runtime};
use roomchat_client::{
    SystemEnv, Transport,
    transport::quic::{QuicTransport, TransportConfig},
};
use roomchat_relay::{LocalRelay, MemoryTransport};
use thiserror::Error;

use crate::{TerminalDriver, TerminalError};

/// Label shown for the in-process relay.
pub const LOOPBACK_LABEL: &str = "loopback";

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal error.
    #[error("terminal error: {0}")]
    Terminal(#[from] TerminalError),

    /// The relay address could not be resolved.
    #[error("cannot resolve relay address {0}")]
    Resolve(String),
}

/// Where the session connects.
#[derive(Debug, Clone)]
pub enum Mode {
    /// In-process relay.
    Loopback,
    /// QUIC relay.
    Quic(TransportConfig),
}

impl Mode {
    /// QUIC mode for `host:port`, resolving the host.
    ///
    /// The host part doubles as the TLS server name.
    pub async fn quic(server: &str) -> Result<Self, RuntimeError> {
        let addr: SocketAddr = tokio::net::lookup_host(server)
            .await
            .map_err(|_| RuntimeError::Resolve(server.to_string()))?
            .next()
            .ok_or_else(|| RuntimeError::Resolve(server.to_string()))?;

        let host = server.rsplit_once(':').map_or(server, |(host, _)| host);
        let server_name = host.trim_start_matches('[').trim_end_matches(']').to_string();

        Ok(Self::Quic(TransportConfig { server_addr: addr, server_name, ..Default::default() }))
    }

    /// Label shown in the status bar.
    pub fn label(&self) -> String {
        match self {
            Self::Loopback => LOOPBACK_LABEL.to_string(),
            Self::Quic(config) => config.server_addr.to_string(),
        }
    }
}

/// Terminal client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Transport selection.
    pub mode: Mode,
    /// Pre-filled username.
    pub username: String,
    /// Pre-filled room.
    pub room: String,
}

/// Run the terminal client until the user quits.
pub async fn run(config: ClientConfig) -> Result<(), RuntimeError> {
    let app = App::with_login(config.mode.label(), &config.username, &config.room);

    match config.mode {
        Mode::Loopback => {
            tracing::info!("starting with in-process relay");
            let relay = LocalRelay::new();
            drive(MemoryTransport::new(relay), app).await
        },
        Mode::Quic(transport_config) => {
            tracing::info!(server = %transport_config.server_addr, "starting with QUIC relay");
            drive(QuicTransport::new(transport_config), app).await
        },
    }
}

async fn drive<T: Transport>(transport: T, app: App) -> Result<(), RuntimeError> {
    let driver = TerminalDriver::new()?;
    let bridge = Bridge::with_transport(transport, SystemEnv::new());

    Runtime::new(driver, app, bridge).run().await?;
    tracing::info!("client stopped");
    Ok(())
}
