//! QUIC binding of [`Transport`].
//!
//! Each event travels as one JSON envelope on its own unidirectional stream,
//! in both directions. A background task owns the connection: it writes
//! queued outbound envelopes and dispatches inbound ones to the shared
//! [`HandlerTable`].

use std::{net::SocketAddr, sync::Arc, time::Duration};

use quinn::{ClientConfig, Connection, Endpoint, RecvStream};
use roomchat_proto::{Envelope, EventName, Payload};
use tokio::sync::mpsc;

use super::{EventHandler, HandlerTable, Transport};
use crate::TransportError;

/// QUIC transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Relay address.
    pub server_addr: SocketAddr,
    /// Server name presented for TLS.
    pub server_name: String,
    /// ALPN protocol, must match the relay.
    pub alpn: Vec<u8>,
    /// Idle timeout before the connection is dropped.
    pub idle_timeout: Duration,
    /// Largest inbound envelope accepted.
    pub max_event_size: usize,
    /// Outbound queue depth.
    pub outbound_queue: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 4433)),
            server_name: "localhost".to_string(),
            alpn: b"roomchat".to_vec(),
            idle_timeout: Duration::from_secs(30),
            max_event_size: Envelope::MAX_SIZE,
            outbound_queue: 32,
        }
    }
}

struct Active {
    to_server: mpsc::Sender<Vec<u8>>,
    abort_handle: tokio::task::AbortHandle,
    endpoint: Endpoint,
}

/// Transport over a QUIC connection to a relay.
///
/// Must be connected from within a tokio runtime.
pub struct QuicTransport {
    config: TransportConfig,
    handlers: HandlerTable,
    active: Option<Active>,
}

impl QuicTransport {
    /// Create an unconnected transport.
    pub fn new(config: TransportConfig) -> Self {
        Self { config, handlers: HandlerTable::new(), active: None }
    }

    /// Transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl std::fmt::Debug for QuicTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuicTransport")
            .field("server_addr", &self.config.server_addr)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Transport for QuicTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.is_connected() {
            return Ok(());
        }

        let client_config = insecure_client_config(&self.config)?;
        let local = SocketAddr::from(([0, 0, 0, 0], 0));
        let mut endpoint = Endpoint::client(local)
            .map_err(|e| TransportError::Connection(format!("endpoint creation failed: {e}")))?;
        endpoint.set_default_client_config(client_config);

        let connection = endpoint
            .connect(self.config.server_addr, &self.config.server_name)
            .map_err(|e| TransportError::Connection(format!("connect failed: {e}")))?
            .await
            .map_err(|e| TransportError::Connection(format!("connection failed: {e}")))?;

        tracing::info!(addr = %self.config.server_addr, "connected to relay");

        let (to_server_tx, to_server_rx) = mpsc::channel(self.config.outbound_queue);
        let handle = tokio::spawn(run_connection(
            connection,
            to_server_rx,
            self.handlers.clone(),
            self.config.max_event_size,
        ));

        self.active =
            Some(Active { to_server: to_server_tx, abort_handle: handle.abort_handle(), endpoint });
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(active) = self.active.take() {
            active.abort_handle.abort();
            active.endpoint.close(0u32.into(), b"disconnect");
            tracing::info!("disconnected from relay");
        }
    }

    fn is_connected(&self) -> bool {
        self.active.as_ref().is_some_and(|active| !active.to_server.is_closed())
    }

    async fn emit(&mut self, payload: Payload) -> Result<(), TransportError> {
        let Some(active) = self.active.as_ref() else {
            return Err(TransportError::NotConnected);
        };

        let event = payload.event();
        let bytes = payload.encode()?;
        active.to_server.send(bytes).await.map_err(|_| TransportError::Closed)?;

        tracing::trace!(%event, "queued outbound event");
        Ok(())
    }

    fn on(&mut self, event: EventName, handler: EventHandler) {
        self.handlers.set(event, handler);
    }

    fn off(&mut self, event: EventName) {
        self.handlers.remove(event);
    }
}

impl Drop for QuicTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Own the connection: write outbound envelopes, dispatch inbound ones.
async fn run_connection(
    connection: Connection,
    mut to_server: mpsc::Receiver<Vec<u8>>,
    handlers: HandlerTable,
    max_event_size: usize,
) {
    let conn_recv = connection.clone();
    let recv_handle = tokio::spawn(async move {
        loop {
            match conn_recv.accept_uni().await {
                Ok(recv) => {
                    let handlers = handlers.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_incoming_stream(recv, &handlers, max_event_size).await
                        {
                            tracing::warn!(error = %e, "incoming stream error");
                        }
                    });
                },
                Err(e) => {
                    tracing::info!(error = %e, "relay connection closed");
                    break;
                },
            }
        }
    });

    while let Some(bytes) = to_server.recv().await {
        if let Err(e) = send_envelope(&connection, &bytes).await {
            tracing::warn!(error = %e, "send failed");
        }
    }

    recv_handle.abort();
}

/// Read one envelope from a relay stream and dispatch it.
async fn handle_incoming_stream(
    mut recv: RecvStream,
    handlers: &HandlerTable,
    max_event_size: usize,
) -> Result<(), TransportError> {
    let bytes = recv
        .read_to_end(max_event_size)
        .await
        .map_err(|e| TransportError::Stream(format!("read failed: {e}")))?;

    let payload = Payload::decode(&bytes)?;
    if !payload.event().is_inbound() {
        tracing::debug!(event = %payload.event(), "ignoring outbound-only event from relay");
        return Ok(());
    }

    handlers.dispatch(payload);
    Ok(())
}

/// Write one envelope on a fresh unidirectional stream.
async fn send_envelope(connection: &Connection, bytes: &[u8]) -> Result<(), TransportError> {
    let mut send = connection
        .open_uni()
        .await
        .map_err(|e| TransportError::Stream(format!("open stream failed: {e}")))?;

    send.write_all(bytes).await.map_err(|e| TransportError::Stream(format!("write failed: {e}")))?;
    send.finish().map_err(|e| TransportError::Stream(format!("finish failed: {e}")))?;

    Ok(())
}

/// Create an insecure client config that accepts any certificate.
///
/// WARNING: Development only. Production should verify certificates.
fn insecure_client_config(config: &TransportConfig) -> Result<ClientConfig, TransportError> {
    let mut crypto = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InsecureCertVerifier))
        .with_no_client_auth();

    crypto.alpn_protocols = vec![config.alpn.clone()];

    let quic_crypto = quinn::crypto::rustls::QuicClientConfig::try_from(crypto)
        .map_err(|e| TransportError::Connection(format!("invalid TLS config: {e}")))?;
    let mut client = ClientConfig::new(Arc::new(quic_crypto));

    let idle = config
        .idle_timeout
        .try_into()
        .map_err(|e| TransportError::Connection(format!("invalid idle timeout: {e}")))?;
    let mut transport = quinn::TransportConfig::default();
    transport.max_idle_timeout(Some(idle));
    client.transport_config(Arc::new(transport));

    Ok(client)
}

/// Certificate verifier that accepts any certificate.
#[derive(Debug)]
struct InsecureCertVerifier;

impl rustls::client::danger::ServerCertVerifier for InsecureCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
