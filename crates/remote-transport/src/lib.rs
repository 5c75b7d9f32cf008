//! Concrete tokio-based transports for the remote display bridge.
//!
//! Every transport here implements [`remote_core::Transport`]; construction
//! is transport-specific (a host/port, a filesystem path, a URL, a bind
//! address), which is why `connect`/`bind` are free functions or inherent
//! constructors rather than trait methods. [`connect`] is the one place
//! that dispatches on an [`remote_core::EngineConfig`]'s
//! [`remote_core::TransportKind`] to pick the right constructor.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod server;
pub mod websocket;

pub use client::{TcpClientTransport, UnixClientTransport};
pub use server::ServerTransport;
pub use websocket::WebSocketClientTransport;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use remote_core::{EngineConfig, Transport, TransportError, TransportKind, TransportMessage};
use tokio::sync::mpsc;

/// Construct and connect (or bind) the transport `config` selects.
///
/// `remote-driver`'s engine loop calls this on every connect attempt
/// (initial and reconnect) without needing to match on [`TransportKind`]
/// itself.
///
/// # Errors
///
/// Returns whatever the underlying connector or listener reports, plus
/// [`TransportError::ConnectFailed`] if `config` is missing a field its
/// transport kind requires (callers are expected to have already run
/// [`EngineConfig::validate`](remote_core::EngineConfig::validate), so this
/// should not normally trigger).
pub async fn connect(config: &EngineConfig, owner: mpsc::Sender<TransportMessage>) -> Result<Box<dyn Transport>, TransportError> {
    match config.transport {
        TransportKind::Tcp => {
            let host = config.host.as_deref().unwrap_or("127.0.0.1");
            let port = config.port.ok_or_else(|| TransportError::ConnectFailed("missing port".to_string()))?;
            Ok(Box::new(TcpClientTransport::connect(host, port, owner).await?))
        },
        TransportKind::UnixSocket => {
            let path =
                config.path.as_deref().ok_or_else(|| TransportError::ConnectFailed("missing path".to_string()))?;
            Ok(Box::new(UnixClientTransport::connect(path, owner).await?))
        },
        TransportKind::WebSocket => {
            let url =
                config.url.as_deref().ok_or_else(|| TransportError::ConnectFailed("missing url".to_string()))?;
            Ok(Box::new(WebSocketClientTransport::connect(url, owner).await?))
        },
        TransportKind::TcpServer => {
            let port = config.port.ok_or_else(|| TransportError::ConnectFailed("missing port".to_string()))?;
            let ip: IpAddr =
                config.host.as_deref().and_then(|h| h.parse().ok()).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
            let addr = SocketAddr::new(ip, port);
            Ok(Box::new(ServerTransport::bind(addr, owner, config.max_frame_len).await?))
        },
    }
}
