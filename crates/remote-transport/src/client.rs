//! Single-peer outbound connectors: TCP and Unix-domain socket.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use bytes::Bytes;
use remote_core::{Transport, TransportError, TransportMessage};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, UnixStream, tcp, unix},
    sync::mpsc,
};
use tracing::debug;

const READ_CHUNK: usize = 64 * 1024;

/// A connected single-peer outbound TCP client transport.
///
/// Delivers raw inbound bytes verbatim to the owner; frame extraction is
/// the owner's responsibility (the engine keeps one `recv_buffer`).
pub struct TcpClientTransport {
    write_half: tcp::OwnedWriteHalf,
    connected: Arc<AtomicBool>,
}

impl TcpClientTransport {
    /// Connect to `host:port` and start forwarding inbound bytes to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectFailed`] if the connection attempt
    /// fails.
    pub async fn connect(host: &str, port: u16, owner: mpsc::Sender<TransportMessage>) -> Result<Self, TransportError> {
        let stream =
            TcpStream::connect((host, port)).await.map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        let (read_half, write_half) = stream.into_split();
        let connected = Arc::new(AtomicBool::new(true));
        tokio::spawn(read_loop(read_half, owner, Arc::clone(&connected)));
        Ok(Self { write_half, connected })
    }
}

#[async_trait::async_trait]
impl Transport for TcpClientTransport {
    async fn send(&mut self, bytes: Bytes) -> Result<(), TransportError> {
        self.write_half.write_all(&bytes).await.map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        let _ = self.write_half.shutdown().await;
    }
}

/// A connected single-peer outbound Unix-domain socket client transport.
pub struct UnixClientTransport {
    write_half: unix::OwnedWriteHalf,
    connected: Arc<AtomicBool>,
}

impl UnixClientTransport {
    /// Connect to the socket at `path` and start forwarding inbound bytes
    /// to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectFailed`] if the connection attempt
    /// fails.
    pub async fn connect(path: &str, owner: mpsc::Sender<TransportMessage>) -> Result<Self, TransportError> {
        let stream = UnixStream::connect(path).await.map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        let (read_half, write_half) = stream.into_split();
        let connected = Arc::new(AtomicBool::new(true));
        tokio::spawn(read_loop(read_half, owner, Arc::clone(&connected)));
        Ok(Self { write_half, connected })
    }
}

#[async_trait::async_trait]
impl Transport for UnixClientTransport {
    async fn send(&mut self, bytes: Bytes) -> Result<(), TransportError> {
        self.write_half.write_all(&bytes).await.map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        let _ = self.write_half.shutdown().await;
    }
}

/// Shared read loop for any half that implements [`AsyncRead`]: forwards
/// chunks as [`TransportMessage::Data`], and reports closure or error
/// exactly once before returning.
async fn read_loop<R: AsyncRead + Unpin>(mut read_half: R, owner: mpsc::Sender<TransportMessage>, connected: Arc<AtomicBool>) {
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                connected.store(false, Ordering::Release);
                debug!("single-peer transport closed by remote");
                let _ = owner.send(TransportMessage::Closed { peer: None }).await;
                return;
            },
            Ok(n) => {
                if owner.send(TransportMessage::Data { peer: None, bytes: Bytes::copy_from_slice(&buf[..n]) }).await.is_err()
                {
                    return;
                }
            },
            Err(e) => {
                connected.store(false, Ordering::Release);
                let _ = owner.send(TransportMessage::Error { peer: None, reason: e.to_string() }).await;
                return;
            },
        }
    }
}
