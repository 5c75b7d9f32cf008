//! Single-peer outbound WebSocket connector (binary frames only).

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use remote_core::{Transport, TransportError, TransportMessage};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::debug;

type Sink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// A connected single-peer outbound WebSocket client transport.
///
/// Binary frames only, per the wire protocol: a text frame from the peer
/// is ignored rather than translated, and a Close frame is reported as a
/// disconnect like any other transport's closure.
pub struct WebSocketClientTransport {
    sink: Sink,
    connected: Arc<AtomicBool>,
}

impl WebSocketClientTransport {
    /// Connect to `url` and start forwarding inbound binary frames to
    /// `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectFailed`] if the handshake fails.
    pub async fn connect(url: &str, owner: mpsc::Sender<TransportMessage>) -> Result<Self, TransportError> {
        let (stream, _response) =
            connect_async(url).await.map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        let (sink, mut source) = stream.split();
        let connected = Arc::new(AtomicBool::new(true));
        let task_connected = Arc::clone(&connected);

        tokio::spawn(async move {
            while let Some(msg) = source.next().await {
                match msg {
                    Ok(Message::Binary(bytes)) => {
                        let data = TransportMessage::Data { peer: None, bytes: Bytes::from(bytes) };
                        if owner.send(data).await.is_err() {
                            return;
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {
                        // Text/ping/pong frames carry no protocol meaning here.
                    },
                    Err(e) => {
                        task_connected.store(false, Ordering::Release);
                        let _ = owner.send(TransportMessage::Error { peer: None, reason: e.to_string() }).await;
                        return;
                    },
                }
            }
            task_connected.store(false, Ordering::Release);
            debug!("websocket transport closed");
            let _ = owner.send(TransportMessage::Closed { peer: None }).await;
        });

        Ok(Self { sink, connected })
    }
}

#[async_trait::async_trait]
impl Transport for WebSocketClientTransport {
    async fn send(&mut self, bytes: Bytes) -> Result<(), TransportError> {
        self.sink
            .send(Message::Binary(bytes.to_vec()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        let _ = self.sink.close().await;
    }
}
