//! Multi-client inbound TCP server transport.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use remote_core::{PeerId, Transport, TransportError, TransportMessage};
use remote_proto::frame::FrameExtractor;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpSocket, tcp},
    sync::{mpsc, oneshot},
    time,
};
use tracing::{debug, info, warn};

const ACCEPT_TIMEOUT: Duration = Duration::from_millis(100);
const READ_CHUNK: usize = 64 * 1024;
const LISTEN_BACKLOG: u32 = 1024;

/// Control messages the [`ServerTransport`] handle sends to its actor task.
enum ServerControl {
    Broadcast(Bytes, oneshot::Sender<Result<(), TransportError>>),
    Shutdown,
}

/// Events a per-peer reader task reports back to the actor.
enum PeerEvent {
    Bytes(PeerId, Bytes),
    Closed(PeerId),
    Error(PeerId, String),
}

struct PeerSlot {
    write_half: tcp::OwnedWriteHalf,
    extractor: FrameExtractor,
}

/// Handle to a running multi-client TCP server transport.
///
/// `send` broadcasts to every connected peer. The listener, accept loop,
/// and per-peer state all live on a single background task this handle
/// talks to over a control channel — the "single actor owns all mutable
/// state" rule the protocol's concurrency model requires, realized as a
/// tokio task plus mailbox rather than a BEAM process plus mailbox.
pub struct ServerTransport {
    control: mpsc::Sender<ServerControl>,
    connected: Arc<AtomicBool>,
}

impl ServerTransport {
    /// Bind `addr` and start accepting clients, forwarding complete frames
    /// to `owner` tagged with their originating [`PeerId`].
    ///
    /// Binds with `SO_REUSEADDR` set (§6), so a listener can rebind the same
    /// port immediately after a prior one on it tears down.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectFailed`] if the bind fails.
    pub async fn bind(
        addr: SocketAddr,
        owner: mpsc::Sender<TransportMessage>,
        max_frame_len: usize,
    ) -> Result<Self, TransportError> {
        let listener = bind_reuseaddr(addr).map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        let (control_tx, control_rx) = mpsc::channel(32);
        let connected = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_actor(listener, owner, control_rx, Arc::clone(&connected), max_frame_len));

        Ok(Self { control: control_tx, connected })
    }
}

#[async_trait::async_trait]
impl Transport for ServerTransport {
    async fn send(&mut self, bytes: Bytes) -> Result<(), TransportError> {
        let (respond_to, response) = oneshot::channel();
        if self.control.send(ServerControl::Broadcast(bytes, respond_to)).await.is_err() {
            return Err(TransportError::Closed);
        }
        response.await.map_err(|_| TransportError::Closed)?
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn disconnect(&mut self) {
        let _ = self.control.send(ServerControl::Shutdown).await;
    }
}

/// Bind `addr` with `SO_REUSEADDR` set before the bind call, the way a raw
/// `setsockopt(SO_REUSEADDR)` + `bind` + `listen` socket sequence would.
fn bind_reuseaddr(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() { TcpSocket::new_v4() } else { TcpSocket::new_v6() }?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(LISTEN_BACKLOG)
}

async fn run_actor(
    listener: TcpListener,
    owner: mpsc::Sender<TransportMessage>,
    mut control_rx: mpsc::Receiver<ServerControl>,
    connected: Arc<AtomicBool>,
    max_frame_len: usize,
) {
    let mut peers: HashMap<PeerId, PeerSlot> = HashMap::new();
    let mut next_peer_id: u64 = 0;
    let (peer_events_tx, mut peer_events_rx) = mpsc::channel::<PeerEvent>(256);

    loop {
        tokio::select! {
            accepted = time::timeout(ACCEPT_TIMEOUT, listener.accept()) => {
                if let Ok(Ok((stream, addr))) = accepted {
                    let peer_id = PeerId(next_peer_id);
                    next_peer_id += 1;
                    let (read_half, write_half) = stream.into_split();
                    peers.insert(peer_id, PeerSlot { write_half, extractor: FrameExtractor::new(max_frame_len) });
                    connected.store(true, Ordering::Release);
                    info!(peer = peer_id.0, %addr, "peer connected");
                    tokio::spawn(read_peer(peer_id, read_half, peer_events_tx.clone()));
                }
                // Elapsed timeout or a failed accept: fall through and re-poll.
            }

            Some(event) = peer_events_rx.recv() => {
                handle_peer_event(event, &mut peers, &owner).await;
                connected.store(!peers.is_empty(), Ordering::Release);
            }

            Some(control) = control_rx.recv() => {
                match control {
                    ServerControl::Broadcast(bytes, respond_to) => {
                        broadcast(&mut peers, &bytes, &owner).await;
                        connected.store(!peers.is_empty(), Ordering::Release);
                        // Always report success: per §9, broadcast send is
                        // best-effort per peer, not atomic across peers.
                        let _ = respond_to.send(Ok(()));
                    }
                    ServerControl::Shutdown => {
                        for (_, mut slot) in peers.drain() {
                            let _ = slot.write_half.shutdown().await;
                        }
                        connected.store(false, Ordering::Release);
                        return;
                    }
                }
            }
        }
    }
}

async fn handle_peer_event(event: PeerEvent, peers: &mut HashMap<PeerId, PeerSlot>, owner: &mpsc::Sender<TransportMessage>) {
    match event {
        PeerEvent::Bytes(peer_id, bytes) => {
            let Some(slot) = peers.get_mut(&peer_id) else { return };
            match slot.extractor.push_and_extract(&bytes) {
                Ok(frames) => {
                    for frame in frames {
                        if owner.send(TransportMessage::Data { peer: Some(peer_id), bytes: frame }).await.is_err() {
                            return;
                        }
                    }
                },
                Err(err) => {
                    warn!(peer = peer_id.0, %err, "frame too large, dropping peer");
                    peers.remove(&peer_id);
                    let _ = owner.send(TransportMessage::Error { peer: Some(peer_id), reason: err.to_string() }).await;
                },
            }
        },
        PeerEvent::Closed(peer_id) => {
            if peers.remove(&peer_id).is_some() {
                debug!(peer = peer_id.0, "peer closed");
                let _ = owner.send(TransportMessage::Closed { peer: Some(peer_id) }).await;
            }
        },
        PeerEvent::Error(peer_id, reason) => {
            if peers.remove(&peer_id).is_some() {
                warn!(peer = peer_id.0, %reason, "peer read error");
                let _ = owner.send(TransportMessage::Error { peer: Some(peer_id), reason }).await;
            }
        },
    }
}

/// Write `bytes` to every peer, removing (but not reporting an overall
/// failure for) any peer whose write fails.
async fn broadcast(peers: &mut HashMap<PeerId, PeerSlot>, bytes: &Bytes, owner: &mpsc::Sender<TransportMessage>) {
    let mut failed = Vec::new();
    for (peer_id, slot) in peers.iter_mut() {
        if slot.write_half.write_all(bytes).await.is_err() {
            failed.push(*peer_id);
        }
    }
    for peer_id in failed {
        peers.remove(&peer_id);
        warn!(peer = peer_id.0, "broadcast write failed, removing peer");
        let _ = owner.send(TransportMessage::Closed { peer: Some(peer_id) }).await;
    }
}

async fn read_peer(peer_id: PeerId, mut read_half: tcp::OwnedReadHalf, events: mpsc::Sender<PeerEvent>) {
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                let _ = events.send(PeerEvent::Closed(peer_id)).await;
                return;
            },
            Ok(n) => {
                if events.send(PeerEvent::Bytes(peer_id, Bytes::copy_from_slice(&buf[..n]))).await.is_err() {
                    return;
                }
            },
            Err(e) => {
                let _ = events.send(PeerEvent::Error(peer_id, e.to_string())).await;
                return;
            },
        }
    }
}
