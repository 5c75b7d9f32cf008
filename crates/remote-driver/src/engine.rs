//! The async runtime wrapper around the sans-I/O [`DriverEngine`].
//!
//! Realizes the actor pattern the protocol's concurrency model calls for
//! (§5): a single tokio task owns the engine, the current transport, and
//! the reconnect timer; every external interaction — host calls, inbound
//! transport messages, the reconnect tick — arrives as a message into that
//! one task's `tokio::select!` loop.

use bytes::Bytes;
use remote_core::{
    ColorInput, DriverEngine, EngineConfig, EngineEffect, Host, LogLevel, Transport, TransportMessage,
};
use remote_proto::{AssetId, DecodedHeader, decode_event, decode_header, frame::FrameExtractor};
use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};
use tracing::{debug, error, info, warn};

/// Host-originated calls the engine task processes, one per public
/// operation the wire protocol's driver engine exposes (§4.F).
#[derive(Debug)]
pub enum HostCall {
    /// See [`DriverEngine::on_reset_scene`].
    ResetScene,
    /// See [`DriverEngine::on_clear_color`].
    ClearColor(ColorInput),
    /// See [`DriverEngine::on_update_scripts`].
    UpdateScripts(Vec<AssetId>),
    /// See [`DriverEngine::on_del_scripts`].
    DelScripts(Vec<AssetId>),
    /// See [`DriverEngine::on_request_input`].
    RequestInput(u32),
    /// Stop the engine task.
    Shutdown,
}

/// A handle to a running engine task.
///
/// Cloning is cheap (it's a channel sender); every clone talks to the same
/// underlying engine.
#[derive(Clone)]
pub struct EngineHandle {
    host_calls: mpsc::Sender<HostCall>,
}

impl EngineHandle {
    /// Clear the scene and reset `media_cache`.
    pub async fn reset_scene(&self) {
        let _ = self.host_calls.send(HostCall::ResetScene).await;
    }

    /// Set the background clear color.
    pub async fn clear_color(&self, color: ColorInput) {
        let _ = self.host_calls.send(HostCall::ClearColor(color)).await;
    }

    /// Notify the engine that these script ids changed.
    pub async fn update_scripts(&self, ids: Vec<AssetId>) {
        let _ = self.host_calls.send(HostCall::UpdateScripts(ids)).await;
    }

    /// Remove these script ids.
    pub async fn del_scripts(&self, ids: Vec<AssetId>) {
        let _ = self.host_calls.send(HostCall::DelScripts(ids)).await;
    }

    /// Request a class of input from the renderer (currently a no-op; see
    /// [`DriverEngine::on_request_input`]).
    pub async fn request_input(&self, flags: u32) {
        let _ = self.host_calls.send(HostCall::RequestInput(flags)).await;
    }

    /// Stop the engine task.
    pub async fn shutdown(&self) {
        let _ = self.host_calls.send(HostCall::Shutdown).await;
    }
}

/// Spawn an engine task for `host`, immediately attempting the first
/// connect for `config`.
///
/// The returned [`EngineHandle`] is the only way to drive the engine from
/// the rest of the program; the task itself runs until
/// [`EngineHandle::shutdown`] is called.
pub fn spawn<H>(config: EngineConfig, host: H) -> EngineHandle
where
    H: Host + 'static,
{
    let (host_tx, host_rx) = mpsc::channel::<HostCall>(64);
    tokio::spawn(run(config, host, host_rx));
    EngineHandle { host_calls: host_tx }
}

async fn run<H: Host>(config: EngineConfig, mut host: H, mut host_rx: mpsc::Receiver<HostCall>) {
    let mut engine = DriverEngine::new(config.viewport_design_size);
    let is_multi_client = matches!(config.transport, remote_core::TransportKind::TcpServer);
    let mut client_extractor = FrameExtractor::new(config.max_frame_len);

    let (transport_tx, mut transport_rx) = mpsc::channel::<TransportMessage>(256);
    let mut transport: Option<Box<dyn Transport>> = None;

    attempt_connect(&config, transport_tx.clone(), &mut transport, &mut engine).await;

    let mut reconnecting = transport.is_none();
    let mut reconnect_at = Instant::now() + config.reconnect_interval;

    loop {
        let reconnect_sleep = sleep_until(reconnect_at);

        tokio::select! {
            Some(call) = host_rx.recv() => {
                if matches!(call, HostCall::Shutdown) {
                    if let Some(t) = transport.as_mut() {
                        t.disconnect().await;
                    }
                    return;
                }
                let effects = dispatch_host_call(&mut engine, call, &mut host);
                execute(effects, transport.as_deref_mut()).await;
            }

            Some(msg) = transport_rx.recv() => {
                match msg {
                    TransportMessage::Data { bytes, .. } => {
                        let events = if is_multi_client {
                            decode_frame(&bytes).into_iter().collect::<Vec<_>>()
                        } else {
                            match client_extractor.push_and_extract(&bytes) {
                                Ok(frames) => frames.iter().filter_map(decode_frame).collect(),
                                Err(err) => {
                                    warn!(%err, "oversized frame from transport, disconnecting");
                                    if let Some(t) = transport.as_mut() {
                                        t.disconnect().await;
                                    }
                                    transport = None;
                                    let effects = engine.on_transport_closed();
                                    execute(effects, None).await;
                                    reconnecting = true;
                                    reconnect_at = Instant::now() + config.reconnect_interval;
                                    Vec::new()
                                }
                            }
                        };
                        for event in events {
                            let effects = engine.on_event(event, &mut host);
                            execute(effects, transport.as_deref_mut()).await;
                        }
                    }
                    // A multi-client server transport reports these per-peer: one
                    // renderer going away doesn't mean the whole transport is
                    // gone (§8 "closing one peer leaves the other functional"),
                    // so only a single-peer transport's Closed/Error drives the
                    // reconnect state machine here.
                    TransportMessage::Closed { peer: Some(peer) } => {
                        debug!(peer = peer.0, "peer disconnected from server transport");
                    }
                    TransportMessage::Error { peer: Some(peer), reason } => {
                        warn!(peer = peer.0, %reason, "peer errored on server transport");
                    }
                    TransportMessage::Closed { peer: None } | TransportMessage::Error { peer: None, .. } => {
                        transport = None;
                        let effects = engine.on_transport_closed();
                        execute(effects, None).await;
                        reconnecting = true;
                        reconnect_at = Instant::now() + config.reconnect_interval;
                    }
                }
            }

            () = reconnect_sleep, if reconnecting => {
                reconnecting = false;
                client_extractor = FrameExtractor::new(config.max_frame_len);
                attempt_connect(&config, transport_tx.clone(), &mut transport, &mut engine).await;
                if transport.is_none() {
                    reconnecting = true;
                    reconnect_at = Instant::now() + config.reconnect_interval;
                }
            }
        }
    }
}

fn dispatch_host_call(engine: &mut DriverEngine, call: HostCall, host: &mut dyn Host) -> Vec<EngineEffect> {
    match call {
        HostCall::ResetScene => engine.on_reset_scene(),
        HostCall::ClearColor(color) => engine.on_clear_color(color),
        HostCall::UpdateScripts(ids) => engine.on_update_scripts(&ids, host),
        HostCall::DelScripts(ids) => engine.on_del_scripts(&ids),
        HostCall::RequestInput(flags) => engine.on_request_input(flags),
        HostCall::Shutdown => Vec::new(),
    }
}

async fn execute(effects: Vec<EngineEffect>, mut transport: Option<&mut dyn Transport>) {
    for effect in effects {
        match effect {
            EngineEffect::Send(cmd) => {
                if let Some(t) = transport.as_mut() {
                    let wire = cmd.encode();
                    if let Err(err) = t.send(wire).await {
                        warn!(%err, "send failed");
                    }
                }
            },
            EngineEffect::Log { level, message } => match level {
                LogLevel::Info => info!("{message}"),
                LogLevel::Warn => warn!("{message}"),
                LogLevel::Error => error!("{message}"),
                LogLevel::Debug => debug!("{message}"),
            },
        }
    }
}

async fn attempt_connect(
    config: &EngineConfig,
    owner: mpsc::Sender<TransportMessage>,
    transport: &mut Option<Box<dyn Transport>>,
    engine: &mut DriverEngine,
) {
    match remote_transport::connect(config, owner).await {
        Ok(t) => {
            info!("transport connected");
            *transport = Some(t);
            let _ = engine.on_transport_connected();
        },
        Err(err) => {
            warn!(%err, "connect failed, will retry");
            *transport = None;
        },
    }
}

/// Decode one complete framed message (header + payload) into an [`remote_proto::Event`].
fn decode_frame(frame: &Bytes) -> Option<remote_proto::Event> {
    match decode_header(frame) {
        DecodedHeader::Complete { frame_type, rest, .. } => Some(decode_event(frame_type, Bytes::copy_from_slice(rest))),
        DecodedHeader::Incomplete => None,
    }
}
