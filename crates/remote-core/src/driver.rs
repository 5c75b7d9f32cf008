//! The driver engine: a pure state machine mediating between the host
//! scene graph and a connected renderer.
//!
//! [`DriverEngine`] never touches a socket or a clock. Every public method
//! takes whatever state it needs as an argument and returns a list of
//! [`EngineEffect`]s describing what should happen next; the caller
//! (`remote-driver`'s async wrapper) is responsible for actually encoding
//! and sending commands, and for logging.

use std::collections::HashSet;

use bytes::Bytes;
use remote_proto::{AssetId, Command, Event};

use crate::{
    host::{Host, MediaRefs},
    input::{ColorInput, CursorButton, KeyAction, Modifier},
};

/// Severity of a log-worthy event the engine can't act on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Warning.
    Warn,
    /// An error the renderer reported about itself.
    Error,
    /// Debug-only detail (unknown frames, unhandled events).
    Debug,
}

/// One outcome of a [`DriverEngine`] call: either a command to send to the
/// renderer, or a line worth logging.
///
/// The engine itself never logs — it has no I/O dependency on a logging
/// crate. `remote-driver` routes [`EngineEffect::Log`] through `tracing` at
/// the carried level.
#[derive(Debug, Clone)]
pub enum EngineEffect {
    /// Encode and send this command to the currently connected renderer.
    Send(Command),
    /// Record this line at the given level.
    Log {
        /// Severity.
        level: LogLevel,
        /// The message text.
        message: String,
    },
}

/// Tracks which assets have already been transmitted on the current
/// connection, so `ensure_media` never resends one.
///
/// Keyed on the asset's coerced wire bytes rather than the [`AssetId`]
/// value itself: two different `AssetId` variants (say, `Name("5")` and
/// `Int(5)`) can coerce to the same wire identity, and dedup needs to
/// track what was actually put on the wire, not which enum variant asked
/// for it.
#[derive(Debug, Default)]
struct MediaCache {
    fonts: HashSet<Bytes>,
    images: HashSet<Bytes>,
    streams: HashSet<Bytes>,
}

impl MediaCache {
    fn clear(&mut self) {
        self.fonts.clear();
        self.images.clear();
        self.streams.clear();
    }
}

/// The sans-I/O driver state machine.
///
/// Owns the data the wire protocol's "driver state" section describes,
/// minus `transport`/`transport_kind`/`transport_config` (owned by
/// `remote-driver`'s async wrapper, which is the only layer that touches
/// I/O) and `recv_buffer` (owned by whichever transport delivers it).
#[derive(Debug)]
pub struct DriverEngine {
    connected: bool,
    media_cache: MediaCache,
    viewport_design_size: (u32, u32),
    bytes_received: u64,
}

impl DriverEngine {
    /// Create a new engine for a host authoring scenes at `viewport_design_size`.
    #[must_use]
    pub fn new(viewport_design_size: (u32, u32)) -> Self {
        Self { connected: false, media_cache: MediaCache::default(), viewport_design_size, bytes_received: 0 }
    }

    /// Whether the engine currently believes it has a live transport.
    #[must_use]
    pub const fn connected(&self) -> bool {
        self.connected
    }

    /// Cumulative bytes the renderer has reported receiving, via `Stats`.
    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// A fresh transport connection (first connect, or a successful
    /// reconnect) came up.
    ///
    /// Wipes `media_cache`: the invariant is that the cache reflects
    /// exactly what's been transmitted on the *current* connection, so a
    /// new connection starts from nothing and the following `Ready`
    /// resync retransmits everything.
    pub fn on_transport_connected(&mut self) -> Vec<EngineEffect> {
        self.connected = true;
        self.media_cache.clear();
        Vec::new()
    }

    /// The transport closed or errored.
    ///
    /// The caller (not this engine) owns the reconnect timer; this just
    /// stops commands from being emitted until the next successful
    /// connect.
    pub fn on_transport_closed(&mut self) -> Vec<EngineEffect> {
        self.connected = false;
        Vec::new()
    }

    /// Gate a command on `connected`: per the wire protocol, no command is
    /// emitted while disconnected, and the attempt is a silent drop rather
    /// than an error.
    fn emit(&self, cmd: Command) -> Option<EngineEffect> {
        self.connected.then_some(EngineEffect::Send(cmd))
    }

    /// Clear the scene and `media_cache`.
    pub fn on_reset_scene(&mut self) -> Vec<EngineEffect> {
        self.media_cache.clear();
        self.emit(Command::Reset).into_iter().collect()
    }

    /// Normalize and set the background clear color.
    pub fn on_clear_color(&mut self, color: ColorInput) -> Vec<EngineEffect> {
        let cmd = Command::ClearColor {
            r: color.r.normalize(),
            g: color.g.normalize(),
            b: color.b.normalize(),
            a: color.a.map_or(1.0, crate::input::ColorChannel::normalize),
        };
        self.emit(cmd).into_iter().collect()
    }

    /// For each changed script id: fetch it, ensure its declared media is
    /// present on the renderer, then emit `PutScript`. After every id,
    /// emit exactly one terminal `Render`.
    ///
    /// Also used to implement the `Ready` full resync (§4.F): called with
    /// every currently live script id instead of only the changed ones,
    /// it reproduces the same ordering guarantee the protocol documents
    /// for resync, because the two operations are the same operation over
    /// a different id set.
    pub fn on_update_scripts(&mut self, ids: &[AssetId], host: &mut dyn Host) -> Vec<EngineEffect> {
        let mut effects = Vec::new();

        for id in ids {
            let Some(script) = host.fetch_script(id) else { continue };
            let media = host.script_media_refs(&script);
            effects.extend(self.ensure_media(&media, host));
            effects.extend(self.emit(Command::PutScript { id: id.to_bytes(), script }));
        }

        effects.extend(self.emit(Command::Render));
        effects
    }

    /// Remove scripts by id.
    pub fn on_del_scripts(&mut self, ids: &[AssetId]) -> Vec<EngineEffect> {
        ids.iter().filter_map(|id| self.emit(Command::DelScript { id: id.to_bytes() })).collect()
    }

    /// No-op: input arrives unsolicited from the renderer, so there is
    /// nothing for the engine to do when the host asks for some.
    #[must_use]
    pub fn on_request_input(&self, _flags: u32) -> Vec<EngineEffect> {
        Vec::new()
    }

    /// For each font/image/stream `media` declares that isn't already in
    /// `media_cache`, load it from the host and emit the matching
    /// `PutFont`/`PutImage`. Streams have no wire command of their own;
    /// they're recorded in the cache (so they aren't re-fetched every
    /// call) but emit nothing.
    ///
    /// Missing or failing assets are silently skipped, and *not* added to
    /// the cache, so a later call that references them tries again.
    fn ensure_media(&mut self, media: &MediaRefs, host: &dyn Host) -> Vec<EngineEffect> {
        let mut effects = Vec::new();

        for id in &media.fonts {
            let wire_id = id.to_bytes();
            if self.media_cache.fonts.contains(&wire_id) {
                continue;
            }
            let Some(data) = host.fetch_font(id) else { continue };
            effects.extend(self.emit(Command::PutFont { name: wire_id.clone(), data }));
            self.media_cache.fonts.insert(wire_id);
        }

        for id in &media.images {
            let wire_id = id.to_bytes();
            if self.media_cache.images.contains(&wire_id) {
                continue;
            }
            let Some(asset) = host.fetch_image(id) else { continue };
            effects.extend(self.emit(Command::PutImage {
                id: wire_id.clone(),
                format: asset.format,
                width: asset.width,
                height: asset.height,
                data: asset.data,
            }));
            self.media_cache.images.insert(wire_id);
        }

        for id in &media.streams {
            self.media_cache.streams.insert(id.to_bytes());
        }

        effects
    }

    /// Dispatch one decoded renderer event.
    pub fn on_event(&mut self, event: Event, host: &mut dyn Host) -> Vec<EngineEffect> {
        match event {
            Event::Ready => {
                let ids = host.live_script_ids();
                self.on_update_scripts(&ids, host)
            },
            Event::Reshape { width, height } => {
                host.on_reshape_input(width as f32, height as f32);
                let tx = global_tx(self.viewport_design_size, (width as f32, height as f32));
                let mut effects: Vec<EngineEffect> = self.emit(tx).into_iter().collect();
                effects.extend(self.emit(Command::Render));
                effects
            },
            Event::Stats { bytes_received } => {
                self.bytes_received = bytes_received;
                Vec::new()
            },
            Event::Touch { action, x, y } => {
                match action {
                    0 => host.on_cursor_button(CursorButton::Left, true, &[], x, y),
                    1 => host.on_cursor_button(CursorButton::Left, false, &[], x, y),
                    2 => host.on_cursor_pos(x, y),
                    other => {
                        return vec![EngineEffect::Log {
                            level: LogLevel::Debug,
                            message: format!("unhandled touch action {other}"),
                        }];
                    },
                }
                Vec::new()
            },
            Event::Key { key, scancode, action, mods } => {
                host.on_key(key, scancode, KeyAction::from_code(action), &Modifier::decode_mask(mods));
                Vec::new()
            },
            Event::Codepoint { codepoint, mods } => {
                host.on_codepoint(codepoint, &Modifier::decode_mask(mods));
                Vec::new()
            },
            Event::CursorPos { x, y } => {
                host.on_cursor_pos(x, y);
                Vec::new()
            },
            Event::MouseButton { button, action, mods, x, y } => {
                let pressed = action != 0;
                host.on_cursor_button(CursorButton::from_code(button), pressed, &Modifier::decode_mask(mods), x, y);
                Vec::new()
            },
            Event::Scroll { x_off, y_off, x, y } => {
                host.on_scroll(x_off, y_off, x, y);
                Vec::new()
            },
            Event::CursorEnter { entered } => {
                vec![EngineEffect::Log { level: LogLevel::Debug, message: format!("cursor_enter({entered}) unhandled") }]
            },
            Event::LogInfo { message } => {
                vec![EngineEffect::Log { level: LogLevel::Info, message: lossy(&message) }]
            },
            Event::LogWarn { message } => {
                vec![EngineEffect::Log { level: LogLevel::Warn, message: lossy(&message) }]
            },
            Event::LogError { message } => {
                vec![EngineEffect::Log { level: LogLevel::Error, message: lossy(&message) }]
            },
            Event::Unknown { frame_type, payload } => vec![EngineEffect::Log {
                level: LogLevel::Debug,
                message: format!("unknown event type=0x{frame_type:02x} len={}", payload.len()),
            }],
        }
    }
}

fn lossy(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Compute the letterbox viewport transform mapping design space
/// `viewport` to device-pixel space `device`, per §4.F.
fn global_tx(viewport: (u32, u32), device: (f32, f32)) -> Command {
    let (vw, vh) = (viewport.0 as f32, viewport.1 as f32);
    let (dw, dh) = device;
    let sx = dw / vw;
    let sy = dh / vh;
    let s = sx.min(sy);
    let tx = (dw - vw * s) / 2.0;
    let ty = (dh - vh * s) / 2.0;
    Command::GlobalTx { a: s, b: 0.0, c: 0.0, d: s, e: tx, f: ty }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use remote_proto::ImageFormat;

    use crate::host::ImageAsset;

    #[derive(Default)]
    struct FakeHost {
        scripts: HashMap<String, Bytes>,
        fonts: HashMap<String, Bytes>,
        images: HashMap<String, ImageAsset>,
        media: HashMap<String, MediaRefs>,
        live_ids: Vec<AssetId>,
        reshape_calls: Vec<(f32, f32)>,
    }

    impl Host for FakeHost {
        fn fetch_script(&self, id: &AssetId) -> Option<Bytes> {
            self.scripts.get(&key(id)).cloned()
        }

        fn fetch_font(&self, id: &AssetId) -> Option<Bytes> {
            self.fonts.get(&key(id)).cloned()
        }

        fn fetch_image(&self, id: &AssetId) -> Option<ImageAsset> {
            self.images.get(&key(id)).cloned()
        }

        fn script_media_refs(&self, script: &Bytes) -> MediaRefs {
            let k = String::from_utf8_lossy(script).into_owned();
            self.media.get(&k).cloned().unwrap_or_default()
        }

        fn live_script_ids(&self) -> Vec<AssetId> {
            self.live_ids.clone()
        }

        fn on_reshape_input(&mut self, width: f32, height: f32) {
            self.reshape_calls.push((width, height));
        }

        fn on_cursor_button(&mut self, _button: CursorButton, _pressed: bool, _mods: &[Modifier], _x: f32, _y: f32) {}
        fn on_cursor_pos(&mut self, _x: f32, _y: f32) {}
        fn on_key(&mut self, _key: u32, _scancode: u32, _action: KeyAction, _mods: &[Modifier]) {}
        fn on_codepoint(&mut self, _codepoint: u32, _mods: &[Modifier]) {}
        fn on_scroll(&mut self, _x_off: f32, _y_off: f32, _x: f32, _y: f32) {}
    }

    fn key(id: &AssetId) -> String {
        String::from_utf8_lossy(&id.to_bytes()).into_owned()
    }

    fn connected_engine() -> DriverEngine {
        let mut engine = DriverEngine::new((1080, 2400));
        engine.on_transport_connected();
        engine
    }

    #[test]
    fn disconnected_send_is_silent_noop() {
        let mut engine = DriverEngine::new((1080, 2400));
        let effects = engine.on_reset_scene();
        assert!(effects.is_empty());
    }

    #[test]
    fn ready_resync_emits_scripts_then_one_render() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        host.scripts.insert("a".to_string(), Bytes::from_static(b"script-a"));
        host.scripts.insert("b".to_string(), Bytes::from_static(b"script-b"));
        host.live_ids = vec![AssetId::from("a"), AssetId::from("b")];

        let effects = engine.on_event(Event::Ready, &mut host);

        let commands: Vec<&Command> = effects
            .iter()
            .filter_map(|e| match e {
                EngineEffect::Send(cmd) => Some(cmd),
                EngineEffect::Log { .. } => None,
            })
            .collect();

        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], Command::PutScript { .. }));
        assert!(matches!(commands[1], Command::PutScript { .. }));
        assert!(matches!(commands[2], Command::Render));
    }

    #[test]
    fn ready_resync_prepares_assets_before_put_script() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        host.scripts.insert("a".to_string(), Bytes::from_static(b"script-a"));
        host.fonts.insert("font1".to_string(), Bytes::from_static(b"font-bytes"));
        host.media.insert("script-a".to_string(), MediaRefs { fonts: vec![AssetId::from("font1")], ..Default::default() });
        host.live_ids = vec![AssetId::from("a")];

        let effects = engine.on_event(Event::Ready, &mut host);
        let commands: Vec<&Command> = effects
            .iter()
            .filter_map(|e| match e {
                EngineEffect::Send(cmd) => Some(cmd),
                EngineEffect::Log { .. } => None,
            })
            .collect();

        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], Command::PutFont { .. }));
        assert!(matches!(commands[1], Command::PutScript { .. }));
        assert!(matches!(commands[2], Command::Render));
    }

    #[test]
    fn reshape_emits_global_tx_then_render_with_concrete_numbers() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();

        let effects = engine.on_event(Event::Reshape { width: 1179, height: 2556 }, &mut host);
        assert_eq!(host.reshape_calls, vec![(1179.0, 2556.0)]);

        let commands: Vec<&Command> = effects
            .iter()
            .filter_map(|e| match e {
                EngineEffect::Send(cmd) => Some(cmd),
                EngineEffect::Log { .. } => None,
            })
            .collect();

        assert_eq!(commands.len(), 2);
        let Command::GlobalTx { a, b, c, d, e, f } = commands[0] else { panic!("expected GlobalTx") };
        assert!((a - 1.065).abs() < 1e-3);
        assert_eq!(*b, 0.0);
        assert_eq!(*c, 0.0);
        assert!((d - 1.065).abs() < 1e-3);
        assert!((e - 14.4).abs() < 1e-2);
        assert!((f - 0.0).abs() < 1e-3);
        assert!(matches!(commands[1], Command::Render));
    }

    #[test]
    fn reset_scene_clears_media_cache_and_emits_reset() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        host.scripts.insert("a".to_string(), Bytes::from_static(b"script-a"));
        host.fonts.insert("font1".to_string(), Bytes::from_static(b"font-bytes"));
        host.media.insert("script-a".to_string(), MediaRefs { fonts: vec![AssetId::from("font1")], ..Default::default() });

        let first = engine.on_update_scripts(&[AssetId::from("a")], &mut host);
        assert!(first.iter().any(|e| matches!(e, EngineEffect::Send(Command::PutFont { .. }))));

        let reset_effects = engine.on_reset_scene();
        assert!(matches!(reset_effects[0], EngineEffect::Send(Command::Reset)));

        // Cache was cleared by Reset, so the same font is sent again.
        let second = engine.on_update_scripts(&[AssetId::from("a")], &mut host);
        assert!(second.iter().any(|e| matches!(e, EngineEffect::Send(Command::PutFont { .. }))));
    }

    #[test]
    fn reconnect_wipes_media_cache() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        host.scripts.insert("a".to_string(), Bytes::from_static(b"script-a"));
        host.fonts.insert("font1".to_string(), Bytes::from_static(b"font-bytes"));
        host.media.insert("script-a".to_string(), MediaRefs { fonts: vec![AssetId::from("font1")], ..Default::default() });

        let _ = engine.on_update_scripts(&[AssetId::from("a")], &mut host);

        engine.on_transport_closed();
        assert!(!engine.connected());

        engine.on_transport_connected();
        let effects = engine.on_update_scripts(&[AssetId::from("a")], &mut host);
        assert!(effects.iter().any(|e| matches!(e, EngineEffect::Send(Command::PutFont { .. }))));
    }

    #[test]
    fn media_already_cached_is_not_resent() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        host.scripts.insert("a".to_string(), Bytes::from_static(b"script-a"));
        host.scripts.insert("b".to_string(), Bytes::from_static(b"script-b"));
        host.fonts.insert("font1".to_string(), Bytes::from_static(b"font-bytes"));
        host.media.insert("script-a".to_string(), MediaRefs { fonts: vec![AssetId::from("font1")], ..Default::default() });
        host.media.insert("script-b".to_string(), MediaRefs { fonts: vec![AssetId::from("font1")], ..Default::default() });

        let effects = engine.on_update_scripts(&[AssetId::from("a"), AssetId::from("b")], &mut host);
        let font_sends =
            effects.iter().filter(|e| matches!(e, EngineEffect::Send(Command::PutFont { .. }))).count();
        assert_eq!(font_sends, 1);
    }

    #[test]
    fn unknown_event_logs_at_debug() {
        let mut engine = connected_engine();
        let mut host = FakeHost::default();
        let effects = engine.on_event(Event::Unknown { frame_type: 0x99, payload: Bytes::new() }, &mut host);
        assert!(matches!(&effects[0], EngineEffect::Log { level: LogLevel::Debug, .. }));
    }
}
