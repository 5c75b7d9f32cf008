//! The host-framework seam: everything the driver engine needs from, and
//! gives back to, the scene-graph UI framework it bridges.

use bytes::Bytes;
use remote_proto::{AssetId, ImageFormat};

use crate::input::{CursorButton, KeyAction, Modifier};

/// The font, image, and stream identifiers one script body declares it
/// references.
#[derive(Debug, Clone, Default)]
pub struct MediaRefs {
    /// Font assets the script references, in enumeration order.
    pub fonts: Vec<AssetId>,
    /// Image assets the script references, in enumeration order.
    pub images: Vec<AssetId>,
    /// Streamed assets the script references, in enumeration order.
    pub streams: Vec<AssetId>,
}

/// A decoded image asset, ready to frame into a `PutImage` command.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Pixel format tag.
    pub format: ImageFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Opaque pixel or encoded-image bytes.
    pub data: Bytes,
}

/// Everything the driver engine needs from the host scene-graph framework:
/// script/asset lookup, and a sink for translated input events.
///
/// Every lookup method is synchronous and infallible-by-convention: a
/// missing or failing asset returns `None` rather than an error, and the
/// engine silently skips it (per the wire protocol's asset-load-failure
/// semantics) rather than treating the lookup itself as fallible. A host
/// implementation backed by slower storage is expected to resolve these
/// eagerly or from an in-memory cache it maintains itself — this trait's
/// synchronous shape is what keeps the engine sans-I/O.
pub trait Host: Send {
    /// Fetch a script's opaque serialized byte body by id.
    fn fetch_script(&self, id: &AssetId) -> Option<Bytes>;

    /// Fetch a font asset's opaque file bytes by id.
    fn fetch_font(&self, id: &AssetId) -> Option<Bytes>;

    /// Fetch an image asset by id.
    fn fetch_image(&self, id: &AssetId) -> Option<ImageAsset>;

    /// Inspect a script body for the font/image/stream assets it declares.
    fn script_media_refs(&self, script: &Bytes) -> MediaRefs;

    /// Every script id currently live in the host's viewport, used to
    /// rebuild a renderer's state after a `Ready` resync.
    fn live_script_ids(&self) -> Vec<AssetId>;

    /// The display surface reported a new size.
    fn on_reshape_input(&mut self, width: f32, height: f32);

    /// A pointer button changed state.
    fn on_cursor_button(&mut self, button: CursorButton, pressed: bool, mods: &[Modifier], x: f32, y: f32);

    /// The pointer moved.
    fn on_cursor_pos(&mut self, x: f32, y: f32);

    /// A key changed state.
    fn on_key(&mut self, key: u32, scancode: u32, action: KeyAction, mods: &[Modifier]);

    /// A Unicode codepoint was typed.
    fn on_codepoint(&mut self, codepoint: u32, mods: &[Modifier]);

    /// The scroll wheel moved.
    fn on_scroll(&mut self, x_off: f32, y_off: f32, x: f32, y: f32);
}
