//! Driver-to-renderer commands.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{frame::encode_frame, image::ImageFormat};

/// An outbound command, driver to renderer.
///
/// Each variant carries exactly the fields of its wire payload (see
/// `SCENIC_REMOTE_PROTOCOL`'s command table). [`Command::encode`] produces
/// the complete framed bytes — header included — ready to hand to a
/// transport's `send`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Install or replace a script under `id`.
    PutScript {
        /// Script identifier bytes.
        id: Bytes,
        /// Opaque serialized script body.
        script: Bytes,
    },
    /// Remove the script under `id`.
    DelScript {
        /// Script identifier bytes.
        id: Bytes,
    },
    /// Clear the renderer's scene back to empty.
    Reset,
    /// Replace the global (design-to-device) transform.
    GlobalTx {
        /// Affine matrix component `a` (x scale).
        a: f32,
        /// Affine matrix component `b`.
        b: f32,
        /// Affine matrix component `c`.
        c: f32,
        /// Affine matrix component `d` (y scale).
        d: f32,
        /// Affine matrix component `e` (x translate).
        e: f32,
        /// Affine matrix component `f` (y translate).
        f: f32,
    },
    /// Replace the cursor transform.
    CursorTx {
        /// Affine matrix component `a`.
        a: f32,
        /// Affine matrix component `b`.
        b: f32,
        /// Affine matrix component `c`.
        c: f32,
        /// Affine matrix component `d`.
        d: f32,
        /// Affine matrix component `e`.
        e: f32,
        /// Affine matrix component `f`.
        f: f32,
    },
    /// Render the current scene.
    Render,
    /// Set the background clear color (normalized 0..1 channels).
    ClearColor {
        /// Red channel, 0..1.
        r: f32,
        /// Green channel, 0..1.
        g: f32,
        /// Blue channel, 0..1.
        b: f32,
        /// Alpha channel, 0..1.
        a: f32,
    },
    /// Request the renderer to start reporting a class of input.
    RequestInput {
        /// Bitmask of requested input classes.
        flags: u32,
    },
    /// Ask the renderer to shut down.
    Quit,
    /// Install a font asset.
    PutFont {
        /// Font name bytes.
        name: Bytes,
        /// Opaque font file bytes.
        data: Bytes,
    },
    /// Install an image asset.
    PutImage {
        /// Image identifier bytes.
        id: Bytes,
        /// Pixel format tag.
        format: ImageFormat,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Opaque pixel or encoded-image data.
        data: Bytes,
    },
}

impl Command {
    /// The wire type code for this command's variant.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::PutScript { .. } => 0x01,
            Self::DelScript { .. } => 0x02,
            Self::Reset => 0x03,
            Self::GlobalTx { .. } => 0x04,
            Self::CursorTx { .. } => 0x05,
            Self::Render => 0x06,
            Self::ClearColor { .. } => 0x08,
            Self::RequestInput { .. } => 0x0A,
            Self::Quit => 0x20,
            Self::PutFont { .. } => 0x40,
            Self::PutImage { .. } => 0x41,
        }
    }

    /// Encode this command into a complete, framed wire message.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut payload = BytesMut::new();

        match self {
            Self::PutScript { id, script } => {
                put_len_prefixed(&mut payload, id);
                payload.put_slice(script);
            },
            Self::DelScript { id } => {
                payload.put_slice(id);
            },
            Self::Reset | Self::Render | Self::Quit => {},
            Self::GlobalTx { a, b, c, d, e, f } | Self::CursorTx { a, b, c, d, e, f } => {
                for v in [a, b, c, d, e, f] {
                    payload.put_f32(*v);
                }
            },
            Self::ClearColor { r, g, b, a } => {
                for v in [r, g, b, a] {
                    payload.put_f32(*v);
                }
            },
            Self::RequestInput { flags } => {
                payload.put_u32(*flags);
            },
            Self::PutFont { name, data } => {
                put_len_prefixed(&mut payload, name);
                payload.put_slice(data);
            },
            Self::PutImage { id, format, width, height, data } => {
                #[allow(clippy::expect_used)]
                let id_len = u32::try_from(id.len()).expect("id longer than u32::MAX");
                #[allow(clippy::expect_used)]
                let data_len = u32::try_from(data.len()).expect("data longer than u32::MAX");
                payload.put_u32(id_len);
                payload.put_u32(data_len);
                payload.put_u32(*width);
                payload.put_u32(*height);
                payload.put_u32(format.to_u32());
                payload.put_slice(id);
                payload.put_slice(data);
            },
        }

        encode_frame(self.opcode(), &payload)
    }
}

/// Write a `u32` length prefix followed by `bytes`.
fn put_len_prefixed(dst: &mut BytesMut, bytes: &[u8]) {
    #[allow(clippy::expect_used)]
    let len = u32::try_from(bytes.len()).expect("field longer than u32::MAX");
    dst.put_u32(len);
    dst.put_slice(bytes);
}
