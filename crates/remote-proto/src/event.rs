//! Renderer-to-driver events.

use bytes::Bytes;

/// An inbound event, renderer to driver.
///
/// [`decode_event`] never fails: a recognized type code with a payload of
/// the wrong size, or an unrecognized type code, decodes to
/// [`Event::Unknown`] rather than raising an error. A malformed or unknown
/// message from the renderer is not a protocol violation worth tearing the
/// connection down over — it's simply not actionable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Renderer-reported cumulative bytes received, for observability.
    Stats {
        /// Total bytes received by the renderer so far.
        bytes_received: u64,
    },
    /// The display surface changed size.
    Reshape {
        /// New width in device pixels.
        width: u32,
        /// New height in device pixels.
        height: u32,
    },
    /// The renderer finished initializing and is ready to receive the
    /// current scene.
    Ready,
    /// A touch point changed state.
    Touch {
        /// Action: 0 = down, 1 = up, 2 = move.
        action: u8,
        /// X position in device pixels.
        x: f32,
        /// Y position in device pixels.
        y: f32,
    },
    /// A key changed state.
    Key {
        /// Platform-independent key identifier.
        key: u32,
        /// Platform-specific scancode.
        scancode: u32,
        /// Action: 0 = release, 1 = press, 2 = repeat.
        action: i32,
        /// Modifier bitmask.
        mods: u32,
    },
    /// A Unicode codepoint was typed.
    Codepoint {
        /// The typed Unicode scalar value.
        codepoint: u32,
        /// Modifier bitmask active when typed.
        mods: u32,
    },
    /// The pointer moved.
    CursorPos {
        /// X position in device pixels.
        x: f32,
        /// Y position in device pixels.
        y: f32,
    },
    /// A pointer button changed state.
    MouseButton {
        /// Button index.
        button: u32,
        /// Action: 0 = release, 1 = press.
        action: u32,
        /// Modifier bitmask.
        mods: u32,
        /// X position in device pixels.
        x: f32,
        /// Y position in device pixels.
        y: f32,
    },
    /// The scroll wheel moved.
    Scroll {
        /// Horizontal scroll delta.
        x_off: f32,
        /// Vertical scroll delta.
        y_off: f32,
        /// X position in device pixels.
        x: f32,
        /// Y position in device pixels.
        y: f32,
    },
    /// The pointer entered or left the display surface.
    CursorEnter {
        /// `1` if the cursor entered, `0` if it left.
        entered: u8,
    },
    /// An informational log line from the renderer.
    LogInfo {
        /// The log message bytes.
        message: Bytes,
    },
    /// A warning log line from the renderer.
    LogWarn {
        /// The log message bytes.
        message: Bytes,
    },
    /// An error log line from the renderer.
    LogError {
        /// The log message bytes.
        message: Bytes,
    },
    /// An event with an unrecognized type code, or a recognized type code
    /// whose payload did not match the expected fixed size.
    Unknown {
        /// The frame's type tag, as received.
        frame_type: u8,
        /// The frame's raw payload, as received.
        payload: Bytes,
    },
}

impl Event {
    /// The wire type code this event was (or would be) decoded from.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        match self {
            Self::Stats { .. } => 0x01,
            Self::Reshape { .. } => 0x05,
            Self::Ready => 0x06,
            Self::Touch { .. } => 0x08,
            Self::Key { .. } => 0x0A,
            Self::Codepoint { .. } => 0x0B,
            Self::CursorPos { .. } => 0x0C,
            Self::MouseButton { .. } => 0x0D,
            Self::Scroll { .. } => 0x0E,
            Self::CursorEnter { .. } => 0x0F,
            Self::LogInfo { .. } => 0xA0,
            Self::LogWarn { .. } => 0xA1,
            Self::LogError { .. } => 0xA2,
            Self::Unknown { frame_type, .. } => *frame_type,
        }
    }
}

/// Decode one event from a frame's type tag and payload.
///
/// `payload` is the frame body *after* the 5-byte header — exactly what
/// [`crate::frame::FrameExtractor::push_and_extract`] hands back per frame,
/// minus the header. Falls back to [`Event::Unknown`] rather than erroring
/// on any mismatch.
#[must_use]
pub fn decode_event(frame_type: u8, payload: Bytes) -> Event {
    match (frame_type, payload.len()) {
        (0x01, 8) => Event::Stats { bytes_received: u64_at(&payload, 0) },
        (0x05, 8) => Event::Reshape { width: u32_at(&payload, 0), height: u32_at(&payload, 4) },
        (0x06, 0) => Event::Ready,
        (0x08, 9) => Event::Touch { action: payload[0], x: f32_at(&payload, 1), y: f32_at(&payload, 5) },
        (0x0A, 16) => Event::Key {
            key: u32_at(&payload, 0),
            scancode: u32_at(&payload, 4),
            action: i32_at(&payload, 8),
            mods: u32_at(&payload, 12),
        },
        (0x0B, 8) => Event::Codepoint { codepoint: u32_at(&payload, 0), mods: u32_at(&payload, 4) },
        (0x0C, 8) => Event::CursorPos { x: f32_at(&payload, 0), y: f32_at(&payload, 4) },
        (0x0D, 20) => Event::MouseButton {
            button: u32_at(&payload, 0),
            action: u32_at(&payload, 4),
            mods: u32_at(&payload, 8),
            x: f32_at(&payload, 12),
            y: f32_at(&payload, 16),
        },
        (0x0E, 16) => Event::Scroll {
            x_off: f32_at(&payload, 0),
            y_off: f32_at(&payload, 4),
            x: f32_at(&payload, 8),
            y: f32_at(&payload, 12),
        },
        (0x0F, 1) => Event::CursorEnter { entered: payload[0] },
        (0xA0, _) => Event::LogInfo { message: payload },
        (0xA1, _) => Event::LogWarn { message: payload },
        (0xA2, _) => Event::LogError { message: payload },
        _ => Event::Unknown { frame_type, payload },
    }
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn i32_at(buf: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn u64_at(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

fn f32_at(buf: &[u8], offset: usize) -> f32 {
    f32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}
