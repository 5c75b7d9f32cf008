//! Fixed 5-byte frame header.
//!
//! Layout (big-endian): `[type: u8][length: u32]`. Unlike a header carrying
//! routing metadata, this one exists purely to delimit a variable-length
//! payload, so it stays minimal: a type tag and a byte count.

/// Size of the serialized header in bytes.
pub const HEADER_SIZE: usize = 5;

/// Result of attempting to parse a header prefix off a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedHeader<'a> {
    /// Fewer than [`HEADER_SIZE`] bytes were available; no header could be
    /// read yet. Not an error — the caller should wait for more bytes.
    Incomplete,

    /// A complete header was parsed.
    Complete {
        /// The frame's type tag.
        frame_type: u8,
        /// The payload's declared byte length.
        length: u32,
        /// Bytes following the header in the input slice (may be shorter
        /// than `length` if the payload itself hasn't fully arrived).
        rest: &'a [u8],
    },
}

/// Parse a frame header from the front of `bytes`.
///
/// This only looks at the first [`HEADER_SIZE`] bytes; it does not check
/// whether `rest` actually contains `length` bytes of payload. That check
/// belongs to [`crate::frame::extract`], which needs to distinguish "header
/// incomplete" from "payload incomplete".
#[must_use]
pub fn decode_header(bytes: &[u8]) -> DecodedHeader<'_> {
    if bytes.len() < HEADER_SIZE {
        return DecodedHeader::Incomplete;
    }

    let frame_type = bytes[0];
    let length = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    DecodedHeader::Complete { frame_type, length, rest: &bytes[HEADER_SIZE..] }
}
