//! Protocol error type.

use thiserror::Error;

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing or extracting protocol bytes.
///
/// Malformed *payloads* for known type codes are never an error — they
/// decode to [`crate::Event::Unknown`] per the codec's "never throw on
/// unknown/malformed" contract. This error type only covers failures that
/// are about byte-buffer bookkeeping, not protocol semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A frame's declared payload length exceeded the extractor's configured
    /// maximum frame size. The connection carrying this frame should be
    /// rejected (defense-in-depth against unbounded memory growth).
    #[error("frame length {length} exceeds maximum frame size {max}")]
    FrameTooLarge {
        /// Length the frame header declared.
        length: u32,
        /// Configured maximum.
        max: usize,
    },
}
