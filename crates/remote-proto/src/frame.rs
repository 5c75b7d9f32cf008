//! Frame encoding and the streaming frame extractor.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    errors::{ProtocolError, Result},
    header::{HEADER_SIZE, decode_header},
};

/// Default maximum acceptable frame size (16 MiB), used when a caller has
/// no stronger opinion. A defense-in-depth bound only: the wire format
/// itself permits any `u32` length.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Encode a complete frame: 5-byte header followed by `payload`.
///
/// Performs no I/O and allocates exactly one buffer sized to the final
/// frame.
#[must_use]
pub fn encode_frame(frame_type: u8, payload: &[u8]) -> Bytes {
    #[allow(clippy::expect_used)]
    let length = u32::try_from(payload.len()).expect("payload longer than u32::MAX");

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u8(frame_type);
    buf.put_u32(length);
    buf.put_slice(payload);
    buf.freeze()
}

/// Split a concatenated byte buffer into complete frames plus a residual.
///
/// Pure function: repeatedly parses a header, and if the declared payload
/// has fully arrived, detaches a frame (header bytes included) and
/// continues; otherwise stops and returns everything from the start of the
/// incomplete frame as `residual`.
#[must_use]
pub fn extract(buffer: &[u8]) -> (Vec<Bytes>, Bytes) {
    let mut frames = Vec::new();
    let mut offset = 0usize;

    loop {
        let remaining = &buffer[offset..];
        let crate::header::DecodedHeader::Complete { length, .. } = decode_header(remaining)
        else {
            break;
        };

        let frame_len = HEADER_SIZE + length as usize;
        if remaining.len() < frame_len {
            break;
        }

        frames.push(Bytes::copy_from_slice(&remaining[..frame_len]));
        offset += frame_len;
    }

    (frames, Bytes::copy_from_slice(&buffer[offset..]))
}

/// Stateful per-connection wrapper around [`extract`].
///
/// Owns one growing receive buffer. Callers push newly-arrived bytes and
/// pull out whatever complete frames have accumulated; the residual stays
/// buffered for the next push. This is what a client transport or a
/// per-peer slot in the multi-client server transport keeps alive for the
/// lifetime of one connection.
#[derive(Debug)]
pub struct FrameExtractor {
    max_frame_len: usize,
    buffer: BytesMut,
}

impl FrameExtractor {
    /// Create an extractor that rejects any frame whose declared length
    /// exceeds `max_frame_len`.
    #[must_use]
    pub fn new(max_frame_len: usize) -> Self {
        Self { max_frame_len, buffer: BytesMut::new() }
    }

    /// Append `bytes` to the internal buffer and pull out every complete
    /// frame now available.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FrameTooLarge`] if the next frame's declared
    /// length exceeds `max_frame_len`. The caller should treat this as fatal
    /// for the connection; the extractor's buffer is left untouched so the
    /// caller can inspect it if needed, but should not keep pushing to it.
    pub fn push_and_extract(&mut self, bytes: &[u8]) -> Result<Vec<Bytes>> {
        self.buffer.extend_from_slice(bytes);

        if let crate::header::DecodedHeader::Complete { length, .. } =
            decode_header(&self.buffer)
            && length as usize > self.max_frame_len
        {
            return Err(ProtocolError::FrameTooLarge {
                length,
                max: self.max_frame_len,
            });
        }

        let (frames, residual) = extract(&self.buffer);
        let consumed = self.buffer.len() - residual.len();
        let _ = self.buffer.split_to(consumed);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::decode_header;
    use proptest::prelude::*;

    #[test]
    fn round_trip_header() {
        let frame = encode_frame(0x01, b"test");
        let crate::header::DecodedHeader::Complete { frame_type, length, rest } =
            decode_header(&frame)
        else {
            panic!("expected complete header");
        };
        assert_eq!(frame_type, 1);
        assert_eq!(length, 4);
        assert_eq!(rest, b"test");
    }

    #[test]
    fn extract_empty() {
        let (frames, residual) = extract(&[]);
        assert!(frames.is_empty());
        assert!(residual.is_empty());
    }

    #[test]
    fn extract_incomplete_header() {
        let (frames, residual) = extract(&[0x01, 0x00, 0x00]);
        assert!(frames.is_empty());
        assert_eq!(&residual[..], &[0x01, 0x00, 0x00]);
    }

    #[test]
    fn extract_frame_plus_partial() {
        let mut buf = encode_frame(0x06, b"").to_vec();
        buf.extend_from_slice(&[0x05, 0x00]); // partial next header

        let (frames, residual) = extract(&buf);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &encode_frame(0x06, b"")[..]);
        assert_eq!(&residual[..], &[0x05, 0x00]);
    }

    #[test]
    fn extract_zero_length_payload() {
        let buf = encode_frame(0x06, b"");
        let (frames, residual) = extract(&buf);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), HEADER_SIZE);
        assert!(residual.is_empty());
    }

    #[test]
    fn extract_multiple_frames_one_read() {
        let mut buf = encode_frame(0x06, b"").to_vec();
        buf.extend_from_slice(&encode_frame(0x05, b"12345678"));

        let (frames, residual) = extract(&buf);
        assert_eq!(frames.len(), 2);
        assert!(residual.is_empty());
    }

    #[test]
    fn stateful_extractor_splits_header_across_pushes() {
        let mut ex = FrameExtractor::new(DEFAULT_MAX_FRAME_LEN);
        let full = encode_frame(0x06, b"");

        let first = ex.push_and_extract(&full[..3]).unwrap();
        assert!(first.is_empty());

        let second = ex.push_and_extract(&full[3..]).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(&second[0][..], &full[..]);
    }

    #[test]
    fn stateful_extractor_rejects_oversized_frame() {
        let mut ex = FrameExtractor::new(4);
        let frame = encode_frame(0x01, b"12345");
        let err = ex.push_and_extract(&frame).unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLarge { length: 5, max: 4 }));
    }

    fn arbitrary_frame() -> impl Strategy<Value = Bytes> {
        (any::<u8>(), prop::collection::vec(any::<u8>(), 0..256))
            .prop_map(|(t, payload)| encode_frame(t, &payload))
    }

    proptest! {
        #[test]
        fn prop_split_anywhere_reassembles(frames in prop::collection::vec(arbitrary_frame(), 0..8), split in 0usize..4096) {
            let mut concatenated = Vec::new();
            for f in &frames {
                concatenated.extend_from_slice(f);
            }
            let split = split.min(concatenated.len());
            let (prefix, suffix) = concatenated.split_at(split);

            let (mut got, residual_a) = extract(prefix);
            let (more, residual_b) = extract(&[residual_a.as_ref(), suffix].concat());
            got.extend(more);

            prop_assert_eq!(got, frames);
            prop_assert!(residual_b.is_empty() || concatenated.ends_with(&residual_b[..]));
        }

        #[test]
        fn prop_extract_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let _ = extract(&bytes);
        }
    }
}
