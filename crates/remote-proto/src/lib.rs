//! Wire protocol for the remote display bridge.
//!
//! The protocol frames every message as `[type: u8][length: u32 BE][payload]`.
//! This crate is sans-I/O: it only encodes and decodes byte buffers. It never
//! touches a socket, a clock, or a log. Callers (`remote-transport`,
//! `remote-driver`) own the I/O; this crate owns correctness of the bytes.
//!
//! # Modules
//!
//! - [`header`]: the 5-byte frame header.
//! - [`frame`]: `encode_frame` and the streaming [`frame::FrameExtractor`].
//! - [`command`]: driver-to-renderer [`Command`] encoding.
//! - [`event`]: renderer-to-driver [`Event`] decoding.
//! - [`image`]: the [`ImageFormat`] wire enum.
//! - [`asset_id`]: the [`AssetId`] identifier coercion sum type.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod asset_id;
pub mod command;
pub mod errors;
pub mod event;
pub mod frame;
pub mod header;
pub mod image;

pub use asset_id::AssetId;
pub use command::Command;
pub use errors::{ProtocolError, Result};
pub use event::{Event, decode_event};
pub use frame::{FrameExtractor, encode_frame};
pub use header::{DecodedHeader, decode_header};
pub use image::ImageFormat;
