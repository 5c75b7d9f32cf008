//! Sans-I/O driver engine and transport abstraction for the remote display
//! bridge.
//!
//! This crate touches no socket, no clock, and no log sink. It models two
//! pure state machines:
//!
//! - [`driver::DriverEngine`]: reacts to host-framework calls and decoded
//!   wire [`remote_proto::Event`]s by producing a list of [`driver::EngineEffect`]s
//!   (commands to send, lines to log). It never performs I/O itself.
//! - [`transport::Transport`]: the capability every concrete transport
//!   (`remote-transport`) implements, so the engine's async wrapper
//!   (`remote-driver`) can hold one without knowing which kind it is.
//!
//! Callers provide I/O, time, and a [`host::Host`] implementation; this
//! crate provides correctness of the state transitions.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod input;
pub mod transport;

pub use config::{EngineConfig, TransportKind};
pub use driver::{DriverEngine, EngineEffect, LogLevel};
pub use error::DriverError;
pub use host::{Host, ImageAsset, MediaRefs};
pub use input::{ColorChannel, ColorInput, CursorButton, KeyAction, Modifier};
pub use transport::{PeerId, Transport, TransportError, TransportMessage};
