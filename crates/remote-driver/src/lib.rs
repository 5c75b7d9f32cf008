//! Async runtime wrapper tying [`remote_core::DriverEngine`] to a live
//! [`remote_core::Transport`], plus the CLI configuration layer the demo
//! binary uses to build one.
//!
//! # Modules
//!
//! - [`config`]: CLI argument parsing into a validated
//!   [`remote_core::EngineConfig`].
//! - [`engine`]: the actor task — [`engine::spawn`] and the
//!   [`engine::EngineHandle`]/[`engine::HostCall`] surface host code drives
//!   it through.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod engine;

pub use config::{Args, ConfigError, TransportArg};
pub use engine::{EngineHandle, HostCall, spawn};
