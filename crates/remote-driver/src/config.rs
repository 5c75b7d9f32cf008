//! CLI argument parsing into a validated `EngineConfig`.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use remote_core::{DriverError, EngineConfig, TransportKind};
use remote_proto::frame::DEFAULT_MAX_FRAME_LEN;

/// Command-line arguments for the demo binary (and any other embedder
/// that wants a ready-made CLI surface over [`EngineConfig`]).
#[derive(Debug, Parser)]
#[command(name = "remote-driver-demo", about = "Demo driver engine for the remote display bridge")]
pub struct Args {
    /// Which transport to run.
    #[arg(long, value_enum)]
    pub transport: TransportArg,

    /// Bind host (`tcp-server`) or remote host (`tcp`).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (`tcp-server`) or remote port (`tcp`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Unix-domain socket path.
    #[arg(long)]
    pub path: Option<String>,

    /// WebSocket URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Reconnect interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub reconnect_interval_ms: u64,

    /// Design viewport width.
    #[arg(long, default_value_t = 1080)]
    pub viewport_width: u32,

    /// Design viewport height.
    #[arg(long, default_value_t = 2400)]
    pub viewport_height: u32,

    /// Maximum accepted frame length in bytes, rejected as a defense-in-depth bound.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    pub max_frame_len: usize,
}

/// CLI-facing mirror of [`TransportKind`].
///
/// `clap::ValueEnum` needs a type it derives parsing for directly; an
/// enum this crate only imports from `remote-core` can't receive that
/// derive, so this is the small adapter layer between CLI surface and
/// engine configuration.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    /// Multi-client inbound TCP server.
    TcpServer,
    /// Single-peer outbound TCP client.
    Tcp,
    /// Single-peer outbound Unix-domain socket client.
    UnixSocket,
    /// Single-peer outbound WebSocket client.
    WebSocket,
}

impl From<TransportArg> for TransportKind {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::TcpServer => Self::TcpServer,
            TransportArg::Tcp => Self::Tcp,
            TransportArg::UnixSocket => Self::UnixSocket,
            TransportArg::WebSocket => Self::WebSocket,
        }
    }
}

/// Errors building an [`EngineConfig`] from parsed [`Args`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The transport-specific validation in [`EngineConfig::validate`] failed.
    #[error(transparent)]
    Invalid(#[from] DriverError),
}

impl Args {
    /// Build and validate an [`EngineConfig`] from these parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the chosen transport is missing
    /// a field it requires.
    pub fn into_engine_config(self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            transport: self.transport.into(),
            host: self.host,
            port: self.port,
            path: self.path,
            url: self.url,
            reconnect_interval: Duration::from_millis(self.reconnect_interval_ms),
            viewport_design_size: (self.viewport_width, self.viewport_height),
            max_frame_len: self.max_frame_len,
        };

        config.validate()?;
        Ok(config)
    }
}
