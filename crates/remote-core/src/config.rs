//! Transport configuration, validated once at engine construction.

use std::time::Duration;

use crate::error::DriverError;

/// The default reconnect interval, used when the host doesn't specify one.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(1000);

/// Which concrete transport an [`EngineConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Multi-client inbound TCP server.
    TcpServer,
    /// Single-peer outbound TCP client.
    Tcp,
    /// Single-peer outbound Unix-domain socket client.
    UnixSocket,
    /// Single-peer outbound WebSocket client (binary frames only).
    WebSocket,
}

/// Resolved, validated configuration for one engine instance.
///
/// Constructed by `remote-driver`'s CLI/config layer; this crate only owns
/// the data shape and the validation rule each [`TransportKind`] requires,
/// to keep `remote-transport`'s connector dispatcher and `remote-driver`'s
/// engine both working from a single, already-validated source of truth
/// without a dependency cycle between the two crates.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which transport to construct.
    pub transport: TransportKind,
    /// Bind host (`TcpServer`) or remote host (`Tcp`); unused otherwise.
    pub host: Option<String>,
    /// Bind port (`TcpServer`) or remote port (`Tcp`); unused otherwise.
    pub port: Option<u16>,
    /// Filesystem path (`UnixSocket`); unused otherwise.
    pub path: Option<String>,
    /// Remote URL (`WebSocket`); unused otherwise.
    pub url: Option<String>,
    /// Delay between a disconnect and the next reconnect attempt.
    pub reconnect_interval: Duration,
    /// The design (logical) canvas size the scene is authored for.
    pub viewport_design_size: (u32, u32),
    /// Defense-in-depth cap on one frame's declared payload length.
    pub max_frame_len: usize,
}

impl EngineConfig {
    /// Check that the fields required by `self.transport` are present.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ConfigInvalid`] naming the missing field.
    pub fn validate(&self) -> Result<(), DriverError> {
        match self.transport {
            TransportKind::TcpServer | TransportKind::Tcp => {
                if self.port.is_none() {
                    return Err(DriverError::ConfigInvalid(format!(
                        "port is required for {:?} transport",
                        self.transport
                    )));
                }
            },
            TransportKind::UnixSocket => {
                if self.path.is_none() {
                    return Err(DriverError::ConfigInvalid("path is required for unix-socket transport".to_string()));
                }
            },
            TransportKind::WebSocket => {
                if self.url.is_none() {
                    return Err(DriverError::ConfigInvalid("url is required for websocket transport".to_string()));
                }
            },
        }
        Ok(())
    }
}
