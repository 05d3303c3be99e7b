//! Error handling for the hwpulse telemetry crate.

use std::path::PathBuf;
use std::time::Duration;

/// A specialized `Result` type for hwpulse operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// The main error type for hwpulse operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The hardware-monitor interface could not be opened at all
    #[error("Hardware monitor unavailable at {}: {source}", .path.display())]
    HardwareMonitorUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hardware-monitor operation failed
    #[error("Hardware monitor error: {0}")]
    HardwareMonitor(String),

    /// Sensor value or command output parsing failed
    #[error("Failed to parse sensor value: {0}")]
    ParseError(String),

    /// Network operation failed
    #[error("Network error: {0}")]
    Network(String),

    /// Payload encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External command did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic system error
    #[error("System error: {0}")]
    System(String),
}

impl SystemError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new network error
    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new hardware-monitor error
    pub fn hardware_monitor_error(msg: impl Into<String>) -> Self {
        Self::HardwareMonitor(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new generic system error
    #[allow(clippy::self_named_constructors)]
    pub fn system_error(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// Whether this error means the hardware-monitor subsystem is missing
    /// entirely, as opposed to a single sensor misbehaving.
    pub fn is_hardware_monitor_unavailable(&self) -> bool {
        matches!(self, Self::HardwareMonitorUnavailable { .. })
    }
}
