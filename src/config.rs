//! Monitor configuration.

use crate::error::{Result, SystemError};
use crate::sensors::gpu::GpuCommand;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the telemetry monitor.
///
/// Every value is fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// IPv4 address of the display
    pub target_ip: Ipv4Addr,
    /// UDP port of the display
    pub port: u16,
    /// Time slept between two ticks
    pub interval: Duration,
    /// Mount point reported as `disk_percent`
    pub disk_mount: PathBuf,
    /// Root of the hardware-monitor device tree
    pub hwmon_root: PathBuf,
    /// External command used for GPU temperature
    pub gpu_command: GpuCommand,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_ip: crate::DEFAULT_TARGET_IP,
            port: crate::DEFAULT_UDP_PORT,
            interval: Duration::from_secs(crate::DEFAULT_INTERVAL_SECS),
            disk_mount: PathBuf::from(crate::DEFAULT_DISK_MOUNT),
            hwmon_root: PathBuf::from(crate::DEFAULT_HWMON_ROOT),
            gpu_command: GpuCommand::default(),
        }
    }
}

impl MonitorConfig {
    /// Create a configuration aimed at a custom display address.
    pub fn new(target_ip: Ipv4Addr, port: u16) -> Self {
        Self {
            target_ip,
            port,
            ..Default::default()
        }
    }

    /// Set the display address.
    pub fn with_target_ip(mut self, target_ip: Ipv4Addr) -> Self {
        self.target_ip = target_ip;
        self
    }

    /// Set the display port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the mount point used for disk usage.
    pub fn with_disk_mount(mut self, mount: impl Into<PathBuf>) -> Self {
        self.disk_mount = mount.into();
        self
    }

    /// Set the hardware-monitor root directory.
    pub fn with_hwmon_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.hwmon_root = root.into();
        self
    }

    /// Set the GPU diagnostic command.
    pub fn with_gpu_command(mut self, command: GpuCommand) -> Self {
        self.gpu_command = command;
        self
    }

    /// Get the full destination address.
    pub fn target(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.target_ip, self.port))
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(SystemError::config_error("destination port must be non-zero"));
        }
        if self.interval.is_zero() {
            return Err(SystemError::config_error("tick interval must be non-zero"));
        }
        if self.gpu_command.timeout.is_zero() {
            return Err(SystemError::config_error("GPU query timeout must be non-zero"));
        }
        Ok(())
    }
}
