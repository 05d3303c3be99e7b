//! Stub hardware monitor for platforms without a supported interface.

use super::{HardwareMonitor, SensorHandle, SensorInfo};
use crate::config::MonitorConfig;
use crate::error::{Result, SystemError};

/// Always reports the hardware-monitor subsystem as unavailable.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedMonitor;

pub type PlatformMonitor = UnsupportedMonitor;

pub fn default_monitor(_config: &MonitorConfig) -> PlatformMonitor {
    UnsupportedMonitor
}

impl HardwareMonitor for UnsupportedMonitor {
    fn enumerate(&self) -> Result<Vec<SensorInfo>> {
        Err(SystemError::HardwareMonitorUnavailable {
            path: std::path::PathBuf::from(crate::DEFAULT_HWMON_ROOT),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("no hardware-monitor interface on {}", std::env::consts::OS),
            ),
        })
    }

    fn read(&self, handle: &SensorHandle) -> Result<f64> {
        Err(SystemError::hardware_monitor_error(format!(
            "cannot read {handle} on {}",
            std::env::consts::OS
        )))
    }
}
