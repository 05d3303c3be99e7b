//! Linux: sensors come from hwmon sysfs.

use super::HwmonBackend;
use crate::config::MonitorConfig;

pub type PlatformMonitor = HwmonBackend;

pub fn default_monitor(config: &MonitorConfig) -> PlatformMonitor {
    HwmonBackend::new(config.hwmon_root.clone())
}
