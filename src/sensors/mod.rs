//! Hardware sensor discovery and access.
//!
//! The rest of the crate only sees the [`HardwareMonitor`] capability
//! (enumerate channels, read one channel by handle). Which adapter backs it is
//! decided at build time: hwmon sysfs on Linux, an always-unavailable stub
//! elsewhere.

pub mod gpu;
pub mod hwmon;
pub mod resolver;

#[cfg(target_os = "linux")]
#[path = "platform_linux.rs"]
mod platform;

#[cfg(not(target_os = "linux"))]
#[path = "platform_other.rs"]
mod platform;

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

pub use hwmon::HwmonBackend;
pub use platform::{default_monitor, PlatformMonitor};

/// What a sensor channel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorKind {
    /// Temperature, read in degrees Celsius
    Temperature,
    /// Fan speed, read in RPM
    Fan,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Temperature => f.write_str("temperature"),
            SensorKind::Fan => f.write_str("fan"),
        }
    }
}

/// Resolved reference to one sensor channel.
///
/// Only the location is kept, never a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorHandle {
    path: PathBuf,
    kind: SensorKind,
}

impl SensorHandle {
    pub fn new(path: impl Into<PathBuf>, kind: SensorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }
}

impl fmt::Display for SensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// One channel as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    /// Driver/chip name (e.g. "k10temp", "nct6775")
    pub chip: String,
    /// Channel label if the driver exposes one (e.g. "Tctl")
    pub label: Option<String>,
    /// Where to read the channel from
    pub handle: SensorHandle,
}

impl SensorInfo {
    pub fn kind(&self) -> SensorKind {
        self.handle.kind()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// Platform hardware-monitor capability.
pub trait HardwareMonitor {
    /// List every temperature and fan channel, in a stable order.
    ///
    /// Fails only when the hardware-monitor subsystem itself is unavailable.
    fn enumerate(&self) -> Result<Vec<SensorInfo>>;

    /// Read the current value of one channel in its natural unit
    /// (degrees Celsius or RPM).
    fn read(&self, handle: &SensorHandle) -> Result<f64>;
}
