//! Linux hwmon sysfs adapter.
//!
//! Layout: `<root>/hwmonN/name` holds the chip name, `tempM_input` holds
//! millidegrees Celsius, `fanM_input` holds RPM, and an optional `*_label`
//! sits next to each input.

use crate::error::{Result, SystemError};
use crate::sensors::{HardwareMonitor, SensorHandle, SensorInfo, SensorKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hardware monitor backed by a hwmon sysfs tree.
#[derive(Debug, Clone)]
pub struct HwmonBackend {
    root: PathBuf,
}

impl HwmonBackend {
    /// Create a backend reading from `root` (normally `/sys/class/hwmon`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List device directories, ordered hwmon0, hwmon1, ..., hwmon10.
    fn device_dirs(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|source| {
            SystemError::HardwareMonitorUnavailable {
                path: self.root.clone(),
                source,
            }
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort_by_key(|path| natural_key(path));
        Ok(dirs)
    }

    /// Collect the temperature and fan channels of one device.
    fn device_channels(&self, dir: &Path, chip: &str) -> Vec<SensorInfo> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut channels: Vec<(SensorKind, u32, SensorInfo)> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                let (kind, index) = parse_channel(file_name)?;
                let label_path = dir.join(file_name.replace("_input", "_label"));
                let info = SensorInfo {
                    chip: chip.to_string(),
                    label: read_trimmed(&label_path),
                    handle: SensorHandle::new(entry.path(), kind),
                };
                Some((kind, index, info))
            })
            .collect();

        channels.sort_by_key(|(kind, index, _)| (*kind, *index));
        channels.into_iter().map(|(_, _, info)| info).collect()
    }
}

impl HardwareMonitor for HwmonBackend {
    fn enumerate(&self) -> Result<Vec<SensorInfo>> {
        let mut sensors = Vec::new();
        let dirs = self.device_dirs()?;
        debug!(root = %self.root().display(), devices = dirs.len(), "Scanning hwmon");

        for dir in dirs {
            // Devices without a name file are not hwmon chips.
            let Some(chip) = read_trimmed(&dir.join("name")) else {
                continue;
            };

            let device = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Found: {} ({})", chip, device);

            let channels = self.device_channels(&dir, &chip);
            debug!(chip = %chip, channels = channels.len(), "Enumerated hwmon device");
            sensors.extend(channels);
        }

        Ok(sensors)
    }

    fn read(&self, handle: &SensorHandle) -> Result<f64> {
        let raw = fs::read_to_string(handle.path())?;
        let raw = raw.trim();
        let value: i64 = raw.parse().map_err(|_| {
            SystemError::parse_error(format!("{} {}: {:?}", handle.kind(), handle, raw))
        })?;

        Ok(match handle.kind() {
            SensorKind::Temperature => value as f64 / 1000.0,
            SensorKind::Fan => value as f64,
        })
    }
}

/// Parse `temp3_input` into (Temperature, 3) and `fan1_input` into (Fan, 1).
fn parse_channel(file_name: &str) -> Option<(SensorKind, u32)> {
    let stem = file_name.strip_suffix("_input")?;
    let (kind, digits) = if let Some(digits) = stem.strip_prefix("temp") {
        (SensorKind::Temperature, digits)
    } else if let Some(digits) = stem.strip_prefix("fan") {
        (SensorKind::Fan, digits)
    } else {
        return None;
    };
    let index = digits.parse().ok()?;
    Some((kind, index))
}

/// Sort key keeping `hwmon2` ahead of `hwmon10`.
fn natural_key(path: &Path) -> (String, u32) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let split = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let number = name[split..].parse().unwrap_or(0);
    (name[..split].to_string(), number)
}

/// Reads a file and trims whitespace.
fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
