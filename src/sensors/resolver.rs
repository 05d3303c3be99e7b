//! One-shot sensor resolution.
//!
//! Runs once before the sampling loop and turns the enumerated channels into a
//! fixed [`ResolvedSensors`] value. Metrics that find no match stay absent for
//! the rest of the process.

use crate::error::Result;
use crate::sensors::gpu::{GpuCommand, GpuSource};
use crate::sensors::{HardwareMonitor, SensorHandle, SensorInfo, SensorKind};
use tracing::{debug, info};

/// Chips that report the CPU temperature.
const CPU_CHIPS: &[&str] = &["k10temp", "zenpower", "coretemp", "cpu_thermal"];

/// Labels naming the CPU package sensor, best first.
const CPU_PACKAGE_LABELS: &[&str] = &["Tdie", "Tctl", "Package id 0", "CPU"];

/// GPU drivers that expose their temperature through hwmon.
const GPU_CHIPS: &[&str] = &["amdgpu", "radeon", "nouveau"];

const GPU_EDGE_LABELS: &[&str] = &["edge"];

/// Handles bound at startup, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSensors {
    pub cpu_temp: Option<SensorHandle>,
    pub gpu_temp: Option<GpuSource>,
    pub fan_speed: Option<SensorHandle>,
}

impl ResolvedSensors {
    /// Number of hardware metrics that found a source.
    pub fn resolved_count(&self) -> usize {
        [
            self.cpu_temp.is_some(),
            self.gpu_temp.is_some(),
            self.fan_speed.is_some(),
        ]
        .into_iter()
        .filter(|resolved| *resolved)
        .count()
    }
}

/// Enumerate the host's sensors and bind the CPU temperature, GPU temperature
/// and fan speed metrics.
///
/// Fails only if `monitor` cannot enumerate at all; the caller treats that as
/// fatal.
pub fn resolve<M>(monitor: &M, gpu_command: &GpuCommand) -> Result<ResolvedSensors>
where
    M: HardwareMonitor + ?Sized,
{
    info!("Scanning hardware sensors...");
    let sensors = monitor.enumerate()?;
    debug!(channels = sensors.len(), "Sensor enumeration finished");

    let cpu_temp = pick_temperature(&sensors, CPU_CHIPS, CPU_PACKAGE_LABELS);
    match &cpu_temp {
        Some(handle) => info!("✓ CPU temp: {}", handle),
        None => info!("✗ CPU temp: no matching sensor"),
    }

    let fan_speed = pick_first_fan(&sensors);
    match &fan_speed {
        Some(handle) => info!("✓ Fan: {}", handle),
        None => info!("✗ Fan: no fan channel"),
    }

    let gpu_temp = pick_temperature(&sensors, GPU_CHIPS, GPU_EDGE_LABELS)
        .map(GpuSource::Sensor)
        .or_else(|| {
            gpu_command
                .is_available()
                .then(|| GpuSource::Command(gpu_command.clone()))
        });
    match &gpu_temp {
        Some(source) => info!("✓ GPU temp: {}", source),
        None => info!("✗ GPU temp: no GPU sensor and `{}` not found", gpu_command.program),
    }

    Ok(ResolvedSensors {
        cpu_temp,
        gpu_temp,
        fan_speed,
    })
}

/// Temperature channel on one of `chips`, preferring the first label in
/// `labels` that exists, else the first channel in enumeration order.
fn pick_temperature(
    sensors: &[SensorInfo],
    chips: &[&str],
    labels: &[&str],
) -> Option<SensorHandle> {
    let candidates: Vec<&SensorInfo> = sensors
        .iter()
        .filter(|s| s.kind() == SensorKind::Temperature && chips.contains(&s.chip.as_str()))
        .collect();

    if candidates.len() > 1 {
        debug!(
            candidates = candidates.len(),
            "Several temperature channels match, picking by label"
        );
    }

    labels
        .iter()
        .find_map(|label| candidates.iter().find(|s| s.has_label(label)))
        .or_else(|| candidates.first())
        .map(|s| s.handle.clone())
}

/// First fan channel on any device.
///
/// Multi-fan boards report only this one.
fn pick_first_fan(sensors: &[SensorInfo]) -> Option<SensorHandle> {
    let mut fans = sensors.iter().filter(|s| s.kind() == SensorKind::Fan);
    let first = fans.next()?;

    let ignored = fans.count();
    if ignored > 0 {
        info!("{} more fan channel(s) found, reporting only the first", ignored);
    }

    Some(first.handle.clone())
}
