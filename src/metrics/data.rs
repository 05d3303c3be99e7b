//! Data structures for telemetry samples.

use serde::{Deserialize, Serialize};
use std::fmt;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One tick's worth of host telemetry.
///
/// Field order and names are the wire schema. Hardware fields are `None` when
/// their sensor was never resolved or could not be read this tick, and are
/// serialized as `null`, never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sample {
    /// Local wall-clock time, `HH:MM`
    pub timestamp: String,
    /// CPU usage percentage (0.0 to 100.0)
    pub cpu_percent: f64,
    /// Memory usage percentage (0.0 to 100.0)
    pub ram_percent: f64,
    /// Used memory in GB
    pub ram_used_gb: f64,
    /// Total memory in GB
    pub ram_total_gb: f64,
    /// Usage percentage of the monitored filesystem (0.0 to 100.0)
    pub disk_percent: f64,
    /// CPU temperature in whole degrees Celsius
    #[serde(deserialize_with = "Option::deserialize")]
    pub cpu_temp: Option<i64>,
    /// GPU temperature in whole degrees Celsius
    #[serde(deserialize_with = "Option::deserialize")]
    pub gpu_temp: Option<i64>,
    /// Fan speed in RPM
    #[serde(deserialize_with = "Option::deserialize")]
    pub fan_speed: Option<i64>,
    /// Liveness marker
    pub status: Status,
}

/// Liveness marker carried by every sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Online,
}

impl Sample {
    /// Format the local time the way the display expects it.
    pub fn timestamp_now() -> String {
        chrono::Local::now().format("%H:%M").to_string()
    }

    /// One-line operator summary, e.g.
    /// `[14:07] CPU 42.3% (55°C) | GPU --°C | RAM 61.0% | Fan 1200`.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] CPU {:.1}% ({}°C) | GPU {}°C | RAM {:.1}% | Fan {}",
            self.timestamp,
            self.cpu_percent,
            Reading(self.cpu_temp),
            Reading(self.gpu_temp),
            self.ram_percent,
            Reading(self.fan_speed),
        )
    }
}

/// Renders an absent reading as `--`.
struct Reading(Option<i64>);

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("--"),
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp to 0-100 and round to one decimal place. NaN becomes 0.
pub fn percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round1(value.clamp(0.0, 100.0))
}

/// Share of `part` in `total` as a percentage; 0 when `total` is 0.
pub fn ratio_percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    percent(part as f64 / total as f64 * 100.0)
}

/// Bytes to GB (1024^3) with one decimal.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round1(bytes as f64 / BYTES_PER_GB)
}

/// Truncate a sensor reading to a whole number.
pub fn truncate_reading(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}
