//! # hwpulse - host telemetry over UDP
//!
//! Samples CPU load, memory, disk usage, CPU/GPU temperature and fan speed on
//! a fixed cadence and fires each sample as one JSON datagram at a small
//! external display.
//!
//! ## Features
//!
//! - **Sensor discovery**: hwmon channels are resolved once at startup
//! - **Degrade, don't fail**: a sensor that stops answering turns into `null`
//! - **Fire-and-forget transport**: one UDP datagram per tick, no retries
//! - **Library + Binary**: use as a crate or standalone daemon
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hwpulse::{shutdown_signal, Monitor, MonitorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shutdown = shutdown_signal()?;
//!     let monitor = Monitor::initialize(&MonitorConfig::default()).await?;
//!     monitor.run(shutdown).await;
//!     Ok(())
//! }
//! ```

use std::net::Ipv4Addr;
use std::time::Duration;

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod publish;
pub mod sensors;

// Re-export public API
pub use config::MonitorConfig;
pub use error::{Result, SystemError};
pub use metrics::{
    collector::SystemSampler,
    data::{Sample, Status},
    traits::MetricsProvider,
};
pub use monitor::{shutdown_signal, Monitor, RunStats};
pub use publish::UdpPublisher;
pub use sensors::{
    gpu::{GpuCommand, GpuSource},
    resolver::{resolve, ResolvedSensors},
    HardwareMonitor, HwmonBackend, SensorHandle, SensorInfo, SensorKind,
};

/// Address of the display that receives the datagrams
pub const DEFAULT_TARGET_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 19);

/// UDP port the display listens on
pub const DEFAULT_UDP_PORT: u16 = 4210;

/// Seconds between two ticks
pub const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Upper bound for one GPU diagnostic command invocation
pub const GPU_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Length of the one-time CPU usage priming window
pub const CPU_CALIBRATION_INTERVAL: Duration = Duration::from_secs(1);

/// Where Linux exposes hardware-monitor devices
pub const DEFAULT_HWMON_ROOT: &str = "/sys/class/hwmon";

/// Filesystem whose usage is reported as `disk_percent`
pub const DEFAULT_DISK_MOUNT: &str = "/";
