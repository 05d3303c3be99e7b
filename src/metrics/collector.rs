//! Per-tick sampling implementation.

use crate::metrics::{
    data::{self, Sample, Status},
    traits::MetricsProvider,
};
use crate::sensors::{
    gpu::GpuSource, resolver::ResolvedSensors, HardwareMonitor, SensorHandle,
};
use std::path::PathBuf;
use sysinfo::{Disks, System};
use tracing::debug;

/// Samples OS metrics through sysinfo and hardware metrics through the
/// handles resolved at startup.
pub struct SystemSampler<M> {
    system: System,
    disks: Disks,
    monitor: M,
    sensors: ResolvedSensors,
    disk_mount: PathBuf,
}

/// Memory figures of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MemoryReading {
    percent: f64,
    used_gb: f64,
    total_gb: f64,
}

impl<M: HardwareMonitor> SystemSampler<M> {
    /// Create a sampler. CPU usage reads as 0 until [`calibrate`] has run.
    ///
    /// [`calibrate`]: SystemSampler::calibrate
    pub fn new(monitor: M, sensors: ResolvedSensors, disk_mount: impl Into<PathBuf>) -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            monitor,
            sensors,
            disk_mount: disk_mount.into(),
        }
    }

    /// Prime the CPU usage window with one blocking measurement.
    ///
    /// Called once before the loop; later ticks measure usage since the
    /// previous tick without waiting.
    pub async fn calibrate(&mut self) {
        self.system.refresh_cpu_usage();
        tokio::time::sleep(crate::CPU_CALIBRATION_INTERVAL).await;
        self.system.refresh_cpu_usage();
    }

    /// Collect CPU usage since the previous refresh.
    fn collect_cpu_percent(&mut self) -> f64 {
        self.system.refresh_cpu_usage();
        data::percent(f64::from(self.system.global_cpu_usage()))
    }

    /// Collect memory usage.
    fn collect_memory(&mut self) -> MemoryReading {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let available = self.system.available_memory().min(total);

        MemoryReading {
            percent: data::ratio_percent(total - available, total),
            used_gb: data::bytes_to_gb(self.system.used_memory()),
            total_gb: data::bytes_to_gb(total),
        }
    }

    /// Collect usage of the filesystem holding `disk_mount`.
    fn collect_disk_percent(&mut self) -> f64 {
        self.disks.refresh();
        let mount = self.disk_mount.as_path();

        // Exact mount point first, else the deepest mount containing the path.
        let disk = self
            .disks
            .iter()
            .filter(|disk| mount.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().components().count());

        match disk {
            Some(disk) => {
                // sysinfo has no free-block count, so root-reserved blocks
                // count as used.
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                data::ratio_percent(used, total)
            }
            None => {
                debug!(mount = %mount.display(), "No filesystem found for mount point");
                0.0
            }
        }
    }

    /// Read one resolved sensor, degrading any failure to `None`.
    fn read_sensor(&self, handle: Option<&SensorHandle>, metric: &str) -> Option<i64> {
        let handle = handle?;
        match self.monitor.read(handle) {
            Ok(value) => data::truncate_reading(value),
            Err(err) => {
                debug!(metric, sensor = %handle, error = %err, "Sensor read failed");
                None
            }
        }
    }
}

/// Query the GPU temperature from whichever source was resolved.
async fn read_gpu_temp<M: HardwareMonitor>(
    monitor: &M,
    source: Option<&GpuSource>,
) -> Option<i64> {
    let result = match source? {
        GpuSource::Sensor(handle) => monitor.read(handle),
        GpuSource::Command(command) => command.query().await,
    };

    match result {
        Ok(value) => data::truncate_reading(value),
        Err(err) => {
            debug!(metric = "gpu_temp", error = %err, "GPU temperature unavailable");
            None
        }
    }
}

impl<M: HardwareMonitor + Send + Sync> MetricsProvider for SystemSampler<M> {
    async fn sample(&mut self) -> Sample {
        let timestamp = Sample::timestamp_now();
        let cpu_percent = self.collect_cpu_percent();
        let memory = self.collect_memory();
        let disk_percent = self.collect_disk_percent();

        let cpu_temp = self.read_sensor(self.sensors.cpu_temp.as_ref(), "cpu_temp");
        let fan_speed = self.read_sensor(self.sensors.fan_speed.as_ref(), "fan_speed");
        let gpu_temp = read_gpu_temp(&self.monitor, self.sensors.gpu_temp.as_ref()).await;

        Sample {
            timestamp,
            cpu_percent,
            ram_percent: memory.percent,
            ram_used_gb: memory.used_gb,
            ram_total_gb: memory.total_gb,
            disk_percent,
            cpu_temp,
            gpu_temp,
            fan_speed,
            status: Status::Online,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SystemError};
    use crate::sensors::{SensorInfo, SensorKind};

    /// Monitor answering from a fixed table; unknown handles fail.
    struct TableMonitor(Vec<(SensorHandle, f64)>);

    impl HardwareMonitor for TableMonitor {
        fn enumerate(&self) -> Result<Vec<SensorInfo>> {
            Ok(Vec::new())
        }

        fn read(&self, handle: &SensorHandle) -> Result<f64> {
            self.0
                .iter()
                .find(|(h, _)| h == handle)
                .map(|(_, value)| *value)
                .ok_or_else(|| SystemError::hardware_monitor_error("gone"))
        }
    }

    fn handle(name: &str, kind: SensorKind) -> SensorHandle {
        SensorHandle::new(format!("/hw/{name}"), kind)
    }

    #[tokio::test]
    async fn test_sample_reads_resolved_sensors() {
        let cpu = handle("temp1_input", SensorKind::Temperature);
        let fan = handle("fan1_input", SensorKind::Fan);
        let monitor = TableMonitor(vec![(cpu.clone(), 55.9), (fan.clone(), 1200.0)]);
        let sensors = ResolvedSensors {
            cpu_temp: Some(cpu),
            gpu_temp: None,
            fan_speed: Some(fan),
        };

        let mut sampler = SystemSampler::new(monitor, sensors, "/");
        let sample = sampler.sample().await;

        assert_eq!(sample.cpu_temp, Some(55));
        assert_eq!(sample.fan_speed, Some(1200));
        assert_eq!(sample.gpu_temp, None);
        assert_eq!(sample.status, Status::Online);
    }

    #[tokio::test]
    async fn test_failed_read_degrades_single_field() {
        let cpu = handle("temp1_input", SensorKind::Temperature);
        let fan = handle("fan1_input", SensorKind::Fan);
        let gpu = handle("gpu_temp1_input", SensorKind::Temperature);
        // The fan handle is not in the table, so reading it fails.
        let monitor = TableMonitor(vec![(cpu.clone(), 61.2), (gpu.clone(), 48.0)]);
        let sensors = ResolvedSensors {
            cpu_temp: Some(cpu),
            gpu_temp: Some(GpuSource::Sensor(gpu)),
            fan_speed: Some(fan),
        };

        let mut sampler = SystemSampler::new(monitor, sensors, "/");
        let sample = sampler.sample().await;

        assert_eq!(sample.cpu_temp, Some(61));
        assert_eq!(sample.gpu_temp, Some(48));
        assert_eq!(sample.fan_speed, None);
    }

    #[tokio::test]
    async fn test_os_metrics_in_range() {
        let mut sampler =
            SystemSampler::new(TableMonitor(Vec::new()), ResolvedSensors::default(), "/");
        let sample = sampler.sample().await;

        for value in [sample.cpu_percent, sample.ram_percent, sample.disk_percent] {
            assert!((0.0..=100.0).contains(&value), "{value} out of range");
        }
        assert!(sample.ram_total_gb >= sample.ram_used_gb);
        assert_eq!(sample.cpu_temp, None);
        assert_eq!(sample.gpu_temp, None);
        assert_eq!(sample.fan_speed, None);
    }
}
