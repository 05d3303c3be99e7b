//! The sample-publish-sleep loop.
//!
//! `Monitor::initialize` covers startup: sensor resolution, socket binding and
//! CPU calibration. Any error there stops the process before the loop starts.
//! `Monitor::run` then ticks until the shutdown future completes.

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::metrics::{collector::SystemSampler, data::Sample, traits::MetricsProvider};
use crate::publish::UdpPublisher;
use crate::sensors::{default_monitor, resolver::resolve, PlatformMonitor};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Completed sample-and-publish iterations
    pub ticks: u64,
    /// Ticks whose datagram could not be sent
    pub send_failures: u64,
}

/// Sampling loop bound to one provider and one publisher.
pub struct Monitor<P> {
    provider: P,
    publisher: UdpPublisher,
    interval: Duration,
}

impl Monitor<SystemSampler<PlatformMonitor>> {
    /// Resolve sensors, open the socket and calibrate CPU measurement.
    ///
    /// Fails when the hardware-monitor subsystem is unavailable or the
    /// socket cannot be bound.
    pub async fn initialize(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;

        let hardware = default_monitor(config);
        let sensors = resolve(&hardware, &config.gpu_command)?;
        info!(
            "{} of 3 hardware sensors resolved",
            sensors.resolved_count()
        );

        let mut sampler = SystemSampler::new(hardware, sensors, config.disk_mount.clone());
        let publisher = UdpPublisher::bind(config.target()).await?;

        debug!("Calibrating CPU usage measurement");
        sampler.calibrate().await;

        Ok(Self::new(sampler, publisher, config.interval))
    }
}

impl<P: MetricsProvider> Monitor<P> {
    pub fn new(provider: P, publisher: UdpPublisher, interval: Duration) -> Self {
        Self {
            provider,
            publisher,
            interval,
        }
    }

    pub fn target(&self) -> std::net::SocketAddr {
        self.publisher.target()
    }

    /// Sample once and publish the result.
    ///
    /// Returns the sample and whether its datagram was sent.
    pub async fn tick(&mut self) -> (Sample, bool) {
        let sample = self.provider.sample().await;
        let sent = self.publisher.publish(&sample).await;
        (sample, sent)
    }

    /// Tick every `interval` until `shutdown` completes.
    ///
    /// Shutdown is only observed while sleeping, so a tick in progress always
    /// finishes. The socket is released when this returns.
    pub async fn run<F>(mut self, shutdown: F) -> RunStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stats = RunStats::default();

        info!(
            remote = %self.publisher.target(),
            interval_ms = self.interval.as_millis() as u64,
            "Monitoring started (Ctrl+C to stop)"
        );

        loop {
            let (_, sent) = self.tick().await;
            stats.ticks += 1;
            if !sent {
                stats.send_failures += 1;
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.publisher.close();
        if stats.send_failures > 0 {
            warn!(failures = stats.send_failures, "Some samples were not sent");
        }
        info!(ticks = stats.ticks, "Stopped.");
        stats
    }
}

/// Install SIGINT/SIGTERM handlers and return a future completing on either.
///
/// Handlers are registered immediately, so a signal arriving before the
/// future is first polled is not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("Received interrupt signal"),
            _ = terminate.recv() => info!("Received terminate signal"),
        }
    })
}

/// Return a future completing on Ctrl+C.
#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(err) => {
                warn!(error = %err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_signal_completes_on_sigterm() {
        let shutdown = shutdown_signal().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        assert!(tokio::time::timeout(Duration::from_secs(5), shutdown)
            .await
            .is_ok());
    }
}
