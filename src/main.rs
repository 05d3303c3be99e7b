//! hwpulse - host telemetry sender binary
//!
//! Resolves the hardware sensors, then streams one JSON datagram per tick to
//! the display until interrupted.

use anyhow::Context;
use clap::Parser;
use hwpulse::{shutdown_signal, Monitor, MonitorConfig, DEFAULT_INTERVAL_SECS, DEFAULT_UDP_PORT};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "hwpulse")]
#[command(about = "Host telemetry sender for external stats displays")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
#[command(
    long_about = "Samples CPU, memory, disk, temperatures and fan speed and sends them as UDP datagrams to a display"
)]
struct Cli {
    /// Display IPv4 address
    #[arg(long, default_value_t = hwpulse::DEFAULT_TARGET_IP)]
    target: Ipv4Addr,

    /// Display UDP port
    #[arg(short, long, default_value_t = DEFAULT_UDP_PORT)]
    port: u16,

    /// Seconds between two samples
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Mount point whose usage is reported as disk usage
    #[arg(long, default_value = hwpulse::DEFAULT_DISK_MOUNT)]
    mount: PathBuf,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn config(&self) -> MonitorConfig {
        MonitorConfig::new(self.target, self.port)
            .with_interval(Duration::from_secs(self.interval))
            .with_disk_mount(self.mount.clone())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = cli.config();
    print_banner(&config);

    // Installed before initialization so an early Ctrl+C is not lost.
    let shutdown = shutdown_signal().context("failed to install signal handlers")?;

    let monitor = Monitor::initialize(&config).await.map_err(|err| {
        if err.is_hardware_monitor_unavailable() {
            eprintln!("No hardware-monitor interface found. Is the hwmon driver for this board loaded?");
        }
        anyhow::Error::new(err).context("startup failed")
    })?;

    println!("{}", "-".repeat(60));
    let stats = monitor.run(shutdown).await;
    info!(ticks = stats.ticks, "Exiting");

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    Ok(())
}

fn print_banner(config: &MonitorConfig) {
    println!("{}", "=".repeat(60));
    println!("hwpulse - host telemetry sender");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!("   Target: {} every {}s", config.target(), config.interval.as_secs());
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["hwpulse", "--port", "9090", "--target", "10.0.0.7"]).unwrap();
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.config().target().to_string(), "10.0.0.7:9090");
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["hwpulse"]).unwrap();
        assert_eq!(cli.port, DEFAULT_UDP_PORT);
        assert_eq!(cli.interval, DEFAULT_INTERVAL_SECS);
        assert_eq!(cli.config(), MonitorConfig::default());
    }

    #[test]
    fn test_quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["hwpulse", "-q", "-d"]).is_err());
    }
}
