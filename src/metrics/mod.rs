//! Telemetry sampling and the sample data structure.
//!
//! This module turns OS counters (via sysinfo) and the hardware sensors
//! resolved at startup into one flat [`Sample`] per tick.

pub mod collector;
pub mod data;
pub mod traits;

// Re-export commonly used items
pub use collector::SystemSampler;
pub use data::{Sample, Status};
pub use traits::MetricsProvider;
