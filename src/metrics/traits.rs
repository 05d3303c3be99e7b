//! Traits for telemetry sampling.

use crate::metrics::data::Sample;

/// Source of one [`Sample`] per tick.
///
/// Implementations must not fail: anything that cannot be measured this tick
/// is reported as absent inside the sample, and the call returns within a
/// bounded time.
pub trait MetricsProvider {
    /// Take a fresh sample.
    fn sample(&mut self) -> impl std::future::Future<Output = Sample> + Send;
}
