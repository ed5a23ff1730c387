//! Counter source trait for network I/O counters

use crate::Result;
use crate::types::IoCounters;

/// Trait for network counter sources
///
/// Sources abstract over where cumulative counters come from: the operating
/// system, a scripted sequence for tests, or a remote agent. The sampler and
/// the monitor only ever see this trait.
#[async_trait::async_trait]
pub trait CounterSource: Send + 'static {
    /// Read cumulative counters
    ///
    /// Returns:
    /// - `per_interface == false`: a single aggregate snapshot over all interfaces
    /// - `per_interface == true`: one snapshot per interface
    /// - `Err(e)`: the platform could not report counters
    async fn io_counters(&mut self, per_interface: bool) -> Result<Vec<IoCounters>>;

    /// Short name of the source, used in logs
    fn name(&self) -> &str;
}
