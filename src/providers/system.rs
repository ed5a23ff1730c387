//! Operating system counters via `sysinfo`

use sysinfo::Networks;
use tracing::{debug, trace};

use crate::provider::CounterSource;
use crate::types::{AGGREGATE_COUNTER_NAME, IoCounters};
use crate::{NetworkError, Result};

/// Counter source backed by the platform's interface statistics
///
/// Totals are cumulative per interface as reported by the OS; the aggregate
/// snapshot is their sum.
pub struct SystemCounters {
    networks: Networks,
}

impl SystemCounters {
    /// Create a source with a freshly enumerated interface list
    pub fn new() -> Self {
        let networks = Networks::new_with_refreshed_list();
        debug!(interfaces = networks.list().len(), "Enumerated network interfaces");
        Self { networks }
    }

    fn snapshot(&mut self) -> Vec<IoCounters> {
        // Drop interfaces that disappeared and pick up new ones
        self.networks.refresh(true);

        let mut counters: Vec<IoCounters> = self
            .networks
            .list()
            .iter()
            .map(|(name, data)| {
                IoCounters::new(
                    name.as_str(),
                    data.total_transmitted(),
                    data.total_received(),
                    data.total_packets_transmitted(),
                    data.total_packets_received(),
                )
            })
            .collect();
        counters.sort_by(|a, b| a.name.cmp(&b.name));
        counters
    }
}

impl Default for SystemCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CounterSource for SystemCounters {
    async fn io_counters(&mut self, per_interface: bool) -> Result<Vec<IoCounters>> {
        let counters = self.snapshot();
        trace!(interfaces = counters.len(), per_interface, "Read system counters");

        if counters.is_empty() {
            return Err(NetworkError::counter_read_failed(
                "platform reported no network interfaces",
            ));
        }

        if per_interface {
            Ok(counters)
        } else {
            Ok(vec![IoCounters::aggregate(AGGREGATE_COUNTER_NAME, &counters)])
        }
    }

    fn name(&self) -> &str {
        "system"
    }
}
