//! Cumulative network I/O counter snapshots

use serde::{Deserialize, Serialize};

/// Name given to a snapshot summed over every interface.
pub const AGGREGATE_COUNTER_NAME: &str = "all";

/// Cumulative byte and packet counters for one interface (or an aggregate)
///
/// Values are totals since boot or since the counter source started, as
/// reported by the platform. Deltas between two snapshots give the traffic
/// of an interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoCounters {
    /// Interface name, or [`AGGREGATE_COUNTER_NAME`]
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

impl IoCounters {
    /// Create a counter snapshot
    pub fn new(
        name: impl Into<String>,
        bytes_sent: u64,
        bytes_recv: u64,
        packets_sent: u64,
        packets_recv: u64,
    ) -> Self {
        Self { name: name.into(), bytes_sent, bytes_recv, packets_sent, packets_recv }
    }

    /// Sum several snapshots into one named aggregate
    ///
    /// Sums saturate instead of wrapping.
    pub fn aggregate<'a, I>(name: impl Into<String>, counters: I) -> Self
    where
        I: IntoIterator<Item = &'a IoCounters>,
    {
        counters.into_iter().fold(Self::new(name, 0, 0, 0, 0), |mut acc, c| {
            acc.bytes_sent = acc.bytes_sent.saturating_add(c.bytes_sent);
            acc.bytes_recv = acc.bytes_recv.saturating_add(c.bytes_recv);
            acc.packets_sent = acc.packets_sent.saturating_add(c.packets_sent);
            acc.packets_recv = acc.packets_recv.saturating_add(c.packets_recv);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_sums_every_counter() {
        let eth = IoCounters::new("eth0", 100, 200, 1, 2);
        let wlan = IoCounters::new("wlan0", 10, 20, 3, 4);

        let total = IoCounters::aggregate(AGGREGATE_COUNTER_NAME, [&eth, &wlan]);

        assert_eq!(total, IoCounters::new("all", 110, 220, 4, 6));
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let total = IoCounters::aggregate("none", std::iter::empty());
        assert_eq!(total, IoCounters::new("none", 0, 0, 0, 0));
    }

    #[test]
    fn aggregate_saturates() {
        let a = IoCounters::new("a", u64::MAX, 0, 0, 0);
        let b = IoCounters::new("b", 5, 0, 0, 0);
        assert_eq!(IoCounters::aggregate("x", [&a, &b]).bytes_sent, u64::MAX);
    }
}
