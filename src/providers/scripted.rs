//! Scripted counters for deterministic sampling

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::provider::CounterSource;
use crate::types::{AGGREGATE_COUNTER_NAME, IoCounters};
use crate::{NetworkError, Result};

enum Step {
    Snapshot(Vec<IoCounters>),
    Failure(String),
}

/// Counter source that replays a queued script of per-interface snapshots
///
/// Each read consumes one step. Once the script is exhausted the last
/// successful snapshot repeats, which models an idle link. Failure steps
/// surface as [`NetworkError::CounterRead`].
///
/// ```rust
/// use netdelay::{CounterSource, IoCounters, providers::ScriptedCounters};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> netdelay::Result<()> {
/// let mut source = ScriptedCounters::new()
///     .then_snapshot(vec![IoCounters::new("eth0", 0, 0, 0, 0)])
///     .then_snapshot(vec![IoCounters::new("eth0", 1500, 3000, 1, 2)]);
///
/// let first = source.io_counters(false).await?;
/// let second = source.io_counters(false).await?;
/// assert_eq!(second[0].bytes_recv - first[0].bytes_recv, 3000);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ScriptedCounters {
    steps: VecDeque<Step>,
    last: Option<Vec<IoCounters>>,
    reads: usize,
}

impl ScriptedCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a per-interface snapshot
    pub fn then_snapshot(mut self, counters: Vec<IoCounters>) -> Self {
        self.push_snapshot(counters);
        self
    }

    /// Queue a read failure
    pub fn then_failure(mut self, reason: impl Into<String>) -> Self {
        self.steps.push_back(Step::Failure(reason.into()));
        self
    }

    /// Queue a per-interface snapshot on an existing source
    pub fn push_snapshot(&mut self, counters: Vec<IoCounters>) {
        self.steps.push_back(Step::Snapshot(counters));
    }

    /// Number of reads served so far, failures included
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn next_snapshot(&mut self) -> Result<Vec<IoCounters>> {
        match self.steps.pop_front() {
            Some(Step::Snapshot(counters)) => {
                self.last = Some(counters.clone());
                Ok(counters)
            }
            Some(Step::Failure(reason)) => Err(NetworkError::counter_read_failed(reason)),
            None => self.last.clone().ok_or_else(|| {
                NetworkError::counter_read_failed("counter script is empty")
            }),
        }
    }
}

#[async_trait::async_trait]
impl CounterSource for ScriptedCounters {
    async fn io_counters(&mut self, per_interface: bool) -> Result<Vec<IoCounters>> {
        self.reads += 1;
        let counters = self.next_snapshot()?;
        trace!(read = self.reads, remaining = self.steps.len(), "Scripted counter read");

        if self.steps.is_empty() {
            debug!("Counter script exhausted, repeating last snapshot");
        }

        if per_interface {
            Ok(counters)
        } else {
            Ok(vec![IoCounters::aggregate(AGGREGATE_COUNTER_NAME, &counters)])
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
