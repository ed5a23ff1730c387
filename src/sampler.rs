//! One-shot counter sampling into frames.
//!
//! A sample takes a counter snapshot, waits for the frame duration, takes a
//! second snapshot and derives deltas, rates and average packet size. The
//! wait is a plain timer and is not cancellable once started; use the
//! [`Monitor`](crate::Monitor) for cancellable continuous sampling.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::format::{format_b, format_bibi};
use crate::provider::CounterSource;
use crate::types::{AGGREGATE_COUNTER_NAME, Frame, IoCounters};
use crate::{NetworkError, Result};

/// Read counters, optionally restricted to interfaces matching a filter.
///
/// - `per_interface == false`: the source's single aggregate snapshot, filters ignored
/// - `per_interface == true` with no filters: every interface (logged as unfiltered)
/// - `per_interface == true` with filters: interfaces whose name contains any
///   filter substring, each listed once
///
/// Read failures are logged and returned.
pub async fn filter_io_counters<S, F>(
    source: &mut S,
    per_interface: bool,
    filters: &[F],
) -> Result<Vec<IoCounters>>
where
    S: CounterSource + ?Sized,
    F: AsRef<str>,
{
    let stats = match source.io_counters(per_interface).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(source = source.name(), "Unable to read IO counters: {}", e);
            return Err(e);
        }
    };

    if !per_interface {
        return Ok(stats);
    }

    if filters.is_empty() {
        warn!(interfaces = stats.len(), "No interface filter specified, returning all interfaces");
        return Ok(stats);
    }

    let filtered: Vec<IoCounters> = stats
        .into_iter()
        .filter(|stat| filters.iter().any(|f| stat.name.contains(f.as_ref())))
        .collect();
    debug!(matched = filtered.len(), "Filtered interfaces");
    Ok(filtered)
}

/// Which counters a sampler reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CounterScope {
    /// One aggregate over every interface
    #[default]
    Aggregate,

    /// Sum of the interfaces matching any of these name substrings
    Interfaces(Vec<String>),
}

impl CounterScope {
    /// Build a scope from interface filters; no filters means aggregate
    pub fn from_filters(filters: &[String]) -> Self {
        if filters.is_empty() {
            CounterScope::Aggregate
        } else {
            CounterScope::Interfaces(filters.to_vec())
        }
    }

    /// Name used for snapshots taken under this scope
    pub fn label(&self) -> String {
        match self {
            CounterScope::Aggregate => AGGREGATE_COUNTER_NAME.to_string(),
            CounterScope::Interfaces(filters) => filters.join("+"),
        }
    }
}

/// Read one snapshot for `scope` from `source`
pub(crate) async fn scoped_snapshot<S>(source: &mut S, scope: &CounterScope) -> Result<IoCounters>
where
    S: CounterSource + ?Sized,
{
    match scope {
        CounterScope::Aggregate => {
            let counters = filter_io_counters::<S, &str>(source, false, &[]).await?;
            counters
                .into_iter()
                .next()
                .ok_or_else(|| NetworkError::NoCounters { scope: scope.label() })
        }
        CounterScope::Interfaces(filters) => {
            let counters = filter_io_counters(source, true, filters.as_slice()).await?;
            if counters.is_empty() {
                return Err(NetworkError::NoCounters { scope: scope.label() });
            }
            Ok(IoCounters::aggregate(scope.label(), &counters))
        }
    }
}

/// Takes counter snapshots from a source and turns intervals into frames
pub struct Sampler<S> {
    source: S,
    scope: CounterScope,
}

impl<S: CounterSource> Sampler<S> {
    /// Sample the aggregate over every interface
    pub fn new(source: S) -> Self {
        Self { source, scope: CounterScope::Aggregate }
    }

    /// Sample a specific scope
    pub fn with_scope(source: S, scope: CounterScope) -> Self {
        Self { source, scope }
    }

    pub fn scope(&self) -> &CounterScope {
        &self.scope
    }

    /// Give back the counter source
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read one snapshot for the configured scope
    pub async fn snapshot(&mut self) -> Result<IoCounters> {
        scoped_snapshot(&mut self.source, &self.scope).await
    }

    /// Sample a new frame over `duration`
    ///
    /// Blocks the calling task for `duration` between the two snapshots.
    pub async fn new_frame(
        &mut self,
        label: impl Into<String>,
        sample_hint: f64,
        duration: Duration,
    ) -> Result<Frame> {
        let mut frame = Frame::new(label, sample_hint, duration);
        self.populate_frame(&mut frame).await?;
        Ok(frame)
    }

    /// Re-sample an existing frame over its own duration
    ///
    /// The timestamp is reset to the start of the new interval. An idle
    /// interval is not an error: the average packet size is left undefined
    /// and a warning is logged.
    pub async fn populate_frame(&mut self, frame: &mut Frame) -> Result<()> {
        let wait = match Duration::try_from_secs_f64(frame.duration_s) {
            Ok(wait) if !wait.is_zero() => wait,
            _ => return Err(NetworkError::ZeroDuration { source_label: frame.source.clone() }),
        };

        let start = self.snapshot().await?;
        frame.timestamp = std::time::SystemTime::now();
        tokio::time::sleep(wait).await;
        let end = self.snapshot().await?;

        frame.compute_deltas(&start, &end);
        let rates = frame.compute_rates()?;
        match frame.compute_avg_pkt_size() {
            Ok(_) => {}
            Err(NetworkError::NoTraffic { source_label }) => {
                warn!(source = %source_label, "No traffic observed, average packet size undefined");
            }
            Err(e) => return Err(e),
        }

        info!(
            source = %frame.source,
            scope = %self.scope.label(),
            upload = %format_bibi(rates.upload_bps),
            download = %format_bibi(rates.download_bps),
            avg_pkt = %frame.avg_pkt_size().map(format_b).unwrap_or_else(|| "n/a".into()),
            "Sampled frame over {:.3}s",
            frame.duration_s
        );
        Ok(())
    }
}
