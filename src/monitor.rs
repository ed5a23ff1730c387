//! Continuous interface monitoring
//!
//! [`Monitor::spawn`] starts a task that owns a [`CounterSource`], samples it on
//! a fixed interval and publishes each interval as a [`Frame`] on a watch
//! channel. Consumers always see the latest frame; a slow consumer skips
//! intermediate frames rather than queueing them.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::NetworkError;
use crate::config::MonitorConfig;
use crate::format::format_bibi;
use crate::provider::CounterSource;
use crate::sampler::{CounterScope, scoped_snapshot};
use crate::types::{Frame, IoCounters};

/// Counters and clocks at the start of the interval being measured
struct Baseline {
    counters: IoCounters,
    at: Instant,
    wall: SystemTime,
}

/// Spawns and manages the sampling task
pub struct Monitor;

impl Monitor {
    /// Spawn a sampling task for `source`
    ///
    /// A bootstrap snapshot is taken immediately; the first frame is published
    /// one interval later. Must be called from within a tokio runtime.
    pub fn spawn<S>(source: S, config: MonitorConfig) -> MonitorHandle
    where
        S: CounterSource,
    {
        let (frame_tx, frame_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();
        let scope = config.scope();
        let period = config.interval();

        info!(source = source.name(), scope = %scope.label(), ?period, "Starting monitor");

        tokio::spawn(async move {
            Self::sampling_task(source, scope, period, frame_tx, cancel_task).await;
        });

        MonitorHandle { frames: frame_rx, cancel }
    }

    async fn sampling_task<S>(
        mut source: S,
        scope: CounterScope,
        period: Duration,
        frame_tx: watch::Sender<Option<Arc<Frame>>>,
        cancel: CancellationToken,
    ) where
        S: CounterSource,
    {
        debug!("Monitor task started");
        let mut frame_count = 0u64;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut baseline = match scoped_snapshot(&mut source, &scope).await {
            Ok(counters) => Some(Baseline { counters, at: Instant::now(), wall: SystemTime::now() }),
            Err(e) => {
                warn!("Bootstrap snapshot failed, retrying on next tick: {}", e);
                None
            }
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Monitor cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Monitor cancelled during read");
                    break;
                }
                result = scoped_snapshot(&mut source, &scope) => result,
            };

            let counters = match result {
                Ok(counters) => counters,
                Err(e) => {
                    warn!("Skipping tick: {}", e);
                    continue;
                }
            };

            let current = Baseline { counters, at: Instant::now(), wall: SystemTime::now() };
            let Some(prev) = baseline.take() else {
                debug!("Baseline established");
                baseline = Some(current);
                continue;
            };
            let measured = Self::measure(&scope, &prev, &current);
            baseline = Some(current);
            let Some(frame) = measured else { continue };

            frame_count += 1;
            trace!("Frame {}: {:.3}s, {} packets", frame_count, frame.duration_s, frame.total_packets());

            if frame_tx.send(Some(Arc::new(frame))).is_err() {
                debug!("Frame receiver dropped, shutting down");
                break;
            }
        }

        let _ = frame_tx.send(None);
        info!("Monitor task ended (published {} frames)", frame_count);
    }

    fn measure(scope: &CounterScope, prev: &Baseline, current: &Baseline) -> Option<Frame> {
        let elapsed = current.at.duration_since(prev.at);
        let mut frame = Frame::new(scope.label(), 1.0, elapsed);
        frame.timestamp = prev.wall;
        frame.compute_deltas(&prev.counters, &current.counters);

        let rates = match frame.compute_rates() {
            Ok(rates) => rates,
            Err(e) => {
                warn!("Dropping interval: {}", e);
                return None;
            }
        };

        match frame.compute_avg_pkt_size() {
            Ok(_) => {}
            Err(NetworkError::NoTraffic { .. }) => {
                debug!(source = %frame.source, "Idle interval");
            }
            Err(e) => warn!("Average packet size unavailable: {}", e),
        }

        info!(
            source = %frame.source,
            upload = %format_bibi(rates.upload_bps),
            download = %format_bibi(rates.download_bps),
            pkts_up = rates.pkts_up_pps,
            pkts_down = rates.pkts_down_pps,
            "Interval sampled"
        );
        Some(frame)
    }
}

/// Handle to a running monitor
///
/// Dropping the handle stops the sampling task.
pub struct MonitorHandle {
    frames: watch::Receiver<Option<Arc<Frame>>>,
    cancel: CancellationToken,
}

impl MonitorHandle {
    /// Stream of published frames
    ///
    /// Yields the latest frame (if any) first, then every frame published
    /// while the stream is being polled. Ends when the monitor stops.
    pub fn frames(&self) -> impl Stream<Item = Arc<Frame>> + 'static {
        WatchStream::new(self.frames.clone())
            .skip_while(|opt| {
                let is_none = opt.is_none();
                async move { is_none }
            })
            .take_while(|opt| {
                let is_some = opt.is_some();
                async move { is_some }
            })
            .filter_map(|opt| async move { opt })
    }

    /// Most recently published frame
    pub fn latest(&self) -> Option<Arc<Frame>> {
        self.frames.borrow().clone()
    }

    /// Token that stops the monitor when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the sampling task
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        debug!("Dropping monitor handle");
        self.cancel.cancel();
    }
}
