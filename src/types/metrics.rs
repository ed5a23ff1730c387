//! Reporting envelope over aggregated windows

use serde::Serialize;

use super::{TransmissionWindow, WindowRecord};

/// Scalar summary fields plus a log of window records
///
/// No algorithm in this crate fills the scalar fields; they reflect whatever
/// the most recent aggregation run chose to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub transmission_log: Vec<WindowRecord>,
    /// Milliseconds
    pub network_latency: f64,
    /// Mbps
    pub network_speed: f64,
    /// Mbps
    pub network_bandwidth: f64,
    /// Milliseconds
    pub network_jitter: f64,
}

impl NetworkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a window's flat record to the log
    pub fn record_window(&mut self, window: &TransmissionWindow) {
        self.transmission_log.push(window.record());
    }
}
