//! Measurement frames built from two counter snapshots

use serde::Serialize;
use std::fmt;
use std::time::{Duration, SystemTime};
use tracing::debug;

use super::IoCounters;
use crate::format::{format_b, format_bibi};
use crate::{NetworkError, Result};

/// Rates derived from a frame's deltas over its duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameRates {
    /// Upload rate in bits per second
    pub upload_bps: f64,
    /// Download rate in bits per second
    pub download_bps: f64,
    /// Packets sent per second
    pub pkts_up_pps: f64,
    /// Packets received per second
    pub pkts_down_pps: f64,
}

/// One measurement interval
///
/// A frame is populated in three steps that must run in order:
/// [`compute_deltas`](Frame::compute_deltas), [`compute_rates`](Frame::compute_rates)
/// and [`compute_avg_pkt_size`](Frame::compute_avg_pkt_size). Derived values
/// stay `None` until their step has succeeded, and recomputing deltas clears them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Source label (interface name, link label or "all")
    pub source: String,

    /// Nominal sample size hint
    #[serde(rename = "sample_size")]
    pub samples: f64,

    /// Raw payload placeholder, not interpreted
    #[serde(skip)]
    pub payload: Vec<u8>,

    /// Interval length in seconds
    #[serde(rename = "duration")]
    pub duration_s: f64,

    /// Wall-clock time the interval started
    pub timestamp: SystemTime,

    #[serde(rename = "bits_sent")]
    pub sent_b: f64,
    #[serde(rename = "bits_recv")]
    pub recv_b: f64,
    #[serde(rename = "pkts_sent")]
    pub sent_pkt: u64,
    #[serde(rename = "pkts_recv")]
    pub recv_pkt: u64,

    rates: Option<FrameRates>,
    avg_pkt_size: Option<f64>,
}

impl Frame {
    /// Create an empty frame for an interval of `duration` starting now
    pub fn new(source: impl Into<String>, samples: f64, duration: Duration) -> Self {
        Self {
            source: source.into(),
            samples,
            payload: Vec::new(),
            duration_s: duration.as_secs_f64(),
            timestamp: SystemTime::now(),
            sent_b: 0.0,
            recv_b: 0.0,
            sent_pkt: 0,
            recv_pkt: 0,
            rates: None,
            avg_pkt_size: None,
        }
    }

    /// Create a modeled frame carrying one packet of `packet_size_b` bits
    ///
    /// Used by the delay model to stand in for each packet of a workload.
    pub fn synthetic(source: impl Into<String>, packet_size_b: f64) -> Self {
        let mut frame = Self::new(source, packet_size_b, Duration::ZERO);
        frame.sent_b = packet_size_b;
        frame.sent_pkt = 1;
        frame.avg_pkt_size = Some(packet_size_b);
        frame
    }

    /// Fill bit and packet deltas from two snapshots
    ///
    /// Byte counters are converted to bits. A counter that went backwards
    /// (reset or wraparound) contributes a zero delta.
    pub fn compute_deltas(&mut self, start: &IoCounters, end: &IoCounters) {
        self.sent_b = end.bytes_sent.saturating_sub(start.bytes_sent) as f64 * 8.0;
        self.recv_b = end.bytes_recv.saturating_sub(start.bytes_recv) as f64 * 8.0;
        self.sent_pkt = end.packets_sent.saturating_sub(start.packets_sent);
        self.recv_pkt = end.packets_recv.saturating_sub(start.packets_recv);
        self.rates = None;
        self.avg_pkt_size = None;

        debug!(
            source = %self.source,
            sent = %format_b(self.sent_b),
            recv = %format_b(self.recv_b),
            pkts_sent = self.sent_pkt,
            pkts_recv = self.recv_pkt,
            "Computed frame deltas"
        );
    }

    /// Divide each delta by the frame duration
    pub fn compute_rates(&mut self) -> Result<FrameRates> {
        if self.duration_s.is_nan() || self.duration_s <= 0.0 {
            return Err(NetworkError::ZeroDuration { source_label: self.source.clone() });
        }

        let rates = FrameRates {
            upload_bps: self.sent_b / self.duration_s,
            download_bps: self.recv_b / self.duration_s,
            pkts_up_pps: self.sent_pkt as f64 / self.duration_s,
            pkts_down_pps: self.recv_pkt as f64 / self.duration_s,
        };
        self.rates = Some(rates);

        debug!(
            source = %self.source,
            upload = %format_bibi(rates.upload_bps),
            download = %format_bibi(rates.download_bps),
            "Upload/download {:.2}/{:.2} p/s",
            rates.pkts_up_pps,
            rates.pkts_down_pps
        );
        Ok(rates)
    }

    /// Average packet size in bits over the interval
    ///
    /// Fails with [`NetworkError::NoTraffic`] when no packets moved in either
    /// direction; the average stays `None` in that case.
    pub fn compute_avg_pkt_size(&mut self) -> Result<f64> {
        let packets = self.total_packets();
        if packets == 0 {
            self.avg_pkt_size = None;
            return Err(NetworkError::NoTraffic { source_label: self.source.clone() });
        }

        let avg = self.total_bits() / packets as f64;
        self.avg_pkt_size = Some(avg);
        debug!(source = %self.source, avg = %format_b(avg), "Average packet size");
        Ok(avg)
    }

    /// Derived rates, once [`compute_rates`](Frame::compute_rates) has run
    pub fn rates(&self) -> Option<&FrameRates> {
        self.rates.as_ref()
    }

    /// Average packet size in bits, once computed and defined
    pub fn avg_pkt_size(&self) -> Option<f64> {
        self.avg_pkt_size
    }

    /// Bits sent plus bits received
    pub fn total_bits(&self) -> f64 {
        self.sent_b + self.recv_b
    }

    /// Packets sent plus packets received
    pub fn total_packets(&self) -> u64 {
        self.sent_pkt.saturating_add(self.recv_pkt)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frame {{")?;
        writeln!(f, "    source: {},", self.source)?;
        writeln!(f, "    samples: {},", self.samples)?;
        writeln!(f, "    timestamp: {},", humantime::format_rfc3339_seconds(self.timestamp))?;
        writeln!(f, "    duration: {:.3} s,", self.duration_s)?;
        writeln!(f, "    sent: {} ({} pkts),", format_b(self.sent_b), self.sent_pkt)?;
        writeln!(f, "    recv: {} ({} pkts),", format_b(self.recv_b), self.recv_pkt)?;
        match &self.rates {
            Some(r) => {
                writeln!(f, "    upload: {}/s,", format_bibi(r.upload_bps))?;
                writeln!(f, "    download: {}/s,", format_bibi(r.download_bps))?;
                writeln!(f, "    packet rate: {:.2}/{:.2} p/s,", r.pkts_up_pps, r.pkts_down_pps)?;
            }
            None => writeln!(f, "    rates: n/a,")?,
        }
        match self.avg_pkt_size {
            Some(avg) => writeln!(f, "    avg packet size: {}", format_b(avg))?,
            None => writeln!(f, "    avg packet size: n/a")?,
        }
        write!(f, "}}")
    }
}
