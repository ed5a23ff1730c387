//! Transmission windows: ordered frame runs plus delay model metrics

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use super::Frame;
use crate::format::format_b;
use crate::{NetworkError, Result};

/// An ordered run of frames with the delay model's derived metrics
///
/// `bits_processed` and `frames_serviced` are maintained incrementally by
/// [`add_frame`](TransmissionWindow::add_frame) and
/// [`remove_frame`](TransmissionWindow::remove_frame) and always equal the
/// sum/count of the frames currently held. The remaining metric fields are
/// filled by [`compute_metrics`](crate::compute_metrics).
///
/// Mutation takes `&mut self`, so concurrent writers need an external lock
/// (e.g. a `Mutex<TransmissionWindow>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransmissionWindow {
    label: String,
    frames: Vec<Frame>,
    bits_processed: f64,
    frames_serviced: usize,

    /// Average size of frames in bits
    pub avg_packet_size: f64,
    /// Time to put a single packet on the wire, seconds
    pub avg_packet_transmission_time: f64,
    /// Time to put every packet on the wire back to back, seconds
    pub total_transmission_time: f64,
    /// One-way link propagation delay, seconds
    pub link_prop_delay: f64,
    /// Processing delay 1/μ, seconds
    pub processing_delay: f64,
    /// M/M/1 average queueing delay, seconds (infinite when overloaded)
    pub queueing_delay: f64,
    /// Round trip propagation time, seconds
    pub rtt: f64,
    /// Service time with one connection for all packets, seconds
    pub persistent_service_time: f64,
    /// Service time with a connection per packet, seconds
    pub non_persistent_service_time: f64,
    /// M/M/1 average time in system, seconds (infinite when overloaded)
    pub average_system_time_mm1: f64,
}

impl TransmissionWindow {
    /// Create an empty window
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Default::default() }
    }

    /// Create an empty window with room for `capacity` frames
    pub fn with_capacity(label: impl Into<String>, capacity: usize) -> Self {
        Self { label: label.into(), frames: Vec::with_capacity(capacity), ..Default::default() }
    }

    /// Append a frame and account for its bits
    pub fn add_frame(&mut self, frame: Frame) {
        self.bits_processed += frame.total_bits();
        self.frames_serviced += 1;
        self.frames.push(frame);
    }

    /// Remove the first frame whose source matches `label`
    ///
    /// Later frames sharing the label are untouched and the order of the
    /// remaining frames is preserved. On a miss the window is unchanged and
    /// [`NetworkError::FrameNotFound`] is returned.
    pub fn remove_frame(&mut self, label: &str) -> Result<Frame> {
        let Some(index) = self.frames.iter().position(|f| f.source == label) else {
            warn!(label, window = %self.label, "Frame not found");
            return Err(NetworkError::FrameNotFound { label: label.to_string() });
        };

        let frame = self.frames.remove(index);
        self.bits_processed -= frame.total_bits();
        self.frames_serviced -= 1;

        debug!(
            label,
            bits_processed = self.bits_processed,
            frames_serviced = self.frames_serviced,
            "Removed frame"
        );
        Ok(frame)
    }

    /// Window label (link or interface)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Frames in insertion order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Total bits of the frames held
    pub fn bits_processed(&self) -> f64 {
        self.bits_processed
    }

    /// Number of frames held
    pub fn frames_serviced(&self) -> usize {
        self.frames_serviced
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Flat record for JSON or tabular reporting
    pub fn record(&self) -> WindowRecord {
        WindowRecord {
            interface: self.label.clone(),
            bits_processed: self.bits_processed,
            frames_serviced: self.frames_serviced,
            avg_packet_size: self.avg_packet_size,
            avg_packet_transmission_time: self.avg_packet_transmission_time,
            total_transmission_time: self.total_transmission_time,
            link_prop_delay: self.link_prop_delay,
            processing_delay: self.processing_delay,
            queueing_delay: self.queueing_delay,
            rtt: self.rtt,
            persistent_service_time: self.persistent_service_time,
            non_persistent_service_time: self.non_persistent_service_time,
            average_system_time_mm1: self.average_system_time_mm1,
        }
    }
}

impl fmt::Display for TransmissionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TransmissionWindow [{}] {{", self.label)?;
        writeln!(f, "    frames serviced: {},", self.frames_serviced)?;
        writeln!(f, "    bits processed: {},", format_b(self.bits_processed))?;
        writeln!(f, "    avg packet size: {},", format_b(self.avg_packet_size))?;
        writeln!(f)?;
        writeln!(f, "    avg packet transmission time: {:.5}s,", self.avg_packet_transmission_time)?;
        writeln!(f, "    total transmission time: {:.5}s,", self.total_transmission_time)?;
        writeln!(f)?;
        writeln!(f, "    queueing delay (ρ/(μ-λ)): {:.5}s,", self.queueing_delay)?;
        writeln!(f, "    processing delay (1/μ): {:.5}s,", self.processing_delay)?;
        writeln!(f, "    link prop delay (D/S): {:.5}s,", self.link_prop_delay)?;
        writeln!(f, "    rtt (2·D/S): {:.5}s,", self.rtt)?;
        writeln!(f)?;
        writeln!(f, "    average system time M/M/1: {:.5}s,", self.average_system_time_mm1)?;
        writeln!(f, "    persistent service time: {:.5}s,", self.persistent_service_time)?;
        writeln!(f, "    non-persistent service time: {:.5}s", self.non_persistent_service_time)?;
        write!(f, "}}")
    }
}

/// Flat, serializable view of a [`TransmissionWindow`]
///
/// Infinite delays (M/M/1 overload) serialize as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRecord {
    pub interface: String,
    pub bits_processed: f64,
    pub frames_serviced: usize,
    pub avg_packet_size: f64,
    pub avg_packet_transmission_time: f64,
    pub total_transmission_time: f64,
    pub link_prop_delay: f64,
    pub processing_delay: f64,
    pub queueing_delay: f64,
    pub rtt: f64,
    pub persistent_service_time: f64,
    pub non_persistent_service_time: f64,
    pub average_system_time_mm1: f64,
}
