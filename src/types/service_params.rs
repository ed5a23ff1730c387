//! Operator-supplied description of a hypothetical link

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrival rate (λ) used when none is given, in packets per second.
pub const DEFAULT_ARRIVAL_RATE_PPS: f64 = 40.0;

/// Immutable description of a link and its offered load.
///
/// Field names follow the conventional symbols: distance `D`, data rate `R`,
/// packet size `L`, packet count `N`, arrival rate `λ` and service rate `μ`.
/// `μ` defaults to `R / L`; λ and μ are independent knobs so queueing
/// experiments can sweep either one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceParams {
    /// Label for the link or interface
    #[serde(rename = "interface")]
    pub label: String,

    /// Physical distance in meters (D)
    pub distance_m: f64,

    /// Data rate in bits per second (R)
    pub data_rate_bps: f64,

    /// Size of each packet in bits (L)
    pub packet_size_b: f64,

    /// Number of packets (N)
    #[serde(rename = "packets")]
    pub packet_load: u32,

    /// Packets arriving per second (λ)
    #[serde(rename = "lambda")]
    pub arrival_rate_pps: f64,

    /// Packets the link could serve per second absent queueing (μ)
    #[serde(rename = "mu")]
    pub service_rate_pps: f64,
}

impl ServiceParams {
    /// Describe a link with the default arrival rate and `μ = R / L`.
    pub fn new(
        distance_m: f64,
        data_rate_bps: f64,
        packet_size_b: f64,
        packet_load: u32,
        label: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            distance_m,
            data_rate_bps,
            packet_size_b,
            packet_load,
            arrival_rate_pps: DEFAULT_ARRIVAL_RATE_PPS,
            service_rate_pps: crate::delay::service_rate(data_rate_bps, packet_size_b),
        }
    }

    /// Override the arrival rate (λ).
    pub fn with_arrival_rate(mut self, lambda_pps: f64) -> Self {
        self.arrival_rate_pps = lambda_pps;
        self
    }

    /// Override the service rate (μ).
    pub fn with_service_rate(mut self, mu_pps: f64) -> Self {
        self.service_rate_pps = mu_pps;
        self
    }

    /// Traffic intensity ρ = λ/μ.
    pub fn traffic_intensity(&self) -> f64 {
        crate::delay::traffic_intensity(self.arrival_rate_pps, self.service_rate_pps)
    }
}

impl fmt::Display for ServiceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ServiceParams {{")?;
        writeln!(f, "    label: {},", self.label)?;
        writeln!(f, "    (D) distance: {:.2} m,", self.distance_m)?;
        writeln!(f, "    (R) data rate: {:.2} bps,", self.data_rate_bps)?;
        writeln!(f, "    (L) packet size: {:.2} b,", self.packet_size_b)?;
        writeln!(f, "    (N) packet load: {},", self.packet_load)?;
        writeln!(f, "    (λ) arrival rate: {:.2} pps,", self.arrival_rate_pps)?;
        writeln!(f, "    (μ) service rate: {:.2} pps", self.service_rate_pps)?;
        write!(f, "}}")
    }
}
