//! Core data types for link modeling and counter sampling.
//!
//! ## Architecture
//!
//! - [`ServiceParams`] describes a hypothetical link (distance, rate, packet size, load, λ, μ)
//! - [`IoCounters`] is one cumulative snapshot of OS network counters
//! - [`Frame`] is one measurement interval: counter deltas plus derived rates
//! - [`TransmissionWindow`] owns an ordered run of frames and the delay model's metrics
//! - [`WindowRecord`] is the flat, serializable view of a window for reporting
//! - [`NetworkMetrics`] is a reporting envelope over a log of window records
//!
//! Windows own their frames outright; two windows never share a frame.

mod counters;
mod frame;
mod metrics;
mod service_params;
mod window;

pub use counters::{AGGREGATE_COUNTER_NAME, IoCounters};
pub use frame::{Frame, FrameRates};
pub use metrics::NetworkMetrics;
pub use service_params::{DEFAULT_ARRIVAL_RATE_PPS, ServiceParams};
pub use window::{TransmissionWindow, WindowRecord};
