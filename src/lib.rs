//! Network performance modeling with live OS counter sampling.
//!
//! `netdelay` combines closed-form delay and throughput formulas with samples
//! of the operating system's network I/O counters, producing comparable,
//! human-readable estimates for a link or an interface.
//!
//! # Features
//!
//! - **Delay Model**: transmission, propagation, RTT, M/M/1 queueing and
//!   persistent/non-persistent service time
//! - **Counter Sampling**: one-shot frames and a cancellable live monitor
//! - **Injectable Sources**: real counters via `sysinfo`, scripted counters for tests
//! - **Reporting**: flat serializable window records and human unit formatting
//!
//! # Quick Start
//!
//! ```rust
//! use netdelay::{ServiceParams, compute_metrics, compute_utilization, units::*};
//!
//! # fn main() -> netdelay::Result<()> {
//! let link = ServiceParams::new(1500.0 * KILOMETER, 200.0 * MEGABIT, 1500.0 * BYTE, 5, "wan");
//! let window = compute_metrics(&link)?;
//! println!("{window}");
//!
//! let util = compute_utilization(&[&window])?;
//! println!("persistent utilization: {:.2}%", util.persistent * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example (live sampling)
//!
//! ```rust,no_run
//! use netdelay::{Sampler, providers::SystemCounters};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> netdelay::Result<()> {
//!     let mut sampler = Sampler::new(SystemCounters::new());
//!     let frame = sampler.new_frame("all", 1.0, Duration::from_secs(1)).await?;
//!     println!("{frame}");
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
pub mod format;
pub mod logging;
pub mod types;
pub mod units;

// Modeling
pub mod config;
pub mod delay;

// Counter sampling
pub mod monitor;
pub mod provider;
pub mod providers;
pub mod sampler;

// Core exports
pub use error::*;
pub use types::*;

// Modeling exports
pub use config::{LinkConfig, ModelConfig, MonitorConfig};
pub use delay::{Utilization, compute_metrics, compute_metrics_with_speed, compute_utilization};
pub use format::{format_b, format_bibi, format_bits, format_bits_ibi};

// Sampling exports
pub use monitor::{Monitor, MonitorHandle};
pub use provider::CounterSource;
pub use sampler::{CounterScope, Sampler, filter_io_counters};
