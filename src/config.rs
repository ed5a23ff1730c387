//! YAML model configuration.
//!
//! ```yaml
//! propagation_speed_mps: 200000000   # optional, defaults to the speed of light
//! links:
//!   - interface: wan
//!     distance_m: 1500000
//!     data_rate_bps: 200000000
//!     packet_size_b: 32000000
//!     packets: 5
//!     lambda: 40        # optional, defaults to 40 pkt/s
//!     mu: 50            # optional, defaults to data_rate_bps / packet_size_b
//! monitor:
//!   interval_ms: 1000
//!   per_interface: true
//!   interfaces: [eth, wlan]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::delay::compute_metrics_with_speed;
use crate::sampler::CounterScope;
use crate::types::{DEFAULT_ARRIVAL_RATE_PPS, ServiceParams, TransmissionWindow};
use crate::units::SPEED_OF_LIGHT_MPS;
use crate::{NetworkError, Result};

/// Top-level model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Signal propagation speed in meters per second
    #[serde(default = "default_propagation_speed")]
    pub propagation_speed_mps: f64,

    /// Links to model
    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// Live monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

fn default_propagation_speed() -> f64 {
    SPEED_OF_LIGHT_MPS
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            propagation_speed_mps: SPEED_OF_LIGHT_MPS,
            links: Vec::new(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| NetworkError::parse_error("model config", e.to_string()))
    }

    /// Read and parse a YAML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| NetworkError::config_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), links = config.links.len(), "Loaded model config");
        Ok(config)
    }

    /// Service parameters for every configured link
    pub fn service_params(&self) -> Vec<ServiceParams> {
        self.links.iter().map(LinkConfig::to_service_params).collect()
    }

    /// Compute a window per configured link at the configured propagation speed
    pub fn compute_windows(&self) -> Result<Vec<TransmissionWindow>> {
        self.links
            .iter()
            .map(|link| {
                debug!(link = %link.interface, "Computing link metrics");
                compute_metrics_with_speed(&link.to_service_params(), self.propagation_speed_mps)
            })
            .collect()
    }
}

/// One link as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub interface: String,
    pub distance_m: f64,
    pub data_rate_bps: f64,
    pub packet_size_b: f64,
    pub packets: u32,
    #[serde(default)]
    pub lambda: Option<f64>,
    #[serde(default)]
    pub mu: Option<f64>,
}

impl LinkConfig {
    /// Resolve defaults into immutable service parameters
    pub fn to_service_params(&self) -> ServiceParams {
        let params = ServiceParams::new(
            self.distance_m,
            self.data_rate_bps,
            self.packet_size_b,
            self.packets,
            self.interface.as_str(),
        )
        .with_arrival_rate(self.lambda.unwrap_or(DEFAULT_ARRIVAL_RATE_PPS));

        match self.mu {
            Some(mu) => params.with_service_rate(mu),
            None => params,
        }
    }
}

/// Live monitor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tick interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Read per-interface counters and sum the matching ones
    #[serde(default)]
    pub per_interface: bool,

    /// Interface name substrings (per-interface mode only)
    #[serde(default)]
    pub interfaces: Vec<String>,
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms(), per_interface: false, interfaces: Vec::new() }
    }
}

impl MonitorConfig {
    /// Set the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Restrict sampling to interfaces matching any of `filters`
    pub fn with_interfaces<I, T>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.per_interface = true;
        self.interfaces = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Tick interval, never shorter than one millisecond
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    /// Counter scope implied by these settings
    pub fn scope(&self) -> CounterScope {
        if self.per_interface {
            CounterScope::Interfaces(self.interfaces.clone())
        } else {
            CounterScope::Aggregate
        }
    }
}
