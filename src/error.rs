//! Error types for network modeling and counter sampling.
//!
//! Every boundary condition of the delay model and the sampler is a value of
//! [`NetworkError`]; nothing in this crate terminates the process. The one
//! deliberate exception is M/M/1 overload, which is *not* an error: queueing
//! delay and system time are reported as `f64::INFINITY`.
//!
//! ## Error Categories
//!
//! - **Workload Errors**: empty workloads or physically invalid link parameters
//! - **Sampling Errors**: counter read failures, missing interfaces, idle intervals
//! - **Lookup Errors**: removing a frame label a window does not hold
//! - **Aggregation Errors**: utilization over windows with no service time
//! - **Configuration Errors**: unreadable or malformed YAML model files
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use netdelay::NetworkError;
//!
//! let error = NetworkError::counter_read_failed("interface table unavailable");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modeling and sampling operations.
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    #[error("Empty workload: packet load must be at least 1, got {packet_load}")]
    EmptyWorkload { packet_load: u32 },

    #[error("Invalid service parameter '{field}': {reason}")]
    InvalidParams { field: &'static str, reason: String },

    #[error("No traffic observed on '{source_label}' during the sampling interval")]
    NoTraffic { source_label: String },

    #[error("Frame '{source_label}' has no elapsed duration to compute rates over")]
    ZeroDuration { source_label: String },

    #[error("Failed to read network I/O counters: {reason}")]
    CounterRead {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No network counters available for {scope}")]
    NoCounters { scope: String },

    #[error("Frame '{label}' not found in transmission window")]
    FrameNotFound { label: String },

    #[error("Utilization is undefined over {windows} window(s) with zero total service time")]
    UndefinedUtilization { windows: usize },

    #[error("Config file error: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },
}

impl NetworkError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::CounterRead { .. } => true,
            NetworkError::NoTraffic { .. } => true,
            NetworkError::NoCounters { .. } => true,
            NetworkError::EmptyWorkload { .. } => false,
            NetworkError::InvalidParams { .. } => false,
            NetworkError::ZeroDuration { .. } => false,
            NetworkError::FrameNotFound { .. } => false,
            NetworkError::UndefinedUtilization { .. } => false,
            NetworkError::Config { .. } => false,
            NetworkError::Parse { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            NetworkError::EmptyWorkload { .. } => vec![
                "Set the packet count to at least one",
                "Check the 'packets' field of the link configuration",
            ],
            NetworkError::InvalidParams { .. } => vec![
                "Use a positive, finite data rate and packet size",
                "Use a non-negative, finite link distance",
            ],
            NetworkError::NoTraffic { .. } => vec![
                "Sample over a longer interval",
                "Verify the selected interfaces carry traffic",
            ],
            NetworkError::ZeroDuration { .. } => {
                vec!["Use a sampling duration greater than zero"]
            }
            NetworkError::CounterRead { .. } => vec![
                "Retry the read on the next interval",
                "Check permissions for reading interface statistics",
                "Verify the platform exposes network counters",
            ],
            NetworkError::NoCounters { .. } => vec![
                "Check the interface name filters",
                "List available interfaces with per-interface mode and no filters",
            ],
            NetworkError::FrameNotFound { .. } => vec![
                "Check the frame label spelling",
                "Verify the frame was added to this window",
            ],
            NetworkError::UndefinedUtilization { .. } => vec![
                "Compute metrics for each window before aggregating",
                "Include at least one window with a non-empty workload",
            ],
            NetworkError::Config { .. } => vec![
                "Check the config file exists and is readable",
                "Check file permissions",
            ],
            NetworkError::Parse { .. } => vec![
                "Check the YAML syntax of the model file",
                "Verify field names match the documented schema",
            ],
        }
    }

    /// Helper constructor for counter read failures.
    pub fn counter_read_failed(reason: impl Into<String>) -> Self {
        NetworkError::CounterRead { reason: reason.into(), source: None }
    }

    /// Helper constructor for counter read failures with source.
    pub fn counter_read_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        NetworkError::CounterRead { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for invalid link parameters.
    pub fn invalid_params(field: &'static str, reason: impl Into<String>) -> Self {
        NetworkError::InvalidParams { field, reason: reason.into() }
    }

    /// Helper constructor for config file errors with path context.
    pub fn config_error(path: PathBuf, source: std::io::Error) -> Self {
        NetworkError::Config { path, source }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        NetworkError::Parse { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> Self {
        NetworkError::Config { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_carry_their_context(
                label in "[a-z0-9._-]{1,16}",
                reason in ".*",
                packet_load in 0u32..4,
                windows in 0usize..10
            ) {
                let not_found = NetworkError::FrameNotFound { label: label.clone() };
                prop_assert!(not_found.to_string().contains(&label));

                let no_traffic = NetworkError::NoTraffic { source_label: label.clone() };
                prop_assert!(no_traffic.to_string().contains(&label));

                let read = NetworkError::counter_read_failed(reason.clone());
                prop_assert!(read.to_string().contains(&reason));

                let empty = NetworkError::EmptyWorkload { packet_load };
                prop_assert!(empty.to_string().contains(&packet_load.to_string()));

                let util = NetworkError::UndefinedUtilization { windows };
                prop_assert!(util.to_string().contains(&windows.to_string()));
            }

            #[test]
            fn counter_read_source_is_preserved(base_message in ".+") {
                let inner = std::io::Error::other(base_message.clone());
                let error = NetworkError::counter_read_failed_with_source("probe", Box::new(inner));

                let source = std::error::Error::source(&error);
                prop_assert!(source.is_some());
                prop_assert_eq!(source.map(|s| s.to_string()), Some(base_message));
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<NetworkError>();

        let error = NetworkError::counter_read_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn retry_classification() {
        assert!(NetworkError::counter_read_failed("busy").is_retryable());
        assert!(NetworkError::NoTraffic { source_label: "eth0".into() }.is_retryable());
        assert!(!NetworkError::EmptyWorkload { packet_load: 0 }.is_retryable());
        assert!(!NetworkError::FrameNotFound { label: "x".into() }.is_retryable());
        assert!(!NetworkError::UndefinedUtilization { windows: 3 }.is_retryable());
    }

    #[test]
    fn every_variant_has_suggestions() {
        let errors = vec![
            NetworkError::EmptyWorkload { packet_load: 0 },
            NetworkError::invalid_params("data_rate_bps", "must be positive"),
            NetworkError::NoTraffic { source_label: "lo".into() },
            NetworkError::ZeroDuration { source_label: "lo".into() },
            NetworkError::counter_read_failed("denied"),
            NetworkError::NoCounters { scope: "eth*".into() },
            NetworkError::FrameNotFound { label: "a".into() },
            NetworkError::UndefinedUtilization { windows: 0 },
            NetworkError::config_error(PathBuf::from("/nope.yaml"), std::io::Error::other("x")),
            NetworkError::parse_error("model", "bad"),
        ];

        for error in errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "no suggestions for {error}");
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }

    #[test]
    fn from_io_error_maps_to_config() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "model.yaml");
        let err: NetworkError = io_err.into();

        match err {
            NetworkError::Config { source, .. } => assert_eq!(source.to_string(), "model.yaml"),
            other => panic!("Expected Config error variant, got {other:?}"),
        }
    }
}
