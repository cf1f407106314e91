//! Observability configuration.
//!
//! Parameters for log output and the metrics registry.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[validate(custom(function = validation::validate_log_filter))]
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Whether pool activity is exported to the metrics registry.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_filter() -> String {
    "info".into()
}

fn default_true() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            metrics_enabled: default_true(),
        }
    }
}
