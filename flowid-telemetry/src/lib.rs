//! # flowid Telemetry
//!
//! Crate for logging and metrics around identifier pool activity.

pub mod logging;
pub mod metrics;

pub use logging::PoolLogger;
pub use metrics::MetricsRecorder;
