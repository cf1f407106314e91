//! ## flowid-telemetry::logging
//! **Structured logging with tracing**
//!
//! Installs the process-wide `tracing` subscriber and renders pool usage
//! snapshots as log events.

use flowid_config::TelemetryConfig;
use flowid_core::alloc::PoolInfo;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct PoolLogger;

impl PoolLogger {
    /// Installs the fmt subscriber. `RUST_LOG` wins over `default_filter`.
    pub fn init(default_filter: &str) -> Result<(), InitError> {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init()
    }

    /// Installs the fmt subscriber with the configured default filter.
    pub fn init_from_config(config: &TelemetryConfig) -> Result<(), InitError> {
        Self::init(&config.log_filter)
    }

    /// Logs one event per pool, inside a span tagged with the binding generation.
    pub fn log_usage(generation: u64, usage: &[PoolInfo]) {
        let span = info_span!("pool_usage", generation);
        let _entered = span.enter();

        for info in usage {
            tracing::info!(
                direction = %info.direction,
                ident_type = %info.ident_type,
                base = info.base,
                capacity = info.capacity,
                in_use = info.in_use,
                "Identifier pool usage"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowid_core::types::{Direction, IdentifierType};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_log_usage() {
        PoolLogger::log_usage(
            2,
            &[PoolInfo {
                direction: Direction::Receive,
                ident_type: IdentifierType::EmProf,
                base: 0,
                capacity: 8,
                in_use: 3,
            }],
        );
        assert!(logs_contain("Identifier pool usage"));
        assert!(logs_contain("ident_type=em_prof"));
        assert!(logs_contain("in_use=3"));
    }
}
