//! ## flowid-telemetry::metrics
//! **Prometheus exporter for identifier pools**
//!
//! `MetricsRecorder` implements `AllocObserver`; hand it to
//! `IdentManager::with_observer` to export pool activity.

use std::sync::Arc;

use flowid_config::TelemetryConfig;
use flowid_core::error::IdentError;
use flowid_core::observer::AllocObserver;
use flowid_core::types::{Direction, Identifier, IdentifierType};
use prometheus::{IntCounterVec, IntGaugeVec, Opts, Registry};

const POOL_LABELS: &[&str] = &["direction", "ident_type"];

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub allocations: IntCounterVec,
    pub frees: IntCounterVec,
    pub failures: IntCounterVec,
    pub in_use: IntGaugeVec,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let allocations = IntCounterVec::new(
            Opts::new("flowid_alloc_total", "Identifiers allocated"),
            POOL_LABELS,
        )?;
        let frees = IntCounterVec::new(
            Opts::new("flowid_free_total", "Identifiers freed"),
            POOL_LABELS,
        )?;
        let failures = IntCounterVec::new(
            Opts::new(
                "flowid_alloc_failures_total",
                "Refused alloc and free requests",
            ),
            &["direction", "ident_type", "reason"],
        )?;
        let in_use = IntGaugeVec::new(
            Opts::new("flowid_in_use", "Identifiers currently allocated"),
            POOL_LABELS,
        )?;

        registry.register(Box::new(allocations.clone()))?;
        registry.register(Box::new(frees.clone()))?;
        registry.register(Box::new(failures.clone()))?;
        registry.register(Box::new(in_use.clone()))?;

        Ok(Self {
            registry,
            allocations,
            frees,
            failures,
            in_use,
        })
    }

    /// Builds a recorder when `metrics_enabled` is set, `None` otherwise.
    ///
    /// Pass the result (as `Arc<dyn AllocObserver>`) to
    /// `IdentManager::with_optional_observer`.
    pub fn from_config(config: &TelemetryConfig) -> Result<Option<Arc<Self>>, prometheus::Error> {
        if !config.metrics_enabled {
            return Ok(None);
        }
        Self::new().map(|recorder| Some(Arc::new(recorder)))
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}

impl AllocObserver for MetricsRecorder {
    fn on_alloc(&self, direction: Direction, ident_type: IdentifierType, _id: Identifier) {
        let labels = [direction.as_str(), ident_type.as_str()];
        self.allocations.with_label_values(&labels).inc();
        self.in_use.with_label_values(&labels).inc();
    }

    fn on_free(&self, direction: Direction, ident_type: IdentifierType, _id: Identifier) {
        let labels = [direction.as_str(), ident_type.as_str()];
        self.frees.with_label_values(&labels).inc();
        self.in_use.with_label_values(&labels).dec();
    }

    fn on_failure(&self, direction: Direction, ident_type: IdentifierType, error: &IdentError) {
        self.failures
            .with_label_values(&[direction.as_str(), ident_type.as_str(), error.kind()])
            .inc();
    }

    fn on_unbind(&self, _generation: u64) {
        self.in_use.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowid_core::types::{PoolConfig, PoolSpec};
    use flowid_core::IdentManager;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_recorder_tracks_manager_activity() {
        let recorder = Arc::new(MetricsRecorder::new().unwrap());
        let manager = IdentManager::with_observer(recorder.clone());
        let config = PoolConfig::new().with_pool(
            Direction::Receive,
            IdentifierType::ProfFunc,
            PoolSpec::new(1),
        );
        manager.bind(&config).unwrap();

        let id = manager.alloc(Direction::Receive, IdentifierType::ProfFunc).unwrap();
        manager.alloc(Direction::Receive, IdentifierType::ProfFunc).unwrap_err();

        let labels = ["rx", "prof_func"];
        assert_eq!(recorder.allocations.with_label_values(&labels).get(), 1);
        assert_eq!(recorder.in_use.with_label_values(&labels).get(), 1);
        assert_eq!(
            recorder
                .failures
                .with_label_values(&["rx", "prof_func", "pool_exhausted"])
                .get(),
            1
        );

        manager.free(Direction::Receive, IdentifierType::ProfFunc, id).unwrap();
        assert_eq!(recorder.frees.with_label_values(&labels).get(), 1);
        assert_eq!(recorder.in_use.with_label_values(&labels).get(), 0);
    }

    #[test]
    fn test_unbind_clears_in_use() {
        let recorder = Arc::new(MetricsRecorder::new().unwrap());
        let manager = IdentManager::with_observer(recorder.clone());
        let config = PoolConfig::new().with_pool(
            Direction::Transmit,
            IdentifierType::L2Func,
            PoolSpec::new(4),
        );
        manager.bind(&config).unwrap();
        manager.alloc(Direction::Transmit, IdentifierType::L2Func).unwrap();
        manager.unbind().unwrap();

        let text = recorder.gather_metrics().unwrap();
        assert!(text.contains("flowid_alloc_total{direction=\"tx\",ident_type=\"l2_func\"} 1"));
        assert!(!text.contains("flowid_in_use{"));
    }

    #[test]
    fn test_from_config_respects_metrics_enabled() {
        let mut config = TelemetryConfig::default();
        config.metrics_enabled = false;
        assert!(MetricsRecorder::from_config(&config).unwrap().is_none());

        config.metrics_enabled = true;
        let recorder = MetricsRecorder::from_config(&config).unwrap();
        let manager = IdentManager::with_optional_observer(
            recorder.clone().map(|r| r as Arc<dyn AllocObserver>),
        );
        manager
            .bind(&PoolConfig::new().with_pool(
                Direction::Receive,
                IdentifierType::WcProf,
                PoolSpec::new(2),
            ))
            .unwrap();
        manager.alloc(Direction::Receive, IdentifierType::WcProf).unwrap();

        let recorder = recorder.unwrap();
        assert_eq!(recorder.allocations.with_label_values(&["rx", "wc_prof"]).get(), 1);
    }

    /// Holds `on_free` open until the test lets it go.
    struct SlowFree {
        inner: MetricsRecorder,
        entered: Barrier,
        resume: Barrier,
    }

    impl AllocObserver for SlowFree {
        fn on_alloc(&self, direction: Direction, ident_type: IdentifierType, id: Identifier) {
            self.inner.on_alloc(direction, ident_type, id);
        }

        fn on_free(&self, direction: Direction, ident_type: IdentifierType, id: Identifier) {
            self.entered.wait();
            self.resume.wait();
            self.inner.on_free(direction, ident_type, id);
        }

        fn on_unbind(&self, generation: u64) {
            self.inner.on_unbind(generation);
        }
    }

    #[test]
    fn test_unbind_cannot_overtake_pending_free() {
        let observer = Arc::new(SlowFree {
            inner: MetricsRecorder::new().unwrap(),
            entered: Barrier::new(2),
            resume: Barrier::new(2),
        });
        let manager = IdentManager::with_observer(observer.clone());
        manager
            .bind(&PoolConfig::new().with_pool(
                Direction::Receive,
                IdentifierType::EmProf,
                PoolSpec::new(4),
            ))
            .unwrap();
        let id = manager.alloc(Direction::Receive, IdentifierType::EmProf).unwrap();
        let unbound = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                manager
                    .free(Direction::Receive, IdentifierType::EmProf, id)
                    .unwrap()
            });
            observer.entered.wait();

            let unbinder = s.spawn(|| {
                manager.unbind().unwrap();
                unbound.store(true, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(50));
            assert!(!unbound.load(Ordering::SeqCst));

            observer.resume.wait();
            unbinder.join().unwrap();
        });

        assert!(unbound.load(Ordering::SeqCst));
        assert_eq!(
            observer.inner.in_use.with_label_values(&["rx", "em_prof"]).get(),
            0
        );
    }
}
