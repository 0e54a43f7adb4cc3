//! Self-instrumentation of the bridge.

use std::time::Duration;

use prometheus::{Counter, Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Pipeline stage a cycle failed in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Fetch,
    Parse,
    Push,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Parse => "parse",
            Stage::Push => "push",
        }
    }
}

/// Outcome of one scrape cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleResult {
    pub duration: Duration,
    pub record_count: usize,
}

/// Counters owned by the scheduler and read by the metrics endpoint.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct BridgeMetrics {
    registry: Registry,
    scrape_interval: Gauge,
    scrapes: IntCounter,
    scrape_duration: Counter,
    pushed_records: IntCounter,
    cycle_errors: IntCounterVec,
}

impl BridgeMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let scrape_interval = Gauge::new(
            "graphite_bridge_scrape_interval_seconds",
            "Configured time between scrapes",
        )?;
        let scrapes = IntCounter::new("graphite_bridge_scrape_total", "Number of scrapes")?;
        let scrape_duration = Counter::new(
            "graphite_bridge_scrape_duration_seconds",
            "Scrape duration",
        )?;
        let pushed_records = IntCounter::new(
            "graphite_bridge_pushed_records_total",
            "Number of records pushed to Graphite",
        )?;
        let cycle_errors = IntCounterVec::new(
            Opts::new(
                "graphite_bridge_cycle_errors_total",
                "Number of scrape cycles aborted by an error",
            ),
            &["stage"],
        )?;

        registry.register(Box::new(scrape_interval.clone()))?;
        registry.register(Box::new(scrapes.clone()))?;
        registry.register(Box::new(scrape_duration.clone()))?;
        registry.register(Box::new(pushed_records.clone()))?;
        registry.register(Box::new(cycle_errors.clone()))?;

        Ok(Self {
            registry,
            scrape_interval,
            scrapes,
            scrape_duration,
            pushed_records,
            cycle_errors,
        })
    }

    pub fn set_scrape_interval(&self, interval: Duration) {
        self.scrape_interval.set(interval.as_secs_f64());
    }

    pub fn observe_cycle(&self, result: &CycleResult) {
        self.scrapes.inc();
        self.scrape_duration.inc_by(result.duration.as_secs_f64());
        self.pushed_records.inc_by(result.record_count as u64);
    }

    pub fn observe_error(&self, stage: Stage) {
        self.cycle_errors.with_label_values(&[stage.as_str()]).inc();
    }

    pub fn scrapes(&self) -> u64 {
        self.scrapes.get()
    }

    pub fn scrape_duration(&self) -> f64 {
        self.scrape_duration.get()
    }

    pub fn pushed_records(&self) -> u64 {
        self.pushed_records.get()
    }

    pub fn cycle_errors(&self, stage: Stage) -> u64 {
        self.cycle_errors.with_label_values(&[stage.as_str()]).get()
    }

    /// Encodes every metric in the text exposition format.
    pub fn render(&self) -> prometheus::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_observe_cycle() {
        let metrics = BridgeMetrics::new().unwrap();
        let shared = metrics.clone();

        metrics.observe_cycle(&CycleResult {
            duration: Duration::from_millis(1500),
            record_count: 12,
        });
        metrics.observe_cycle(&CycleResult {
            duration: Duration::from_millis(500),
            record_count: 0,
        });

        assert_eq!(2, shared.scrapes());
        assert!((shared.scrape_duration() - 2.0).abs() < 1e-9);
        assert_eq!(12, shared.pushed_records());
    }

    #[test]
    fn test_observe_error() {
        let metrics = BridgeMetrics::new().unwrap();
        metrics.observe_error(Stage::Fetch);
        metrics.observe_error(Stage::Fetch);
        metrics.observe_error(Stage::Push);

        assert_eq!(2, metrics.cycle_errors(Stage::Fetch));
        assert_eq!(0, metrics.cycle_errors(Stage::Parse));
        assert_eq!(1, metrics.cycle_errors(Stage::Push));
    }

    #[test]
    fn test_render_is_valid_exposition() {
        let metrics = BridgeMetrics::new().unwrap();
        metrics.set_scrape_interval(Duration::from_secs(30));
        metrics.observe_cycle(&CycleResult {
            duration: Duration::from_millis(250),
            record_count: 3,
        });
        metrics.observe_error(Stage::Parse);

        let rendered = String::from_utf8(metrics.render().unwrap()).unwrap();
        assert!(rendered.contains("graphite_bridge_scrape_interval_seconds 30"));
        assert!(rendered.contains("graphite_bridge_scrape_total 1"));
        assert!(rendered.contains("graphite_bridge_scrape_duration_seconds 0.25"));
        assert!(rendered.contains("graphite_bridge_cycle_errors_total{stage=\"parse\"} 1"));

        let families = parser::parse(&rendered)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(5, families.len());
    }

    #[test]
    fn test_instances_are_independent() {
        let first = BridgeMetrics::new().unwrap();
        let second = BridgeMetrics::new().unwrap();
        first.observe_cycle(&CycleResult {
            duration: Duration::from_secs(1),
            record_count: 1,
        });
        assert_eq!(1, first.scrapes());
        assert_eq!(0, second.scrapes());
    }
}
