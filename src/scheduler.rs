//! The scrape cycle loop and its pacing.

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error};

use crate::convert::convert;
use crate::fetch::{Client, FetchError, Fetcher};
use crate::metrics::{BridgeMetrics, CycleResult, Stage};
use crate::model::{Timestamp, TimestampTrait};
use crate::output::{PushError, Sink};
use crate::parser::{self, ParseError};

/// Source of raw exposition text.
pub trait Scrape {
    fn scrape(&self) -> Result<String, FetchError>;
}

impl<C: Client> Scrape for Fetcher<C> {
    fn scrape(&self) -> Result<String, FetchError> {
        self.fetch()
    }
}

/// Any error that aborts a single cycle. None of them stops the loop.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Push(#[from] PushError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::Fetch(_) => Stage::Fetch,
            CycleError::Parse(_) => Stage::Parse,
            CycleError::Push(_) => Stage::Push,
        }
    }
}

/// How long to sleep after a cycle that took `elapsed`, if at all.
///
/// A slow cycle shortens or skips the following sleep; missed cycles are never made up.
pub fn next_wait(interval: Duration, elapsed: Duration) -> Option<Duration> {
    match interval.checked_sub(elapsed) {
        Some(wait) if wait > Duration::from_secs(0) => Some(wait),
        _ => None,
    }
}

enum State {
    Running,
    Waiting(Duration),
    Finished,
}

pub struct Scheduler<S, K> {
    source: S,
    sink: K,
    prefix: String,
    interval: Duration,
    single: bool,
    metrics: BridgeMetrics,
}

impl<S: Scrape, K: Sink> Scheduler<S, K> {
    pub fn new(source: S, sink: K, metrics: BridgeMetrics) -> Self {
        Self {
            source,
            sink,
            prefix: String::new(),
            interval: Duration::from_secs(0),
            single: false,
            metrics,
        }
    }

    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs exactly one cycle, without pacing.
    pub fn single(mut self, single: bool) -> Self {
        self.single = single;
        if single {
            self.interval = Duration::from_secs(0);
        }
        self
    }

    /// Loops forever, or returns after one cycle in single-shot mode.
    pub fn run(&self) {
        let max_cycles = if self.single { Some(1) } else { None };
        self.drive(max_cycles);
    }

    fn drive(&self, max_cycles: Option<u64>) {
        let mut state = State::Running;
        let mut cycles: u64 = 0;

        loop {
            state = match state {
                State::Running => {
                    let result = self.run_cycle();
                    cycles += 1;

                    if max_cycles.map_or(false, |max| cycles >= max) {
                        State::Finished
                    } else {
                        match next_wait(self.interval, result.duration) {
                            Some(wait) => State::Waiting(wait),
                            None => State::Running,
                        }
                    }
                }
                State::Waiting(wait) => {
                    debug!("Sleeping for {:.3} seconds", wait.as_secs_f64());
                    thread::sleep(wait);
                    State::Running
                }
                State::Finished => return,
            };
        }
    }

    /// Fetch, parse, convert and push once, recording the outcome in the metrics.
    pub fn run_cycle(&self) -> CycleResult {
        let start = Instant::now();
        debug!("Scrape started");

        let record_count = match self.scrape_and_push(Timestamp::now()) {
            Ok(count) => count,
            Err(e) => {
                error!(stage = e.stage().as_str(), error = %e, "scrape cycle failed");
                self.metrics.observe_error(e.stage());
                0
            }
        };

        let result = CycleResult {
            duration: start.elapsed(),
            record_count,
        };
        self.metrics.observe_cycle(&result);
        debug!(
            records = result.record_count,
            "Scrape duration: {:.6}",
            result.duration.as_secs_f64()
        );
        result
    }

    fn scrape_and_push(&self, now: Timestamp) -> Result<usize, CycleError> {
        let raw = self.source.scrape()?;
        let families = parser::parse(&raw).collect::<Result<Vec<_>, _>>()?;
        let records = convert(&families, &self.prefix, now);
        self.sink.push(&records)?;
        Ok(records.len())
    }
}
