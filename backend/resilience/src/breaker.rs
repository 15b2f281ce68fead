use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Breaker tuning. The defaults are the production constants; tests build
/// custom configs with short open windows.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Number of most-recent call outcomes retained.
    pub window_size: usize,
    /// Outcomes required in the window before the failure rate is evaluated.
    pub minimum_calls: usize,
    /// Failure rate (0..=1) at which the breaker opens.
    pub failure_rate_threshold: f64,
    /// How long the breaker stays open before probing.
    pub open_duration: Duration,
    /// Trial calls allowed through while half-open.
    pub half_open_probes: usize,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            minimum_calls: 3,
            failure_rate_threshold: 0.5,
            open_duration: Duration::from_secs(60),
            half_open_probes: 1,
        }
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Calls pass through.
    Closed,
    /// Calls short-circuit immediately.
    Open,
    /// A limited number of trial calls probe for recovery.
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerState::Closed => write!(f, "CLOSED"),
            BreakerState::Open => write!(f, "OPEN"),
            BreakerState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Outcome of a guarded call that did not succeed.
#[derive(Debug, Error)]
pub enum CallError<E: std::error::Error> {
    /// The breaker is open; the underlying operation was never invoked.
    #[error("call rejected: circuit is open")]
    Rejected,
    /// The underlying operation ran and failed.
    #[error("guarded call failed: {0}")]
    Inner(E),
}

struct BreakerCore {
    state: BreakerState,
    /// Sliding window of outcomes, `true` = success.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    probes_in_flight: usize,
}

/// A classic circuit breaker, one instance per guarded operation name,
/// shared by all concurrent callers.
///
/// Counters live behind a `std::sync::Mutex` that is only held for the
/// transition bookkeeping itself, never across an await, so transitions
/// cannot block callers.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    core: Mutex<BreakerCore>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, BreakerConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            core: Mutex::new(BreakerCore {
                state: BreakerState::Closed,
                window: VecDeque::new(),
                opened_at: None,
                probes_in_flight: 0,
            }),
        }
    }

    /// Run `op` under the breaker, recording its outcome.
    pub async fn call<T, E, F, Fut>(&self, op: F) -> Result<T, CallError<E>>
    where
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.try_acquire() {
            debug!(breaker = %self.name, "Call short-circuited");
            return Err(CallError::Rejected);
        }
        match op().await {
            Ok(value) => {
                self.record(true);
                Ok(value)
            }
            Err(err) => {
                self.record(false);
                Err(CallError::Inner(err))
            }
        }
    }

    /// Whether a call may proceed right now. Advances `Open → HalfOpen`
    /// once the open window has elapsed and reserves a probe slot.
    pub fn try_acquire(&self) -> bool {
        let mut core = self.core.lock().unwrap();
        match core.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                let elapsed = core
                    .opened_at
                    .map(|t| t.elapsed() >= self.config.open_duration)
                    .unwrap_or(true);
                if elapsed {
                    self.transition(&mut core, BreakerState::HalfOpen);
                    core.probes_in_flight = 1;
                    true
                } else {
                    false
                }
            }
            BreakerState::HalfOpen => {
                if core.probes_in_flight < self.config.half_open_probes {
                    core.probes_in_flight += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record the outcome of a call admitted by [`try_acquire`].
    pub fn record(&self, success: bool) {
        let mut core = self.core.lock().unwrap();
        match core.state {
            BreakerState::Closed => {
                core.window.push_back(success);
                while core.window.len() > self.config.window_size {
                    core.window.pop_front();
                }
                if core.window.len() >= self.config.minimum_calls {
                    let failures = core.window.iter().filter(|ok| !**ok).count();
                    let rate = failures as f64 / core.window.len() as f64;
                    if rate >= self.config.failure_rate_threshold {
                        self.transition(&mut core, BreakerState::Open);
                        core.opened_at = Some(Instant::now());
                    }
                }
            }
            BreakerState::HalfOpen => {
                core.probes_in_flight = core.probes_in_flight.saturating_sub(1);
                if success {
                    self.transition(&mut core, BreakerState::Closed);
                    core.window.clear();
                } else {
                    self.transition(&mut core, BreakerState::Open);
                    core.opened_at = Some(Instant::now());
                }
            }
            BreakerState::Open => {
                // Late result from a call admitted before the breaker
                // opened; the open window already restarted.
                debug!(breaker = %self.name, success, "Outcome recorded while open; ignored");
            }
        }
    }

    pub fn state(&self) -> BreakerState {
        self.core.lock().unwrap().state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn transition(&self, core: &mut BreakerCore, to: BreakerState) {
        warn!(breaker = %self.name, "Circuit breaker: {} → {}", core.state, to);
        core.state = to;
    }
}
