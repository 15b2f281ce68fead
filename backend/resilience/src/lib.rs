//! Circuit breaker: closed/open/half-open guard around flaky external calls.
//!
//! One breaker instance per guarded operation name, shared by all callers.
//! The most recent call outcomes are kept in a fixed sliding window; once
//! enough calls have been seen and the failure rate crosses the threshold,
//! the breaker opens and short-circuits callers until the open window
//! elapses, after which a single probe is allowed through.

pub mod breaker;

pub use breaker::{BreakerConfig, BreakerState, CallError, CircuitBreaker};
