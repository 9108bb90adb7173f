//! trapbench Host Abstraction Layer (HAL) traits.
//!
//! This crate defines the narrow contract between the benchmark core and the
//! test framework that embeds it. The core never owns a clock, a counter or a
//! settings store of its own; it reaches the outside world only through these
//! traits.

#![no_std]

/// Trait for a monotonic wall-clock time source.
pub trait Clock {
    /// Returns the current monotonic time in seconds.
    fn now(&self) -> f64;
}

/// Lifecycle states a worker reports to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// The worker is about to start measuring.
    Run,
    /// The worker has finished and is tearing down.
    Deinit,
}

/// Trait for the host-owned "keep running" predicate.
pub trait RunControl {
    /// Returns `false` once the host wants the worker to stop.
    ///
    /// Checked once per sweep, never once per call.
    fn keep_running(&self) -> bool;

    /// Notifies the host of a lifecycle transition.
    fn set_state(&mut self, _state: WorkerState) {}
}

/// Trait for the per-worker "operations completed" counter.
pub trait Counter {
    /// Reads the current counter value.
    fn counter(&self) -> u64;
    /// Adds one to the counter.
    fn inc_counter(&mut self);
    /// Overwrites the counter.
    fn set_counter(&mut self, value: u64);
}

/// Trait for a string-typed settings lookup.
pub trait Settings {
    /// Returns the string stored under `key`, if any.
    fn setting(&self, key: &str) -> Option<&str>;
}

/// Trait for publishing named numeric statistics.
pub trait MetricSink {
    /// Stores `value` under `name` in metric slot `index`.
    fn set_metric(&mut self, index: usize, name: &'static str, value: f64);
}

/// Everything a benchmark worker needs from its host.
pub trait Host: Clock + RunControl + Counter + Settings + MetricSink {}

impl<T: Clock + RunControl + Counter + Settings + MetricSink> Host for T {}
