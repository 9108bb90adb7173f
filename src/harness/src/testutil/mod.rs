//! Test infrastructure for trapbench.
//!
//! Provides a scripted host so the benchmark loop can be driven without a
//! real framework around it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trapbench::testutil::MockHost;
//!
//! let mut host = MockHost::new().with_step(0.25).with_sweeps(3);
//! ```

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use trapbench_hal::{Clock, Counter, MetricSink, RunControl, Settings, WorkerState};

use crate::settings::SettingSnapshot;

/// A host with a deterministic clock and a fixed sweep budget.
///
/// Every call to [`Clock::now`] returns the current time and then advances it
/// by `step` seconds. [`RunControl::keep_running`] returns `true` for the
/// first `sweeps - 1` checks and `false` from then on, so Phase A runs exactly
/// `sweeps` sweeps.
#[derive(Debug)]
pub struct MockHost {
    time: Cell<f64>,
    step: f64,
    sweeps: Cell<u64>,
    counter: u64,
    settings: SettingSnapshot,
    checks: RefCell<Vec<u64>>,
    /// Every metric published, in order.
    pub metrics: Vec<(usize, &'static str, f64)>,
    /// Every state transition reported, in order.
    pub states: Vec<WorkerState>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// One sweep, a 0.25 s clock step, no settings.
    pub fn new() -> Self {
        Self {
            time: Cell::new(0.0),
            step: 0.25,
            sweeps: Cell::new(1),
            counter: 0,
            settings: SettingSnapshot::default(),
            checks: RefCell::new(Vec::new()),
            metrics: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Sets how far the clock moves on each read.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets how many sweeps Phase A performs.
    pub fn with_sweeps(self, sweeps: u64) -> Self {
        self.sweeps.set(sweeps);
        self
    }

    /// Starts the counter at a non-zero value.
    pub fn with_counter(mut self, counter: u64) -> Self {
        self.counter = counter;
        self
    }

    /// Stores a string setting.
    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.settings.insert(key, value);
        self
    }

    /// Counter values observed at each keep-running check.
    pub fn checks(&self) -> Vec<u64> {
        self.checks.borrow().clone()
    }

    /// Current simulated time.
    pub fn time(&self) -> f64 {
        self.time.get()
    }
}

impl Clock for MockHost {
    fn now(&self) -> f64 {
        let t = self.time.get();
        self.time.set(t + self.step);
        t
    }
}

impl RunControl for MockHost {
    fn keep_running(&self) -> bool {
        self.checks.borrow_mut().push(self.counter);
        let left = self.sweeps.get().saturating_sub(1);
        self.sweeps.set(left);
        left > 0
    }

    fn set_state(&mut self, state: WorkerState) {
        self.states.push(state);
    }
}

impl Counter for MockHost {
    fn counter(&self) -> u64 {
        self.counter
    }

    fn inc_counter(&mut self) {
        self.counter += 1;
    }

    fn set_counter(&mut self, value: u64) {
        self.counter = value;
    }
}

impl Settings for MockHost {
    fn setting(&self, key: &str) -> Option<&str> {
        self.settings.setting(key)
    }
}

impl MetricSink for MockHost {
    fn set_metric(&mut self, index: usize, name: &'static str, value: f64) {
        self.metrics.push((index, name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_steps() {
        let host = MockHost::new().with_step(0.5);
        assert_eq!(host.now(), 0.0);
        assert_eq!(host.now(), 0.5);
        assert_eq!(host.time(), 1.0);
    }

    #[test]
    fn sweep_budget() {
        let host = MockHost::new().with_sweeps(3);
        assert!(host.keep_running());
        assert!(host.keep_running());
        assert!(!host.keep_running());
        assert!(!host.keep_running());
        assert_eq!(host.checks().len(), 4);
    }
}
