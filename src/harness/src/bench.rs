//! The benchmark loop and the overhead calibrator.
//!
//! A worker runs two phases back to back:
//!
//! - **Phase A** sweeps every enabled registry entry, bumping the host's call
//!   counter after each probe, until the host's keep-running predicate turns
//!   false.
//! - **Phase B** calls the dummy entry in bursts until a short wall-clock
//!   window has passed since Phase A ended. This prices the loop, the counter
//!   and the indirect call without any kernel work.
//!
//! The reported figure is Phase A's time per call minus Phase B's. The
//! difference is not clamped, so a machine whose kernel entry is cheaper than
//! the loop overhead reports a negative number.

use trapbench_common::{Outcome, SelectError};
use trapbench_hal::{Clock, Counter, Host, WorkerState};

use crate::registry::{Registry, DUMMY};
use crate::select;

/// Name of the published statistic.
pub const METRIC_NAME: &str = "nanosecs per call";

/// Metric slot the statistic is published in.
pub const METRIC_SLOT: usize = 0;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Per-worker arguments supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct WorkerArgs<'a> {
    /// Benchmark name, used as the log prefix.
    pub name: &'a str,
    /// Index of this worker among its siblings.
    pub instance: u32,
}

/// Timestamps and call counts of one worker run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasurementWindow {
    /// Phase A start.
    pub start_time: f64,
    /// Phase A end, also the start of the calibration window.
    pub real_end_time: f64,
    /// Phase B end.
    pub calibration_end_time: f64,
    /// Probe calls made in Phase A.
    pub real_call_count: u64,
    /// Dummy calls made in Phase B.
    pub calibration_call_count: u64,
}

impl MeasurementWindow {
    /// Phase A elapsed seconds.
    pub fn real_elapsed(&self) -> f64 {
        self.real_end_time - self.start_time
    }

    /// Phase B elapsed seconds.
    pub fn calibration_elapsed(&self) -> f64 {
        self.calibration_end_time - self.real_end_time
    }

    /// Harness cost of one loop iteration, in nanoseconds.
    pub fn overhead_ns(&self) -> f64 {
        if self.calibration_call_count == 0 {
            return 0.0;
        }
        self.calibration_elapsed() * NANOS_PER_SEC / self.calibration_call_count as f64
    }

    /// Overhead-corrected nanoseconds per probe call.
    pub fn ns_per_call(&self) -> Option<f64> {
        corrected_ns(self.real_elapsed(), self.real_call_count, self.overhead_ns())
    }
}

/// `elapsed * 1e9 / calls - overhead_ns`, or `None` if no time passed.
pub fn corrected_ns(elapsed: f64, calls: u64, overhead_ns: f64) -> Option<f64> {
    if elapsed <= 0.0 || calls == 0 {
        return None;
    }
    Some(elapsed * NANOS_PER_SEC / calls as f64 - overhead_ns)
}

/// What a worker reports when Phase A made progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// Overhead-corrected cost of one call.
    pub ns_per_call: f64,
    /// Measured harness cost per iteration.
    pub overhead_ns: f64,
    /// The raw window the figures were derived from.
    pub window: MeasurementWindow,
}

/// Burst size and minimum duration of Phase B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibrator {
    /// Dummy calls between two clock reads.
    pub burst: u32,
    /// Minimum seconds since Phase A ended.
    pub window: f64,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            burst: 1_000_000,
            window: 0.1,
        }
    }
}

impl Calibrator {
    /// Runs Phase B, starting the window at `since`.
    ///
    /// Returns the end timestamp and the number of dummy calls. The host
    /// counter is left exactly where it was on entry.
    pub fn calibrate<H: Clock + Counter + ?Sized>(&self, host: &mut H, since: f64) -> (f64, u64) {
        let base = host.counter();
        let end = loop {
            for _ in 0..self.burst {
                let dummy = core::hint::black_box(&DUMMY);
                if dummy.is_enabled() {
                    dummy.invoke_opaque();
                    host.inc_counter();
                }
            }
            let now = host.now();
            if now - since >= self.window {
                break now;
            }
        };
        let calls = host.counter() - base;
        host.set_counter(base);
        log::trace!("calibration: {} dummy calls in {:.6}s", calls, end - since);
        (end, calls)
    }
}

/// Runs Phase A over the enabled entries of `registry`.
///
/// Returns start time, end time and calls made.
pub fn measure<H: Host + ?Sized>(host: &mut H, registry: &Registry) -> (f64, f64, u64) {
    let base = host.counter();
    let start = host.now();
    loop {
        for entry in registry.enabled() {
            entry.invoke();
            host.inc_counter();
        }
        if !host.keep_running() {
            break;
        }
    }
    let end = host.now();
    (start, end, host.counter() - base)
}

/// Runs a full worker against an explicit registry.
///
/// Returns `Ok(None)` when the host stopped the worker before any time
/// elapsed.
pub fn execute<H: Host + ?Sized>(
    args: &WorkerArgs<'_>,
    host: &mut H,
    registry: &mut Registry,
    calibrator: &Calibrator,
) -> Result<Option<Report>, SelectError> {
    select::select_from_settings(&*host, registry)?;

    if args.instance == 0 {
        if let Some(names) = registry.enabled_names() {
            log::info!("{}: exercising syscall on: {}", args.name, names);
        }
    }

    host.set_state(WorkerState::Run);

    let (start_time, real_end_time, real_call_count) = measure(host, registry);
    log::debug!(
        "{}: phase A done, {} calls in {:.6}s",
        args.name,
        real_call_count,
        real_end_time - start_time
    );

    let (calibration_end_time, calibration_call_count) = calibrator.calibrate(host, real_end_time);

    let window = MeasurementWindow {
        start_time,
        real_end_time,
        calibration_end_time,
        real_call_count,
        calibration_call_count,
    };

    let report = window.ns_per_call().map(|ns_per_call| {
        let overhead_ns = window.overhead_ns();
        log::info!(
            "{}: {:.2} nanosecs per call (excluding {:.2} nanosecs test overhead)",
            args.name,
            ns_per_call,
            overhead_ns
        );
        host.set_metric(METRIC_SLOT, METRIC_NAME, ns_per_call);
        Report {
            ns_per_call,
            overhead_ns,
            window,
        }
    });

    host.set_state(WorkerState::Deinit);

    Ok(report)
}

/// Worker entry point for hosts.
///
/// Builds the native registry and runs with the default calibrator.
pub fn worker(args: &WorkerArgs<'_>, host: &mut dyn Host) -> Outcome {
    let mut registry = Registry::native();
    match execute(args, host, &mut registry, &Calibrator::default()) {
        Ok(_) => Outcome::Success,
        Err(_) => Outcome::Failure,
    }
}
