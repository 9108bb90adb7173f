//! trapbench
//!
//! Measures the raw latency of entering and leaving the kernel through the
//! x86-64 `syscall` instruction, bypassing the C library wrappers.
//!
//! # Architecture
//!
//! The crate is structured into the following modules:
//! - `arch`: Platform-specific code (trap primitives, CPU identification)
//! - `abi`: Kernel entry-point numbers available on the build target
//! - `probe`: Zero-argument probes wrapping one kernel operation each
//! - `registry`: The ordered set of probes a worker may exercise
//! - `select`: Narrowing the registry to one requested operation
//! - `gate`: Deciding whether the benchmark applies to this machine
//! - `bench`: The timed loop and the overhead calibrator
//!
//! # Safety
//!
//! The only unsafe code lives in `arch`. Every block documents the invariant
//! it relies on.

#![no_std]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod abi;
pub mod arch;
pub mod bench;
pub mod gate;
pub mod help;
pub mod probe;
pub mod registry;
pub mod select;
pub mod settings;
pub mod testutil;

use trapbench_common::{Outcome, Unsupported};
use trapbench_hal::Host;

pub use bench::WorkerArgs;
pub use help::HelpEntry;
pub use registry::{OperationEntry, Registry};
pub use settings::OptionSetter;

/// Name the benchmark is known by on the command line and in logs.
pub const NAME: &str = "x86syscall";

/// Grouping the host uses when listing benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchClass {
    /// Exercises operating-system interfaces.
    Os,
}

/// Capability-check entry point.
pub type SupportedFn = fn(&str) -> Result<(), Unsupported>;

/// Worker entry point.
pub type WorkerFn = fn(&WorkerArgs<'_>, &mut dyn Host) -> Outcome;

/// Everything a host needs to run this benchmark.
#[derive(Debug, Clone, Copy)]
pub struct BenchInfo {
    /// Benchmark name.
    pub name: &'static str,
    /// Benchmark class.
    pub class: BenchClass,
    /// Run once before any worker starts.
    pub supported: Option<SupportedFn>,
    /// Run once per worker instance.
    pub worker: Option<WorkerFn>,
    /// Setters for the options this benchmark owns.
    pub option_setters: &'static [OptionSetter],
    /// Help text.
    pub help: &'static [HelpEntry],
    /// Why the benchmark cannot run on this build target, if it cannot.
    pub unimplemented_reason: Option<&'static str>,
}

/// Returns the descriptor for the current build target.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn bench_info() -> BenchInfo {
    BenchInfo {
        name: NAME,
        class: BenchClass::Os,
        supported: Some(gate::check_supported),
        worker: Some(bench::worker),
        option_setters: settings::OPTION_SETTERS,
        help: &help::HELP,
        unimplemented_reason: None,
    }
}

/// Returns the descriptor for the current build target.
#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub fn bench_info() -> BenchInfo {
    BenchInfo {
        name: NAME,
        class: BenchClass::Os,
        supported: None,
        worker: None,
        option_setters: settings::OPTION_SETTERS,
        help: &help::HELP,
        unimplemented_reason: Some(gate::UNIMPLEMENTED_REASON),
    }
}
