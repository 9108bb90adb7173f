//! Architecture-specific implementations.
//!
//! This module provides the trap primitives and processor identification for
//! the targeted architecture. Currently supported: x86_64.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use x86_64::*;

/// Describes the processor we are running on.
///
/// There is nothing to probe off x86-64, so the answer is a featureless
/// description of the build target's family.
#[cfg(not(target_arch = "x86_64"))]
pub fn host_cpu() -> trapbench_common::CpuInfo {
    trapbench_common::CpuInfo::foreign(trapbench_common::ArchFamily::build_target())
}
