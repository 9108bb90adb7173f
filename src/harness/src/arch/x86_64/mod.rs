//! x86_64 architecture support.
//!
//! Provides CPUID-based processor identification and, on Linux, the direct
//! `syscall` trap primitives.

pub mod cpuid;
#[cfg(target_os = "linux")]
pub mod syscall;

pub use cpuid::host_cpu;
#[cfg(target_os = "linux")]
pub use syscall::{invoke, syscall1, syscall2, syscall3};
