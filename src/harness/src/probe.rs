//! Probe functions.
//!
//! A probe performs exactly one kernel invocation with stack-local scratch
//! storage and reports whether the kernel accepted it. Whatever the kernel
//! wrote back is thrown away.

use crate::abi;
use crate::registry::Probe;

/// Does no kernel work. Models the loop and dispatch cost only.
pub fn dummy() -> bool {
    false
}

/// Invokes `getcpu(&cpu, &node, NULL)`.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn getcpu() -> bool {
    let mut cpu: u32 = 0;
    let mut node: u32 = 0;
    // SAFETY: both pointers refer to live u32 locals, the tcache argument is
    // NULL and ignored by the kernel.
    unsafe {
        crate::arch::syscall3(
            abi::nr::GETCPU,
            &mut cpu as *mut u32 as usize,
            &mut node as *mut u32 as usize,
            0,
        )
    }
    .is_ok()
}

/// Invokes `gettimeofday(&tv, NULL)`.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn gettimeofday() -> bool {
    // struct timeval { time_t tv_sec; suseconds_t tv_usec; }
    let mut tv = [0i64; 2];
    // SAFETY: `tv` has the size and alignment of a timeval; NULL timezone.
    unsafe { crate::arch::syscall2(abi::nr::GETTIMEOFDAY, tv.as_mut_ptr() as usize, 0) }.is_ok()
}

/// Invokes `time(&t)`.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn time() -> bool {
    let mut t: i64 = 0;
    // SAFETY: `t` is a live time_t local.
    unsafe { crate::arch::syscall1(abi::nr::TIME, &mut t as *mut i64 as usize) }.is_ok()
}

/// Probe implementations available on this build target.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub const PROBES: &[(&str, Probe)] = &[
    ("getcpu", getcpu),
    ("gettimeofday", gettimeofday),
    ("time", time),
];

/// Probe implementations available on this build target.
#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub const PROBES: &[(&str, Probe)] = &[];

/// Finds the probe for an operation whose entry point resolved.
pub fn probe_for(name: &str) -> Option<Probe> {
    abi::lookup(name)?;
    PROBES
        .iter()
        .find(|(probe_name, _)| *probe_name == name)
        .map(|(_, probe)| *probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_does_nothing() {
        assert!(!dummy());
    }

    #[test]
    fn no_probe_for_unknown() {
        assert!(probe_for("dummy").is_none());
        assert!(probe_for("bogus").is_none());
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn live_probes_pass() {
        assert!(getcpu());
        assert!(gettimeofday());
        assert!(time());
        assert!(probe_for("time").is_some());
    }
}
