//! Platform capability gate.
//!
//! Runs once before any worker starts and before anything touches the
//! registry. A refusal is not an error: the host skips the benchmark.

use trapbench_common::{ArchFamily, CpuInfo, Unsupported};

use crate::abi::{self, EntryPoint};
use crate::arch;

/// Why the benchmark is compiled out on other targets.
pub const UNIMPLEMENTED_REASON: &str = "only supported on Linux x86-64";

/// Checks the running processor and the build target's kernel ABI.
pub fn check_supported(name: &str) -> Result<(), Unsupported> {
    check_supported_on(name, &arch::host_cpu(), abi::ENTRY_POINTS)
}

/// Checks an explicit processor description against an entry-point table.
///
/// Emits a skip notice naming the failed condition.
pub fn check_supported_on(
    name: &str,
    cpu: &CpuInfo,
    entry_points: &[EntryPoint],
) -> Result<(), Unsupported> {
    let verdict = evaluate(cpu, entry_points);
    match verdict {
        Ok(()) => log::debug!("{}: {} cpu supports syscall", name, cpu.vendor),
        Err(Unsupported::NoEntryPoints) => {
            log::info!("{}: stressor will be skipped, {}", name, Unsupported::NoEntryPoints)
        }
        Err(reason) => log::info!("{} stressor will be skipped, {}", name, reason),
    }
    verdict
}

fn evaluate(cpu: &CpuInfo, entry_points: &[EntryPoint]) -> Result<(), Unsupported> {
    if cpu.arch != ArchFamily::X86_64 {
        return Err(Unsupported::NotX86);
    }
    if !cpu.has_syscall() {
        return Err(Unsupported::NoSyscallInstruction);
    }
    if !abi::any_resolved(entry_points) {
        return Err(Unsupported::NoEntryPoints);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trapbench_common::{CpuFeatures, CpuVendor};

    const ALL: &[EntryPoint] = &[
        EntryPoint::new("getcpu", Some(309)),
        EntryPoint::new("gettimeofday", Some(96)),
        EntryPoint::new("time", Some(201)),
    ];
    const NONE: &[EntryPoint] = &[EntryPoint::new("time", None)];

    fn x86(features: CpuFeatures) -> CpuInfo {
        CpuInfo {
            arch: ArchFamily::X86_64,
            vendor: CpuVendor::Intel,
            features,
        }
    }

    #[test]
    fn test_supported() {
        let cpu = x86(CpuFeatures::SYSCALL | CpuFeatures::LONG_MODE);
        assert_eq!(check_supported_on("x86syscall", &cpu, ALL), Ok(()));
    }

    #[test]
    fn test_foreign_arch_always_refused() {
        for arch in [ArchFamily::Aarch64, ArchFamily::Riscv64, ArchFamily::X86, ArchFamily::Other] {
            let mut cpu = CpuInfo::foreign(arch);
            // even a description claiming the feature is refused
            cpu.features = CpuFeatures::all();
            let empty: &[EntryPoint] = &[];
            for table in [ALL, NONE, empty] {
                assert_eq!(
                    check_supported_on("x86syscall", &cpu, table),
                    Err(Unsupported::NotX86)
                );
            }
        }
    }

    #[test]
    fn test_missing_syscall_feature() {
        let cpu = x86(CpuFeatures::TSC | CpuFeatures::SYSENTER);
        assert_eq!(
            check_supported_on("x86syscall", &cpu, ALL),
            Err(Unsupported::NoSyscallInstruction)
        );
    }

    #[test]
    fn test_no_entry_points() {
        let cpu = x86(CpuFeatures::SYSCALL);
        assert_eq!(
            check_supported_on("x86syscall", &cpu, NONE),
            Err(Unsupported::NoEntryPoints)
        );
    }

    #[test]
    fn test_vendor_does_not_matter() {
        let mut cpu = x86(CpuFeatures::SYSCALL);
        cpu.vendor = CpuVendor::Amd;
        assert!(check_supported_on("x86syscall", &cpu, ALL).is_ok());
        cpu.vendor = CpuVendor::Unknown;
        assert!(check_supported_on("x86syscall", &cpu, ALL).is_ok());
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn test_this_machine() {
        assert_eq!(check_supported("x86syscall"), Ok(()));
    }
}
