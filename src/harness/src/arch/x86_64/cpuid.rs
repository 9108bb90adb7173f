//! Processor identification through CPUID.

use core::arch::x86_64::__cpuid;
use lazy_static::lazy_static;
use trapbench_common::{ArchFamily, CpuFeatures, CpuInfo, CpuVendor};

const LEAF_VENDOR: u32 = 0x0000_0000;
const LEAF_FEATURES: u32 = 0x0000_0001;
const LEAF_EXT_MAX: u32 = 0x8000_0000;
const LEAF_EXT_FEATURES: u32 = 0x8000_0001;

const EDX_TSC: u32 = 1 << 4;
const EDX_SEP: u32 = 1 << 11;
const EXT_EDX_SYSCALL: u32 = 1 << 11;
const EXT_EDX_LM: u32 = 1 << 29;

lazy_static! {
    /// CPUID results, read once per process.
    static ref HOST_CPU: CpuInfo = identify();
}

/// Describes the processor we are running on.
pub fn host_cpu() -> CpuInfo {
    *HOST_CPU
}

fn identify() -> CpuInfo {
    // SAFETY: CPUID is architecturally guaranteed on every x86-64 processor.
    let leaf0 = unsafe { __cpuid(LEAF_VENDOR) };

    let mut vendor_id = [0u8; 12];
    vendor_id[0..4].copy_from_slice(&leaf0.ebx.to_le_bytes());
    vendor_id[4..8].copy_from_slice(&leaf0.edx.to_le_bytes());
    vendor_id[8..12].copy_from_slice(&leaf0.ecx.to_le_bytes());

    let mut features = CpuFeatures::empty();

    if leaf0.eax >= LEAF_FEATURES {
        // SAFETY: leaf 1 is within the advertised standard range.
        let leaf1 = unsafe { __cpuid(LEAF_FEATURES) };
        features.set(CpuFeatures::TSC, leaf1.edx & EDX_TSC != 0);
        features.set(CpuFeatures::SYSENTER, leaf1.edx & EDX_SEP != 0);
    }

    // SAFETY: querying the extended range maximum is always allowed.
    let ext_max = unsafe { __cpuid(LEAF_EXT_MAX) }.eax;
    if ext_max >= LEAF_EXT_FEATURES {
        // SAFETY: the extended feature leaf is within the advertised range.
        let ext = unsafe { __cpuid(LEAF_EXT_FEATURES) };
        features.set(CpuFeatures::SYSCALL, ext.edx & EXT_EDX_SYSCALL != 0);
        features.set(CpuFeatures::LONG_MODE, ext.edx & EXT_EDX_LM != 0);
    }

    let cpu = CpuInfo {
        arch: ArchFamily::X86_64,
        vendor: CpuVendor::from_vendor_id(&vendor_id),
        features,
    };
    log::debug!("cpu: vendor {} features {:?}", cpu.vendor, cpu.features);
    cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_in_long_mode() {
        let cpu = host_cpu();
        assert_eq!(cpu.arch, ArchFamily::X86_64);
        assert!(cpu.features.contains(CpuFeatures::LONG_MODE));
    }

    #[test]
    fn cached() {
        assert_eq!(host_cpu(), host_cpu());
    }
}
