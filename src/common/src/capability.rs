use bitflags::bitflags;
use core::fmt;

/// Instruction-set family of the running processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchFamily {
    /// 64-bit x86 (AMD64 / Intel 64).
    X86_64,
    /// 32-bit x86.
    X86,
    /// 64-bit ARM.
    Aarch64,
    /// 64-bit RISC-V.
    Riscv64,
    /// Anything else.
    Other,
}

impl ArchFamily {
    /// The family the binary was compiled for.
    pub const fn build_target() -> Self {
        if cfg!(target_arch = "x86_64") {
            ArchFamily::X86_64
        } else if cfg!(target_arch = "x86") {
            ArchFamily::X86
        } else if cfg!(target_arch = "aarch64") {
            ArchFamily::Aarch64
        } else if cfg!(target_arch = "riscv64") {
            ArchFamily::Riscv64
        } else {
            ArchFamily::Other
        }
    }

    /// Whether this is one of the x86 families.
    pub fn is_x86(self) -> bool {
        matches!(self, ArchFamily::X86_64 | ArchFamily::X86)
    }
}

/// Processor vendor, decoded from the CPUID vendor string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuVendor {
    /// "GenuineIntel"
    Intel,
    /// "AuthenticAMD"
    Amd,
    /// "HygonGenuine"
    Hygon,
    /// Any other vendor string, or no CPUID at all.
    Unknown,
}

impl CpuVendor {
    /// Decodes the 12-byte vendor string returned by CPUID leaf 0.
    pub fn from_vendor_id(id: &[u8; 12]) -> Self {
        match id {
            b"GenuineIntel" => CpuVendor::Intel,
            b"AuthenticAMD" => CpuVendor::Amd,
            b"HygonGenuine" => CpuVendor::Hygon,
            _ => CpuVendor::Unknown,
        }
    }
}

impl fmt::Display for CpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuVendor::Intel => write!(f, "Intel"),
            CpuVendor::Amd => write!(f, "AMD"),
            CpuVendor::Hygon => write!(f, "Hygon"),
            CpuVendor::Unknown => write!(f, "unknown"),
        }
    }
}

bitflags! {
    /// Processor features relevant to kernel entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuFeatures: u32 {
        const TSC       = 1 << 0; // CPUID.01H:EDX[4]
        const SYSENTER  = 1 << 1; // CPUID.01H:EDX[11]
        const SYSCALL   = 1 << 2; // CPUID.80000001H:EDX[11]
        const LONG_MODE = 1 << 3; // CPUID.80000001H:EDX[29]
    }
}

/// What the capability gate knows about the processor it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuInfo {
    /// Instruction-set family.
    pub arch: ArchFamily,
    /// Vendor decoded from CPUID.
    pub vendor: CpuVendor,
    /// Advertised features.
    pub features: CpuFeatures,
}

impl CpuInfo {
    /// A processor description with no features, for non-x86 hosts.
    pub const fn foreign(arch: ArchFamily) -> Self {
        Self {
            arch,
            vendor: CpuVendor::Unknown,
            features: CpuFeatures::empty(),
        }
    }

    /// Whether the fast system-call transition is available.
    pub fn has_syscall(&self) -> bool {
        self.features.contains(CpuFeatures::SYSCALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_strings() {
        assert_eq!(CpuVendor::from_vendor_id(b"GenuineIntel"), CpuVendor::Intel);
        assert_eq!(CpuVendor::from_vendor_id(b"AuthenticAMD"), CpuVendor::Amd);
        assert_eq!(CpuVendor::from_vendor_id(b"HygonGenuine"), CpuVendor::Hygon);
        assert_eq!(CpuVendor::from_vendor_id(b"VIA VIA VIA "), CpuVendor::Unknown);
    }

    #[test]
    fn foreign_has_nothing() {
        let cpu = CpuInfo::foreign(ArchFamily::Aarch64);
        assert!(!cpu.arch.is_x86());
        assert!(!cpu.has_syscall());
    }
}
