//! Benchmark-wide error types for trapbench.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Reasons the capability gate refuses to run the benchmark.
///
/// None of these are failures: the host skips the benchmark instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsupported {
    /// The running processor is not an x86-64 part.
    NotX86,
    /// The processor does not advertise the `syscall` instruction.
    NoSyscallInstruction,
    /// No operation has a resolvable entry-point number on this target.
    NoEntryPoints,
    /// The benchmark was not built for this target at all.
    Unimplemented(&'static str),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::NotX86 => write!(f, "not a recognised Intel CPU"),
            Unsupported::NoSyscallInstruction => {
                write!(f, "CPU does not support the syscall instruction")
            }
            Unsupported::NoEntryPoints => write!(
                f,
                "no definitions for __NR_getcpu, __NR_gettimeofday or __NR_time"
            ),
            Unsupported::Unimplemented(reason) => write!(f, "{}", reason),
        }
    }
}

/// Errors reported by the operation selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The requested name matches no registry entry.
    InvalidName {
        /// The name that was asked for.
        requested: String,
        /// Every name the registry does hold, in registry order.
        valid: Vec<&'static str>,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::InvalidName { requested, valid } => {
                write!(f, "invalid x86syscall-func '{}', must be one of:", requested)?;
                for name in valid {
                    write!(f, " {}", name)?;
                }
                Ok(())
            }
        }
    }
}

/// A kernel error code decoded from the return channel of a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Errno(pub i32);

impl Errno {
    /// Largest error code the kernel encodes in a return value.
    pub const MAX: i32 = 4095;

    /// Splits a raw return value into a value or an error code.
    ///
    /// Values in `-4095..=-1` are errors, everything else is a result.
    pub fn from_raw(raw: isize) -> Result<usize, Errno> {
        if (-(Self::MAX as isize)..0).contains(&raw) {
            Err(Errno(-raw as i32))
        } else {
            Ok(raw as usize)
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errno {}", self.0)
    }
}

/// Final status of a worker or of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The worker ran to completion.
    Success,
    /// The worker could not start, e.g. a bad operation name.
    Failure,
    /// The benchmark does not apply to this machine.
    NotImplemented,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
            Outcome::NotImplemented => 4,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "passed"),
            Outcome::Failure => write!(f, "failed"),
            Outcome::NotImplemented => write!(f, "skipped"),
        }
    }
}
