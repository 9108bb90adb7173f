//! Direct `syscall` trap primitives for Linux x86-64.
//!
//! The kernel ABI takes the entry-point number in `rax` and arguments in
//! `rdi`, `rsi`, `rdx`. The instruction itself overwrites `rcx` (return
//! address) and `r11` (saved RFLAGS); the result comes back in `rax`.
//!
//! Errors are encoded in the return channel: a value in `-4095..=-1` is a
//! negated errno. The primitives split that out with [`Errno::from_raw`].

use core::arch::asm;
use trapbench_common::Errno;

/// Traps into the kernel with one argument.
///
/// # Safety
///
/// `nr` and `a0` must form a call the kernel can complete without touching
/// memory the caller does not own.
#[inline(always)]
pub unsafe fn syscall1(nr: usize, a0: usize) -> Result<usize, Errno> {
    let ret: isize;
    // SAFETY: The caller vouches for the arguments. Memory and flags are
    // clobbered by default since neither `nomem` nor `preserves_flags` is set.
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") nr as isize => ret,
            in("rdi") a0,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack),
        );
    }
    Errno::from_raw(ret)
}

/// Traps into the kernel with two arguments.
///
/// # Safety
///
/// See [`syscall1`].
#[inline(always)]
pub unsafe fn syscall2(nr: usize, a0: usize, a1: usize) -> Result<usize, Errno> {
    let ret: isize;
    // SAFETY: As for `syscall1`.
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") nr as isize => ret,
            in("rdi") a0,
            in("rsi") a1,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack),
        );
    }
    Errno::from_raw(ret)
}

/// Traps into the kernel with three arguments.
///
/// # Safety
///
/// See [`syscall1`].
#[inline(always)]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> Result<usize, Errno> {
    let ret: isize;
    // SAFETY: As for `syscall1`.
    unsafe {
        asm!(
            "syscall",
            inlateout("rax") nr as isize => ret,
            in("rdi") a0,
            in("rsi") a1,
            in("rdx") a2,
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack),
        );
    }
    Errno::from_raw(ret)
}

/// Traps into the kernel with up to three arguments.
///
/// Missing arguments are passed as zero.
///
/// # Safety
///
/// See [`syscall1`].
#[inline]
pub unsafe fn invoke(nr: usize, args: &[usize]) -> Result<usize, Errno> {
    let a0 = args.first().copied().unwrap_or(0);
    let a1 = args.get(1).copied().unwrap_or(0);
    let a2 = args.get(2).copied().unwrap_or(0);
    // SAFETY: Forwarded from the caller.
    unsafe {
        match args.len() {
            0 | 1 => syscall1(nr, a0),
            2 => syscall2(nr, a0, a1),
            _ => syscall3(nr, a0, a1, a2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::nr;

    #[test]
    fn time_with_null_pointer() {
        // SAFETY: time(NULL) writes nothing.
        let secs = unsafe { syscall1(nr::TIME, 0) }.unwrap();
        assert!(secs > 1_600_000_000);
    }

    #[test]
    fn gettimeofday_fills_buffer() {
        let mut tv = [0u64; 2];
        // SAFETY: `tv` is a writable timeval-sized buffer.
        let ret = unsafe { syscall2(nr::GETTIMEOFDAY, tv.as_mut_ptr() as usize, 0) };
        assert_eq!(ret, Ok(0));
        assert!(tv[0] > 1_600_000_000);
        assert!(tv[1] < 1_000_000);
    }

    #[test]
    fn getcpu_reports_a_cpu() {
        let mut cpu = u32::MAX;
        let mut node = u32::MAX;
        // SAFETY: both out-pointers are valid u32 slots, the cache pointer is NULL.
        let ret = unsafe {
            syscall3(
                nr::GETCPU,
                &mut cpu as *mut u32 as usize,
                &mut node as *mut u32 as usize,
                0,
            )
        };
        assert_eq!(ret, Ok(0));
        assert_ne!(cpu, u32::MAX);
    }

    #[test]
    fn bad_address_is_an_errno() {
        // EFAULT: the kernel refuses to write through a kernel-half pointer.
        let ret = unsafe { syscall2(nr::GETTIMEOFDAY, usize::MAX - 4095, 0) };
        assert_eq!(ret, Err(Errno(14)));
    }

    #[test]
    fn invoke_dispatches_on_arity() {
        let mut tv = [0u64; 2];
        let ret = unsafe { invoke(nr::GETTIMEOFDAY, &[tv.as_mut_ptr() as usize, 0]) };
        assert_eq!(ret, Ok(0));
        assert!(unsafe { invoke(nr::TIME, &[]) }.is_ok());
    }
}
