//! Floating-point environment setup: flush subnormal results to zero.
//!
//! The control register is per-thread state. Call
//! [`configure_numeric_environment`] on the thread that runs the solver, once,
//! before any heavy arithmetic.

use tracing::debug;

/// Outcome of the one-shot numeric environment setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    /// Subnormal results are flushed to zero on this thread.
    Enabled,
    /// Target has no supported control register, or the build opted out.
    Unsupported,
}

/// MXCSR flush-to-zero bit.
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse",
    not(feature = "keep-denormals")
))]
const MXCSR_FTZ: u32 = 1 << 15;

/// FPCR flush-to-zero bit.
#[cfg(all(target_arch = "aarch64", not(feature = "keep-denormals")))]
const FPCR_FZ: u64 = 1 << 24;

/// Enable flush-to-zero when the target supports it; a no-op otherwise.
pub fn configure_numeric_environment() -> FlushMode {
    let mode = enable_flush_to_zero();
    debug!(?mode, "numeric environment configured");
    mode
}

/// Whether flush-to-zero is currently set on this thread.
pub fn flush_to_zero_active() -> bool {
    read_flush_to_zero()
}

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse",
    not(feature = "keep-denormals")
))]
#[allow(unsafe_code)]
fn enable_flush_to_zero() -> FlushMode {
    use std::arch::asm;

    let mut csr: u32 = 0;
    // SAFETY: stmxcsr/ldmxcsr only touch the 4-byte local and the SSE control
    // register; setting FTZ changes rounding of underflowing results only.
    unsafe {
        asm!("stmxcsr [{}]", in(reg) &mut csr as *mut u32, options(nostack, preserves_flags));
        csr |= MXCSR_FTZ;
        asm!("ldmxcsr [{}]", in(reg) &csr as *const u32, options(nostack, preserves_flags, readonly));
    }
    FlushMode::Enabled
}

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse",
    not(feature = "keep-denormals")
))]
#[allow(unsafe_code)]
fn read_flush_to_zero() -> bool {
    use std::arch::asm;

    let mut csr: u32 = 0;
    // SAFETY: stores the control register into a local.
    unsafe {
        asm!("stmxcsr [{}]", in(reg) &mut csr as *mut u32, options(nostack, preserves_flags));
    }
    csr & MXCSR_FTZ != 0
}

#[cfg(all(target_arch = "aarch64", not(feature = "keep-denormals")))]
#[allow(unsafe_code)]
fn enable_flush_to_zero() -> FlushMode {
    use std::arch::asm;

    let fpcr: u64;
    // SAFETY: reads and writes FPCR of the current thread; FZ only affects
    // underflowing results.
    unsafe {
        asm!("mrs {}, fpcr", out(reg) fpcr, options(nomem, nostack, preserves_flags));
        asm!("msr fpcr, {}", in(reg) fpcr | FPCR_FZ, options(nomem, nostack, preserves_flags));
    }
    FlushMode::Enabled
}

#[cfg(all(target_arch = "aarch64", not(feature = "keep-denormals")))]
#[allow(unsafe_code)]
fn read_flush_to_zero() -> bool {
    use std::arch::asm;

    let fpcr: u64;
    // SAFETY: reads FPCR of the current thread.
    unsafe {
        asm!("mrs {}, fpcr", out(reg) fpcr, options(nomem, nostack, preserves_flags));
    }
    fpcr & FPCR_FZ != 0
}

#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse",
        not(feature = "keep-denormals")
    ),
    all(target_arch = "aarch64", not(feature = "keep-denormals"))
)))]
fn enable_flush_to_zero() -> FlushMode {
    FlushMode::Unsupported
}

#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse",
        not(feature = "keep-denormals")
    ),
    all(target_arch = "aarch64", not(feature = "keep-denormals"))
)))]
fn read_flush_to_zero() -> bool {
    false
}
