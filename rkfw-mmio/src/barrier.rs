//! Memory and Speculation Barriers
//!
//! Barriers used by the SPI and console drivers and by the SCMI message
//! path. On AArch64 these lower to the architectural instructions; on other
//! targets (host unit tests) they degrade to compiler/atomic fences.
//!
//! # ARM64 Mapping
//!
//! - `write_barrier()`: Release fence
//! - `dsb()`: Data Synchronisation Barrier, all outstanding accesses complete
//! - `speculation_barrier()`: CSDB, consumers of a clamped index cannot be
//!   speculated with the unclamped value
//!
//! # Usage
//!
//! ```ignore
//! // Agent-supplied index, clamp before use as a table index
//! let idx = if raw < len { raw } else { 0 };
//! speculation_barrier();
//! let entry = &table[idx];
//! ```

use core::sync::atomic::{Ordering, fence};

/// Write barrier (release semantics).
///
/// Use before an enable write that starts a device consuming queued data.
#[inline]
pub fn write_barrier() {
    fence(Ordering::Release);
}

/// Data Synchronisation Barrier (DSB SY).
///
/// Ensures all memory accesses, including device memory, complete before
/// continuing.
#[inline]
pub fn dsb() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: DSB is always safe to execute
    unsafe {
        core::arch::asm!("dsb sy", options(nostack, preserves_flags));
    }

    #[cfg(not(target_arch = "aarch64"))]
    fence(Ordering::SeqCst);
}

/// Consumption-of-speculative-data barrier.
///
/// Placed between a bounds clamp and the dependent load. Encoded as
/// `hint #20` so it assembles without the CSDB mnemonic being known.
#[inline]
pub fn speculation_barrier() {
    #[cfg(target_arch = "aarch64")]
    // SAFETY: CSDB is a hint instruction with no architectural side effects
    unsafe {
        core::arch::asm!("hint #20", options(nostack, nomem, preserves_flags));
    }

    #[cfg(not(target_arch = "aarch64"))]
    core::sync::atomic::compiler_fence(Ordering::SeqCst);
}
