//! MMIO Region Abstraction
//!
//! Provides offset-based access to memory-mapped register blocks. All reads
//! and writes use volatile operations so the compiler can neither reorder
//! nor elide device accesses.
//!
//! Drivers never touch [`MmioRegion`] directly; they are generic over
//! [`RegisterIo`] so host tests can substitute a simulated register block.
//!
//! # Safety
//!
//! The caller is responsible for ensuring the base address points to a valid,
//! mapped MMIO region with device memory attributes.

use core::ptr::{read_volatile, write_volatile};

/// 32-bit register access at byte offsets from a device base.
///
/// Reads of FIFO data registers have side effects (they pop an entry), so
/// implementations must not cache or coalesce accesses.
pub trait RegisterIo {
    /// Read the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset`.
    fn write32(&self, offset: usize, value: u32);

    /// Read-modify-write a register.
    ///
    /// Not atomic with respect to the device or other CPUs.
    #[inline]
    fn modify32<F>(&self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// A memory-mapped register block.
///
/// # Example
///
/// ```ignore
/// let mmio = unsafe { MmioRegion::new(0xFEB2_0000, 0x1000) };
///
/// // Enable the SPI engine
/// mmio.write32(0x08, 1);
/// ```
#[derive(Clone, Copy)]
pub struct MmioRegion {
    base: usize,
    size: usize,
}

impl MmioRegion {
    /// Wrap the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base..base + size` must be mapped as device memory for as long as
    /// the region (or any copy of it) is used, and the firmware must not
    /// drive the same block through another path at the same time.
    #[inline]
    #[must_use]
    pub const unsafe fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Register block length in bytes
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl RegisterIo for MmioRegion {
    /// # Panics
    ///
    /// Panics in debug builds if offset is out of bounds or misaligned.
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.size, "MMIO read32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO read32 offset not aligned");
        // SAFETY: `new` requires a mapped block; offset checked above in debug builds
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    /// # Panics
    ///
    /// Panics in debug builds if offset is out of bounds or misaligned.
    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.size, "MMIO write32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO write32 offset not aligned");
        // SAFETY: `new` requires a mapped block; offset checked above in debug builds
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl core::fmt::Debug for MmioRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MmioRegion")
            .field("base", &format_args!("{:#x}", self.base))
            .field("size", &format_args!("{:#x}", self.size))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_over_plain_memory() {
        let mut backing = [0u32; 4];
        // SAFETY: backing outlives the region and is only accessed through it
        let mmio = unsafe { MmioRegion::new(backing.as_mut_ptr() as usize, 16) };

        mmio.write32(0x8, 0xdead_beef);
        assert_eq!(mmio.read32(0x8), 0xdead_beef);
        assert_eq!(mmio.read32(0x0), 0);
    }

    #[test]
    fn test_modify_preserves_other_bits() {
        let mut backing = [0xF0F0_0000u32; 1];
        // SAFETY: backing outlives the region and is only accessed through it
        let mmio = unsafe { MmioRegion::new(backing.as_mut_ptr() as usize, 4) };

        mmio.modify32(0, |v| v | 0x3);
        assert_eq!(mmio.read32(0), 0xF0F0_0003);
    }
}
