//! Speculation-safe indexing
//!
//! Indices taken from agent messages are clamped with a data-dependent mask
//! and a speculation barrier before they can reach a table lookup, so a
//! mispredicted bounds check cannot load out of bounds.

use rkfw_mmio::speculation_barrier;

/// Clamp `value` against `bound`.
///
/// Returns `Some(value)` only when `value < bound`. The returned index is
/// masked to zero on the out-of-range path even under speculation.
#[inline]
pub fn bounded(value: u32, bound: usize) -> Option<usize> {
    let index = value as usize;
    let in_range = index < bound;
    // All ones when in range, zero otherwise
    let mask = (in_range as usize).wrapping_neg();
    let clamped = index & mask;
    speculation_barrier();
    in_range.then_some(clamped)
}

/// A domain identifier checked against the domain count of one agent.
///
/// Only [`DomainIndex::new`] creates one, so holding a `DomainIndex` means
/// the clamp has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainIndex(usize);

impl DomainIndex {
    pub fn new(raw: u32, count: usize) -> Option<Self> {
        bounded(raw, count).map(Self)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Wire representation
    #[inline]
    pub const fn id(self) -> u32 {
        self.0 as u32
    }
}
