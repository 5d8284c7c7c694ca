//! Voltage domain platform interface
//!
//! The responder owns protocol decoding; everything it knows about the
//! domains of an agent comes through [`VoltdPlatform`]. Capabilities a
//! platform does not provide keep the default body and report
//! [`ScmiStatus::NotSupported`], which the responder uses to pick a
//! fallback encoding.

use crate::index::DomainIndex;
use crate::status::{ScmiResult, ScmiStatus};

/// Continuous level description: every `step` from `min` to `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl LevelRange {
    #[inline]
    pub const fn contains(&self, level: i32) -> bool {
        self.min <= level && level <= self.max
    }

    /// Wire order: min, max, step
    pub const fn to_array(self) -> [i32; 3] {
        [self.min, self.max, self.step]
    }
}

/// Backend of the voltage domain responder.
///
/// `domain` arguments have already been checked against
/// [`VoltdPlatform::domain_count`] for the same agent.
pub trait VoltdPlatform {
    /// Number of domains `agent` may address.
    fn domain_count(&self, agent: u32) -> usize;

    /// Domain name, at most 15 bytes are reported.
    fn domain_name(&self, agent: u32, domain: DomainIndex) -> Option<&str>;

    /// DOMAIN_ATTRIBUTES flags (no async support, so zero by default).
    fn domain_attributes(&self, _agent: u32, _domain: DomainIndex) -> u32 {
        0
    }

    /// Number of discrete levels, for domains described by a list.
    fn level_count(&mut self, _agent: u32, _domain: DomainIndex) -> ScmiResult<usize> {
        Err(ScmiStatus::NotSupported)
    }

    /// Fill `out` with the levels starting at `start`.
    ///
    /// Returns the number of levels written.
    fn levels_array(
        &mut self,
        _agent: u32,
        _domain: DomainIndex,
        _start: usize,
        _out: &mut [i32],
    ) -> ScmiResult<usize> {
        Err(ScmiStatus::NotSupported)
    }

    fn levels_by_step(&mut self, _agent: u32, _domain: DomainIndex) -> ScmiResult<LevelRange> {
        Err(ScmiStatus::NotSupported)
    }

    /// Architectural on/off state.
    fn set_state(&mut self, _agent: u32, _domain: DomainIndex, _enable: bool) -> ScmiResult {
        Err(ScmiStatus::NotSupported)
    }

    fn get_state(&mut self, _agent: u32, _domain: DomainIndex) -> ScmiResult<bool> {
        Err(ScmiStatus::NotSupported)
    }

    /// Implementation defined mode, 3-bit mode id.
    fn set_state_custom(&mut self, _agent: u32, _domain: DomainIndex, _mode: u32) -> ScmiResult {
        Err(ScmiStatus::NotSupported)
    }

    fn get_state_custom(&mut self, _agent: u32, _domain: DomainIndex) -> ScmiResult<u32> {
        Err(ScmiStatus::NotSupported)
    }

    fn set_level(&mut self, _agent: u32, _domain: DomainIndex, _level: i32) -> ScmiResult {
        Err(ScmiStatus::NotSupported)
    }

    fn get_level(&mut self, _agent: u32, _domain: DomainIndex) -> ScmiResult<i32> {
        Err(ScmiStatus::NotSupported)
    }
}
