//! Static voltage domain registry
//!
//! A board describes its domains once as a table of [`VoltageDomain`]s.
//! Each domain carries its level limits, the last level applied, a key
//! naming the hardware behind it, and [`DomainOps`] capability pointers
//! called with the shared backend. The same table serves every agent.

use super::platform::{LevelRange, VoltdPlatform};
use crate::index::DomainIndex;
use crate::status::{ScmiResult, ScmiStatus};

/// Capability table of a domain. `None` marks an absent capability.
pub struct DomainOps<B, K> {
    pub get_level: Option<fn(&mut B, K) -> ScmiResult<i32>>,
    pub set_level: Option<fn(&mut B, K, i32) -> ScmiResult>,
    pub get_state: Option<fn(&mut B, K) -> ScmiResult<bool>>,
    pub set_state: Option<fn(&mut B, K, bool) -> ScmiResult>,
    /// Implementation defined mode id, bits 0..=2 of the config word
    pub get_state_custom: Option<fn(&mut B, K) -> ScmiResult<u32>>,
    pub set_state_custom: Option<fn(&mut B, K, u32) -> ScmiResult>,
}

impl<B, K> DomainOps<B, K> {
    /// No capabilities: fixed level, no state control.
    pub const NONE: Self = Self {
        get_level: None,
        set_level: None,
        get_state: None,
        set_state: None,
        get_state_custom: None,
        set_state_custom: None,
    };
}

impl<B, K> Clone for DomainOps<B, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B, K> Copy for DomainOps<B, K> {}

/// One controllable regulator output.
pub struct VoltageDomain<B, K> {
    name: &'static str,
    min_level: i32,
    max_level: i32,
    /// Zero for a fixed level
    step_level: i32,
    cur_level: i32,
    levels: Option<&'static [i32]>,
    key: K,
    ops: DomainOps<B, K>,
}

impl<B, K: Copy> VoltageDomain<B, K> {
    /// Describe a domain; `boot_level` is clamped into `[min, max]`.
    pub const fn new(
        name: &'static str,
        min_level: i32,
        max_level: i32,
        step_level: i32,
        boot_level: i32,
        key: K,
        ops: DomainOps<B, K>,
    ) -> Self {
        let cur_level = if boot_level < min_level {
            min_level
        } else if boot_level > max_level {
            max_level
        } else {
            boot_level
        };

        Self {
            name,
            min_level,
            max_level,
            step_level,
            cur_level,
            levels: None,
            key,
            ops,
        }
    }

    /// Describe levels as an explicit list instead of a range.
    pub const fn with_levels(mut self, levels: &'static [i32]) -> Self {
        self.levels = Some(levels);
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn key(&self) -> K {
        self.key
    }

    pub const fn cur_level(&self) -> i32 {
        self.cur_level
    }

    pub const fn range(&self) -> LevelRange {
        LevelRange {
            min: self.min_level,
            max: self.max_level,
            step: self.step_level,
        }
    }
}

/// Domain table plus the backend its capabilities operate on.
pub struct DomainRegistry<B, K, const N: usize> {
    backend: B,
    domains: [VoltageDomain<B, K>; N],
}

impl<B, K: Copy, const N: usize> DomainRegistry<B, K, N> {
    pub const fn new(backend: B, domains: [VoltageDomain<B, K>; N]) -> Self {
        Self { backend, domains }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn domain(&self, index: DomainIndex) -> Option<&VoltageDomain<B, K>> {
        self.domains.get(index.get())
    }

    fn domain_mut(&mut self, index: DomainIndex) -> ScmiResult<&mut VoltageDomain<B, K>> {
        self.domains.get_mut(index.get()).ok_or(ScmiStatus::NotFound)
    }

    fn lookup(&self, index: DomainIndex) -> ScmiResult<&VoltageDomain<B, K>> {
        self.domain(index).ok_or(ScmiStatus::NotFound)
    }
}

impl<B, K: Copy, const N: usize> VoltdPlatform for DomainRegistry<B, K, N> {
    fn domain_count(&self, _agent: u32) -> usize {
        N
    }

    fn domain_name(&self, _agent: u32, domain: DomainIndex) -> Option<&str> {
        self.domain(domain).map(VoltageDomain::name)
    }

    fn level_count(&mut self, _agent: u32, domain: DomainIndex) -> ScmiResult<usize> {
        self.lookup(domain)?
            .levels
            .map(<[i32]>::len)
            .ok_or(ScmiStatus::NotSupported)
    }

    fn levels_array(
        &mut self,
        _agent: u32,
        domain: DomainIndex,
        start: usize,
        out: &mut [i32],
    ) -> ScmiResult<usize> {
        let levels = self.lookup(domain)?.levels.ok_or(ScmiStatus::NotSupported)?;
        let window = start
            .checked_add(out.len())
            .and_then(|end| levels.get(start..end))
            .ok_or(ScmiStatus::InvalidParameters)?;

        out.copy_from_slice(window);
        Ok(window.len())
    }

    fn levels_by_step(&mut self, _agent: u32, domain: DomainIndex) -> ScmiResult<LevelRange> {
        Ok(self.lookup(domain)?.range())
    }

    fn set_state(&mut self, _agent: u32, domain: DomainIndex, enable: bool) -> ScmiResult {
        let (op, key) = {
            let d = self.lookup(domain)?;
            (d.ops.set_state.ok_or(ScmiStatus::NotSupported)?, d.key)
        };
        op(&mut self.backend, key, enable)
    }

    fn get_state(&mut self, _agent: u32, domain: DomainIndex) -> ScmiResult<bool> {
        let (op, key) = {
            let d = self.lookup(domain)?;
            (d.ops.get_state.ok_or(ScmiStatus::NotSupported)?, d.key)
        };
        op(&mut self.backend, key)
    }

    fn set_state_custom(&mut self, _agent: u32, domain: DomainIndex, mode: u32) -> ScmiResult {
        let (op, key) = {
            let d = self.lookup(domain)?;
            (d.ops.set_state_custom.ok_or(ScmiStatus::NotSupported)?, d.key)
        };
        op(&mut self.backend, key, mode)
    }

    fn get_state_custom(&mut self, _agent: u32, domain: DomainIndex) -> ScmiResult<u32> {
        let (op, key) = {
            let d = self.lookup(domain)?;
            (d.ops.get_state_custom.ok_or(ScmiStatus::NotSupported)?, d.key)
        };
        op(&mut self.backend, key)
    }

    /// Hardware level when the domain can read it back, otherwise the
    /// last level applied.
    fn get_level(&mut self, _agent: u32, domain: DomainIndex) -> ScmiResult<i32> {
        let (op, key, cached) = {
            let d = self.lookup(domain)?;
            (d.ops.get_level, d.key, d.cur_level)
        };

        match op.map(|get| get(&mut self.backend, key)) {
            None | Some(Err(ScmiStatus::NotSupported)) => Ok(cached),
            Some(result) => result,
        }
    }

    fn set_level(&mut self, _agent: u32, domain: DomainIndex, level: i32) -> ScmiResult {
        let (op, key) = {
            let d = self.lookup(domain)?;
            let op = d.ops.set_level.ok_or(ScmiStatus::NotSupported)?;
            if !d.range().contains(level) {
                return Err(ScmiStatus::InvalidParameters);
            }
            (op, d.key)
        };

        op(&mut self.backend, key, level)?;
        self.domain_mut(domain)?.cur_level = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{config, id};
    use crate::voltd::VoltdResponder;
    use std::vec::Vec;

    /// Backend recording the last level written per key.
    #[derive(Default)]
    struct Rails {
        level: [i32; 2],
        enabled: [bool; 2],
        mode: [u32; 2],
        fail: bool,
    }

    fn rail_set(rails: &mut Rails, key: usize, level: i32) -> ScmiResult {
        if rails.fail {
            return Err(ScmiStatus::HardwareError);
        }
        rails.level[key] = level;
        Ok(())
    }

    fn rail_get(rails: &mut Rails, key: usize) -> ScmiResult<i32> {
        if rails.fail {
            return Err(ScmiStatus::HardwareError);
        }
        match rails.level[key] {
            0 => Err(ScmiStatus::NotSupported),
            level => Ok(level),
        }
    }

    fn rail_set_state(rails: &mut Rails, key: usize, enable: bool) -> ScmiResult {
        rails.enabled[key] = enable;
        Ok(())
    }

    fn rail_set_mode(rails: &mut Rails, key: usize, mode: u32) -> ScmiResult {
        if rails.fail {
            return Err(ScmiStatus::HardwareError);
        }
        rails.mode[key] = mode;
        Ok(())
    }

    fn rail_get_mode(rails: &mut Rails, key: usize) -> ScmiResult<u32> {
        Ok(rails.mode[key])
    }

    const OPS: DomainOps<Rails, usize> = DomainOps {
        get_level: Some(rail_get),
        set_level: Some(rail_set),
        get_state: None,
        set_state: Some(rail_set_state),
        get_state_custom: None,
        set_state_custom: None,
    };

    /// Fixed rail whose only control is an implementation defined mode
    const MODE_OPS: DomainOps<Rails, usize> = DomainOps {
        get_state_custom: Some(rail_get_mode),
        set_state_custom: Some(rail_set_mode),
        ..DomainOps::NONE
    };

    static LIST: [i32; 3] = [900_000, 1_000_000, 1_100_000];

    fn registry() -> DomainRegistry<Rails, usize, 2> {
        DomainRegistry::new(
            Rails::default(),
            [
                VoltageDomain::new("vccio_sd", 1_800_000, 3_300_000, 12_500, 3_300_000, 0, OPS),
                VoltageDomain::new("vdd_fixed", 900_000, 1_100_000, 0, 0, 1, MODE_OPS)
                    .with_levels(&LIST),
            ],
        )
    }

    fn idx(raw: u32) -> DomainIndex {
        DomainIndex::new(raw, 2).unwrap()
    }

    #[test]
    fn test_boot_level_clamped() {
        let reg = registry();
        assert_eq!(reg.domain(idx(0)).unwrap().cur_level(), 3_300_000);
        assert_eq!(reg.domain(idx(1)).unwrap().cur_level(), 900_000);
    }

    #[test]
    fn test_set_level_updates_cache() {
        let mut reg = registry();
        reg.set_level(0, idx(0), 1_825_000).unwrap();
        assert_eq!(reg.backend().level[0], 1_825_000);
        assert_eq!(reg.domain(idx(0)).unwrap().cur_level(), 1_825_000);
        assert_eq!(reg.get_level(0, idx(0)), Ok(1_825_000));
    }

    #[test]
    fn test_set_level_out_of_range() {
        let mut reg = registry();
        assert_eq!(reg.set_level(0, idx(0), 3_312_500), Err(ScmiStatus::InvalidParameters));
        assert_eq!(reg.set_level(0, idx(0), 1_787_500), Err(ScmiStatus::InvalidParameters));
        assert_eq!(reg.backend().level[0], 0);
        assert_eq!(reg.domain(idx(0)).unwrap().cur_level(), 3_300_000);
    }

    #[test]
    fn test_set_level_failure_keeps_cache() {
        let mut reg = registry();
        reg.backend_mut().fail = true;
        assert_eq!(reg.set_level(0, idx(0), 2_000_000), Err(ScmiStatus::HardwareError));
        assert_eq!(reg.domain(idx(0)).unwrap().cur_level(), 3_300_000);
    }

    #[test]
    fn test_set_level_without_capability() {
        let mut reg = registry();
        assert_eq!(reg.set_level(0, idx(1), 1_000_000), Err(ScmiStatus::NotSupported));
    }

    #[test]
    fn test_get_level_falls_back_to_cache() {
        let mut reg = registry();
        // Backend reports NotSupported until a level is written
        assert_eq!(reg.get_level(0, idx(0)), Ok(3_300_000));
        // No capability at all
        assert_eq!(reg.get_level(0, idx(1)), Ok(900_000));
    }

    #[test]
    fn test_get_level_propagates_hardware_error() {
        let mut reg = registry();
        reg.set_level(0, idx(0), 2_000_000).unwrap();
        reg.backend_mut().fail = true;
        assert_eq!(reg.get_level(0, idx(0)), Err(ScmiStatus::HardwareError));
    }

    #[test]
    fn test_state_capabilities() {
        let mut reg = registry();
        reg.set_state(0, idx(0), true).unwrap();
        assert!(reg.backend().enabled[0]);
        assert_eq!(reg.get_state(0, idx(0)), Err(ScmiStatus::NotSupported));
        assert_eq!(reg.set_state(0, idx(1), true), Err(ScmiStatus::NotSupported));
        assert_eq!(reg.get_state_custom(0, idx(0)), Err(ScmiStatus::NotSupported));
        assert_eq!(reg.set_state_custom(0, idx(0), 2), Err(ScmiStatus::NotSupported));
    }

    #[test]
    fn test_custom_mode_routed_to_backend() {
        let mut reg = registry();
        reg.set_state_custom(0, idx(1), 5).unwrap();
        assert_eq!(reg.backend().mode, [0, 5]);
        assert_eq!(reg.get_state_custom(0, idx(1)), Ok(5));

        reg.backend_mut().fail = true;
        assert_eq!(reg.set_state_custom(0, idx(1), 3), Err(ScmiStatus::HardwareError));
        assert_eq!(reg.backend().mode[1], 5);
    }

    #[test]
    fn test_custom_config_through_responder() {
        let words = |values: &[u32]| -> Vec<u8> {
            values.iter().flat_map(|v| v.to_le_bytes()).collect()
        };
        let mut voltd = VoltdResponder::new(registry());

        let set = voltd.dispatch(0, id::CONFIG_SET, &words(&[1, config::MODE_TYPE_IMPL | 5]));
        assert_eq!(set.as_bytes(), 0i32.to_le_bytes());
        assert_eq!(voltd.platform().backend().mode[1], 5);

        let get = voltd.dispatch(0, id::CONFIG_GET, &words(&[1]));
        assert_eq!(get.status_code(), 0);
        let cfg = get.word(1).unwrap() as u32;
        assert_ne!(cfg & config::MODE_TYPE_IMPL, 0);
        assert_eq!(cfg & config::MODE_ID_MASK, 5);

        // Architectural modes still need a state capability
        let set = voltd.dispatch(0, id::CONFIG_SET, &words(&[1, config::MODE_ID_ON]));
        assert_eq!(set.as_bytes(), (-1i32).to_le_bytes());
    }

    #[test]
    fn test_levels_array_window() {
        let mut reg = registry();
        assert_eq!(reg.level_count(0, idx(0)), Err(ScmiStatus::NotSupported));
        assert_eq!(reg.level_count(0, idx(1)), Ok(3));

        let mut out = [0i32; 2];
        assert_eq!(reg.levels_array(0, idx(1), 1, &mut out), Ok(2));
        assert_eq!(out, [1_000_000, 1_100_000]);

        assert_eq!(reg.levels_array(0, idx(1), 3, &mut []), Ok(0));
        assert_eq!(
            reg.levels_array(0, idx(1), 2, &mut out),
            Err(ScmiStatus::InvalidParameters)
        );
    }

    #[test]
    fn test_levels_by_step_and_names() {
        let mut reg = registry();
        let range = reg.levels_by_step(0, idx(0)).unwrap();
        assert_eq!(range.to_array(), [1_800_000, 3_300_000, 12_500]);
        assert_eq!(reg.domain_count(3), 2);
        assert_eq!(reg.domain_name(0, idx(1)), Some("vdd_fixed"));
    }
}
