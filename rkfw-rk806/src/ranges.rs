//! Voltage selector tables
//!
//! Each family splits its output range into contiguous sub-ranges with their
//! own step size. A sub-range covers `[min_uv, next.min_uv)`; the last one
//! extends upward. A zero step marks a single fixed voltage.

use crate::error::{PmicError, PmicResult};
use crate::id::{Family, RegulatorId};
use crate::regs;

/// One linear sub-range of a selector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoltageRange {
    pub min_uv: u32,
    pub step_uv: u32,
    pub min_sel: u8,
    pub max_sel: u8,
}

impl VoltageRange {
    const fn linear(min_uv: u32, step_uv: u32, min_sel: u8, max_sel: u8) -> Self {
        Self { min_uv, step_uv, min_sel, max_sel }
    }

    const fn fixed(uv: u32, min_sel: u8, max_sel: u8) -> Self {
        Self { min_uv: uv, step_uv: 0, min_sel, max_sel }
    }

    pub const fn is_fixed(&self) -> bool {
        self.step_uv == 0
    }

    /// Selector for `uv`, rounding down to the step grid.
    pub fn selector(&self, uv: u32) -> Option<u8> {
        if uv < self.min_uv {
            return None;
        }
        if self.is_fixed() {
            return (uv == self.min_uv).then_some(self.min_sel);
        }
        let code = (uv - self.min_uv) / self.step_uv + u32::from(self.min_sel);
        u8::try_from(code).ok().filter(|&code| code <= self.max_sel)
    }

    /// Output voltage for selector `sel`, if it falls in this range.
    pub fn voltage(&self, sel: u8) -> Option<u32> {
        if !(self.min_sel..=self.max_sel).contains(&sel) {
            return None;
        }
        Some(self.min_uv + u32::from(sel - self.min_sel) * self.step_uv)
    }
}

pub static BUCK_RANGES: [VoltageRange; 3] = [
    VoltageRange::linear(500_000, 6_250, 0x00, 0xa0),
    VoltageRange::linear(1_500_000, 25_000, 0xa1, 0xed),
    VoltageRange::fixed(3_400_000, 0xee, 0xff),
];

pub static LDO_RANGES: [VoltageRange; 2] = [
    VoltageRange::linear(500_000, 12_500, 0x00, 0xe7),
    VoltageRange::fixed(3_400_000, 0xe8, 0xe8),
];

/// The sub-range whose bracket contains `uv`.
pub fn select(ranges: &'static [VoltageRange], uv: u32) -> Option<&'static VoltageRange> {
    ranges.iter().rev().find(|range| uv >= range.min_uv)
}

/// Decode a selector against a full table.
pub fn decode(ranges: &[VoltageRange], sel: u8) -> Option<u32> {
    ranges.iter().find_map(|range| range.voltage(sel))
}

/// Where a regulator's enable state lives.
///
/// The written value carries the state in bit `bit` and the write strobe in
/// bit `bit + 4`; other regulators sharing the register are left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnableControl {
    pub reg: u8,
    pub bit: u8,
}

impl EnableControl {
    const fn new(reg: u8, bit: u8) -> Self {
        Self { reg, bit }
    }

    /// Byte to write for the requested state
    pub const fn value(&self, enable: bool) -> u8 {
        ((enable as u8) << self.bit) | (1 << (self.bit + 4))
    }

    /// Decode the state from a register read
    pub const fn is_enabled(&self, reg_value: u8) -> bool {
        reg_value & (1 << self.bit) != 0
    }
}

/// Register layout of one regulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegulatorDescriptor {
    pub vsel_reg: u8,
    pub slp_vsel_reg: u8,
    /// Buck mode/config register; LDOs have none
    pub config_reg: Option<u8>,
    pub vsel_mask: u8,
    pub ranges: &'static [VoltageRange],
    pub enable: EnableControl,
}

impl RegulatorDescriptor {
    pub fn for_regulator(id: RegulatorId) -> PmicResult<Self> {
        let n = id.number();
        let desc = match id.family() {
            Family::Buck => Self {
                vsel_reg: regs::buck_on_vsel(n),
                slp_vsel_reg: regs::buck_slp_vsel(n),
                config_reg: Some(regs::buck_config(n)),
                vsel_mask: regs::BUCK_VSEL_MASK,
                ranges: &BUCK_RANGES,
                enable: enable_control(id)?,
            },
            Family::Nldo => Self {
                vsel_reg: regs::nldo_on_vsel(n),
                slp_vsel_reg: regs::nldo_slp_vsel(n),
                config_reg: None,
                vsel_mask: regs::NLDO_VSEL_MASK,
                ranges: &LDO_RANGES,
                enable: enable_control(id)?,
            },
            Family::Pldo => Self {
                vsel_reg: regs::pldo_on_vsel(n),
                slp_vsel_reg: regs::pldo_slp_vsel(n),
                config_reg: None,
                vsel_mask: regs::PLDO_VSEL_MASK,
                ranges: &LDO_RANGES,
                enable: enable_control(id)?,
            },
        };
        Ok(desc)
    }

    /// Selector for `uv`, or `InvalidArgument` if no sub-range can produce it.
    pub fn selector(&self, uv: u32) -> PmicResult<u8> {
        select(self.ranges, uv)
            .and_then(|range| range.selector(uv))
            .ok_or(PmicError::InvalidArgument)
    }
}

/// Enable register and bit for a regulator.
///
/// Bucks pack four per register. The LDO banks are irregular: NLDO1-4 share
/// NLDO_EN0 while NLDO5 sits in bit 2 of NLDO_EN2, PLDO1-3 occupy bits 1-3
/// of PLDO_EN0 with PLDO6 in bit 0, and PLDO4/5 sit in PLDO_EN1.
pub fn enable_control(id: RegulatorId) -> PmicResult<EnableControl> {
    let i = id.index();
    let ctrl = match (id.family(), i) {
        (Family::Buck, 0..=9) => EnableControl::new(regs::power_en(i / 4), i % 4),
        (Family::Nldo, 0..=3) => EnableControl::new(regs::nldo_en(0), i),
        (Family::Nldo, 4) => EnableControl::new(regs::nldo_en(2), 2),
        (Family::Pldo, 0..=2) => EnableControl::new(regs::pldo_en(0), i + 1),
        (Family::Pldo, 3) => EnableControl::new(regs::pldo_en(1), 0),
        (Family::Pldo, 4) => EnableControl::new(regs::pldo_en(1), 1),
        (Family::Pldo, 5) => EnableControl::new(regs::pldo_en(0), 0),
        _ => return Err(PmicError::InvalidArgument),
    };
    Ok(ctrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Chip;

    fn id(family: Family, index: u8) -> RegulatorId {
        RegulatorId::new(family, index, Chip::Master).unwrap()
    }

    #[test]
    fn test_buck_selectors() {
        let desc = RegulatorDescriptor::for_regulator(id(Family::Buck, 0)).unwrap();
        assert_eq!(desc.selector(500_000), Ok(0x00));
        assert_eq!(desc.selector(1_000_000), Ok(0x50));
        assert_eq!(desc.selector(1_499_999), Ok(0x9f));
        assert_eq!(desc.selector(1_500_000), Ok(0xa1));
        assert_eq!(desc.selector(3_300_000), Ok(0xa1 + 72));
        assert_eq!(desc.selector(3_400_000), Ok(0xee));
        assert_eq!(desc.selector(499_999), Err(PmicError::InvalidArgument));
        // Fixed range only accepts its exact voltage
        assert_eq!(desc.selector(3_500_000), Err(PmicError::InvalidArgument));
    }

    #[test]
    fn test_ldo_selectors() {
        let desc = RegulatorDescriptor::for_regulator(RegulatorId::MASTER_PLDO5).unwrap();
        assert_eq!(desc.vsel_reg, 0x53);
        assert_eq!(desc.slp_vsel_reg, 0x59);
        assert_eq!(desc.selector(1_800_000), Ok(0x68));
        assert_eq!(desc.selector(3_300_000), Ok(0xe0));
        assert_eq!(desc.selector(3_399_999), Ok(0xe7));
        assert_eq!(desc.selector(3_400_000), Ok(0xe8));
    }

    #[test]
    fn test_decode_matches_encode() {
        assert_eq!(decode(&BUCK_RANGES, 0x50), Some(1_000_000));
        assert_eq!(decode(&BUCK_RANGES, 0xa1), Some(1_500_000));
        assert_eq!(decode(&BUCK_RANGES, 0xf3), Some(3_400_000));
        assert_eq!(decode(&LDO_RANGES, 0xe0), Some(3_300_000));
        assert_eq!(decode(&LDO_RANGES, 0xe9), None);
    }

    #[test]
    fn test_register_addresses() {
        let buck10 = RegulatorDescriptor::for_regulator(id(Family::Buck, 9)).unwrap();
        assert_eq!(buck10.vsel_reg, 0x23);
        assert_eq!(buck10.slp_vsel_reg, 0x2d);
        assert_eq!(buck10.config_reg, Some(0x19));

        let nldo1 = RegulatorDescriptor::for_regulator(id(Family::Nldo, 0)).unwrap();
        assert_eq!(nldo1.vsel_reg, 0x43);
        assert_eq!(nldo1.config_reg, None);
    }

    #[test]
    fn test_enable_layout() {
        let ctrl = |f, i| enable_control(id(f, i)).unwrap();

        assert_eq!(ctrl(Family::Buck, 0), EnableControl { reg: 0x00, bit: 0 });
        assert_eq!(ctrl(Family::Buck, 5), EnableControl { reg: 0x01, bit: 1 });
        assert_eq!(ctrl(Family::Buck, 9), EnableControl { reg: 0x02, bit: 1 });
        assert_eq!(ctrl(Family::Nldo, 3), EnableControl { reg: 0x03, bit: 3 });
        assert_eq!(ctrl(Family::Nldo, 4), EnableControl { reg: 0x05, bit: 2 });
        assert_eq!(ctrl(Family::Pldo, 0), EnableControl { reg: 0x04, bit: 1 });
        assert_eq!(ctrl(Family::Pldo, 2), EnableControl { reg: 0x04, bit: 3 });
        assert_eq!(ctrl(Family::Pldo, 3), EnableControl { reg: 0x05, bit: 0 });
        assert_eq!(ctrl(Family::Pldo, 4), EnableControl { reg: 0x05, bit: 1 });
        assert_eq!(ctrl(Family::Pldo, 5), EnableControl { reg: 0x04, bit: 0 });
    }

    #[test]
    fn test_enable_values() {
        let nldo5 = enable_control(id(Family::Nldo, 4)).unwrap();
        assert_eq!(nldo5.value(true), 0x44);
        assert_eq!(nldo5.value(false), 0x40);

        let pldo4 = enable_control(id(Family::Pldo, 3)).unwrap();
        assert_eq!(pldo4.value(true), 0x11);
        assert_eq!(pldo4.value(false), 0x10);
        assert!(pldo4.is_enabled(0x01));
        assert!(!pldo4.is_enabled(0x02));
    }
}
