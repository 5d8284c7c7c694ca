//! RK806 regulator control
//!
//! Voltage changes are read-modify-write on the selector register followed
//! by a read-back check. Enable changes are single writes thanks to the
//! per-regulator write strobes in the enable registers.

use crate::bus::{RegisterBus, pmic_spi_config};
use crate::error::{PmicError, PmicResult};
use crate::id::RegulatorId;
use crate::ranges::{self, RegulatorDescriptor};
use rkfw_spi::SpiConfig;

/// An RK806 (or master/slave pair) behind a register bus.
pub struct Rk806<B> {
    bus: B,
}

impl<B: RegisterBus> Rk806<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// SPI mode the PMIC requires.
    pub fn spi_config() -> SpiConfig {
        pmic_spi_config()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Replace the bits in `mask` with `value`, then read back and compare.
    fn update_bits(&mut self, cs: u8, reg: u8, mask: u8, value: u8) -> PmicResult {
        let old = self.bus.read(cs, reg)?;
        let new = (old & !mask) | (value & mask);
        self.bus.write(cs, reg, new)?;

        let readback = self.bus.read(cs, reg)?;
        if readback & mask != new & mask {
            log::error!(
                "rk806: cs={} reg={:#04x} wrote {:#04x}, read back {:#04x}",
                cs,
                reg,
                new,
                readback
            );
            return Err(PmicError::VerifyFailed);
        }
        Ok(())
    }

    fn program_selector(&mut self, id: RegulatorId, uv: u32, suspend: bool) -> PmicResult {
        let desc = RegulatorDescriptor::for_regulator(id)?;
        let sel = desc.selector(uv).inspect_err(|_| {
            log::warn!("rk806: {} cannot produce {}uV", id, uv);
        })?;
        let reg = if suspend { desc.slp_vsel_reg } else { desc.vsel_reg };

        log::info!(
            "rk806: {} {}uV{} reg={:#04x} mask={:#04x} sel={:#04x}",
            id,
            uv,
            if suspend { " (suspend)" } else { "" },
            reg,
            desc.vsel_mask,
            sel
        );

        self.update_bits(id.chip().chip_select(), reg, desc.vsel_mask, sel)
    }

    /// Program the run-mode output voltage.
    ///
    /// Voltages between grid points round down. Fails with
    /// `InvalidArgument` below the table minimum or, in a fixed range, for
    /// anything but its exact voltage.
    pub fn set_voltage(&mut self, id: RegulatorId, uv: u32) -> PmicResult {
        self.program_selector(id, uv, false)
    }

    /// Program the voltage applied when the PMIC enters sleep.
    pub fn set_suspend_voltage(&mut self, id: RegulatorId, uv: u32) -> PmicResult {
        self.program_selector(id, uv, true)
    }

    /// Read the programmed run-mode voltage.
    pub fn get_voltage(&mut self, id: RegulatorId) -> PmicResult<u32> {
        let desc = RegulatorDescriptor::for_regulator(id)?;
        let sel = self.bus.read(id.chip().chip_select(), desc.vsel_reg)? & desc.vsel_mask;
        ranges::decode(desc.ranges, sel).ok_or(PmicError::InvalidArgument)
    }

    pub fn set_enable(&mut self, id: RegulatorId, enable: bool) -> PmicResult {
        let ctrl = ranges::enable_control(id)?;
        let value = ctrl.value(enable);
        log::debug!(
            "rk806: {} {} reg={:#04x} val={:#04x}",
            id,
            if enable { "on" } else { "off" },
            ctrl.reg,
            value
        );
        self.bus.write(id.chip().chip_select(), ctrl.reg, value)
    }

    pub fn get_enable(&mut self, id: RegulatorId) -> PmicResult<bool> {
        let ctrl = ranges::enable_control(id)?;
        let value = self.bus.read(id.chip().chip_select(), ctrl.reg)?;
        Ok(ctrl.is_enabled(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{Chip, Family};
    use proptest::prelude::*;
    use rkfw_spi::SpiError;

    /// Register file for two chips. Enable registers honour write strobes;
    /// `stuck` registers ignore writes.
    struct FakePmic {
        regs: [[u8; 256]; 2],
        stuck: Option<u8>,
        fail_reads: bool,
        writes: usize,
    }

    impl FakePmic {
        fn new() -> Self {
            Self { regs: [[0; 256]; 2], stuck: None, fail_reads: false, writes: 0 }
        }
    }

    impl RegisterBus for FakePmic {
        fn read(&mut self, cs: u8, reg: u8) -> PmicResult<u8> {
            if self.fail_reads {
                return Err(SpiError::Timeout.into());
            }
            Ok(self.regs[cs as usize][reg as usize])
        }

        fn write(&mut self, cs: u8, reg: u8, value: u8) -> PmicResult {
            self.writes += 1;
            if self.stuck == Some(reg) {
                return Ok(());
            }
            let slot = &mut self.regs[cs as usize][reg as usize];
            if reg <= 0x05 {
                let strobe = value >> 4;
                *slot = (*slot & !strobe) | (value & strobe & 0x0f);
            } else {
                *slot = value;
            }
            Ok(())
        }
    }

    fn pldo(index: u8) -> RegulatorId {
        RegulatorId::new(Family::Pldo, index, Chip::Master).unwrap()
    }

    #[test]
    fn test_set_and_get_voltage() {
        let mut pmic = Rk806::new(FakePmic::new());
        let id = RegulatorId::MASTER_PLDO5;

        pmic.set_voltage(id, 1_825_000).unwrap();
        assert_eq!(pmic.bus().regs[0][0x53], 0x6a);
        assert_eq!(pmic.get_voltage(id), Ok(1_825_000));

        pmic.set_voltage(id, 3_300_000).unwrap();
        assert_eq!(pmic.get_voltage(id), Ok(3_300_000));
    }

    #[test]
    fn test_voltage_rounds_down_to_grid() {
        let mut pmic = Rk806::new(FakePmic::new());
        let id = RegulatorId::MASTER_PLDO5;
        pmic.set_voltage(id, 1_806_000).unwrap();
        assert_eq!(pmic.get_voltage(id), Ok(1_800_000));
    }

    #[test]
    fn test_slave_chip_uses_its_chip_select() {
        let mut pmic = Rk806::new(FakePmic::new());
        let id = RegulatorId::new(Family::Buck, 0, Chip::Slave).unwrap();
        pmic.set_voltage(id, 750_000).unwrap();
        assert_eq!(pmic.bus().regs[1][0x1a], 40);
        assert_eq!(pmic.bus().regs[0][0x1a], 0);
    }

    #[test]
    fn test_suspend_voltage_uses_sleep_register() {
        let mut pmic = Rk806::new(FakePmic::new());
        let id = RegulatorId::MASTER_PLDO5;
        pmic.set_suspend_voltage(id, 1_800_000).unwrap();
        assert_eq!(pmic.bus().regs[0][0x59], 0x68);
        assert_eq!(pmic.bus().regs[0][0x53], 0);
    }

    #[test]
    fn test_out_of_range_voltage_touches_nothing() {
        let mut pmic = Rk806::new(FakePmic::new());
        assert_eq!(
            pmic.set_voltage(RegulatorId::MASTER_PLDO5, 400_000),
            Err(PmicError::InvalidArgument)
        );
        assert_eq!(
            pmic.set_voltage(RegulatorId::MASTER_PLDO5, 3_500_000),
            Err(PmicError::InvalidArgument)
        );
        assert_eq!(pmic.bus().writes, 0);
    }

    #[test]
    fn test_verify_failure_detected() {
        let mut bus = FakePmic::new();
        bus.stuck = Some(0x53);
        let mut pmic = Rk806::new(bus);
        assert_eq!(
            pmic.set_voltage(RegulatorId::MASTER_PLDO5, 3_300_000),
            Err(PmicError::VerifyFailed)
        );
    }

    #[test]
    fn test_bus_failure_propagates() {
        let mut bus = FakePmic::new();
        bus.fail_reads = true;
        let mut pmic = Rk806::new(bus);
        assert_eq!(
            pmic.set_voltage(RegulatorId::MASTER_PLDO5, 3_300_000),
            Err(PmicError::Bus(SpiError::Timeout))
        );
        assert_eq!(pmic.bus().writes, 0);
    }

    #[test]
    fn test_enable_round_trip() {
        let mut pmic = Rk806::new(FakePmic::new());

        pmic.set_enable(pldo(5), true).unwrap();
        pmic.set_enable(pldo(0), true).unwrap();
        assert_eq!(pmic.bus().regs[0][0x04], 0b0011);
        assert_eq!(pmic.get_enable(pldo(5)), Ok(true));

        pmic.set_enable(pldo(5), false).unwrap();
        assert_eq!(pmic.get_enable(pldo(5)), Ok(false));
        // Neighbour in the same register is untouched
        assert_eq!(pmic.get_enable(pldo(0)), Ok(true));
    }

    #[test]
    fn test_buck_enable_groups() {
        let mut pmic = Rk806::new(FakePmic::new());
        let buck = |i| RegulatorId::new(Family::Buck, i, Chip::Master).unwrap();

        pmic.set_enable(buck(6), true).unwrap();
        assert_eq!(pmic.bus().regs[0][0x01], 0b0100);
        assert_eq!(pmic.get_enable(buck(6)), Ok(true));
        assert_eq!(pmic.get_enable(buck(2)), Ok(false));
    }

    #[test]
    fn test_spi_config_is_pmic_mode() {
        assert_eq!(Rk806::<FakePmic>::spi_config().speed_hz, 2_000_000);
    }

    proptest! {
        #[test]
        fn prop_update_bits_preserves_unmasked(initial: u8, mask: u8, value: u8) {
            let mut bus = FakePmic::new();
            bus.regs[0][0x80] = initial;
            let mut pmic = Rk806::new(bus);

            pmic.update_bits(0, 0x80, mask, value).unwrap();
            prop_assert_eq!(pmic.bus().regs[0][0x80], (initial & !mask) | (value & mask));
        }

        #[test]
        fn prop_ldo_readback_within_one_step(uv in 500_000u32..3_400_000) {
            let mut pmic = Rk806::new(FakePmic::new());
            let id = pldo(2);

            pmic.set_voltage(id, uv).unwrap();
            let got = pmic.get_voltage(id).unwrap();
            prop_assert!(got <= uv);
            prop_assert!(uv - got < 12_500);
        }

        #[test]
        fn prop_buck_readback_within_one_step(uv in 500_000u32..3_400_000) {
            let mut pmic = Rk806::new(FakePmic::new());
            let id = RegulatorId::new(Family::Buck, 3, Chip::Master).unwrap();

            pmic.set_voltage(id, uv).unwrap();
            let got = pmic.get_voltage(id).unwrap();
            let step = if uv < 1_500_000 { 6_250 } else { 25_000 };
            prop_assert!(got <= uv);
            prop_assert!(uv - got < step);
        }
    }
}
