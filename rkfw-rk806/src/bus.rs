//! RK806 register access over SPI
//!
//! Frame formats (one chip-select assertion per access):
//!
//! ```text
//! read:  tx [CMD_READ, reg, REG_H]          then rx [value]
//! write: tx [CMD_WRITE, reg, REG_H, value]
//! ```

use rkfw_spi::{BitOrder, ClockPhase, ClockPolarity, FrameSize, SpiBus, SpiConfig, Transfer};

use crate::error::PmicResult;
use crate::regs;

/// PMIC SCLK (Hz)
pub const PMIC_SPI_SPEED: u32 = 2_000_000;

/// Controller configuration the RK806 expects: mode 0, 8-bit frames,
/// MSB first.
pub fn pmic_spi_config() -> SpiConfig {
    SpiConfig {
        frame_size: FrameSize::Bits8,
        polarity: ClockPolarity::IdleLow,
        phase: ClockPhase::FirstEdge,
        bit_order: BitOrder::MsbFirst,
        csm_cycles: 0,
        speed_hz: PMIC_SPI_SPEED,
        ..SpiConfig::default()
    }
}

/// Byte-wide register access to a PMIC selected by chip select.
pub trait RegisterBus {
    fn read(&mut self, cs: u8, reg: u8) -> PmicResult<u8>;

    fn write(&mut self, cs: u8, reg: u8, value: u8) -> PmicResult;
}

/// [`RegisterBus`] implemented with RK806 SPI framing.
pub struct SpiRegisterBus<S> {
    spi: S,
}

impl<S: SpiBus> SpiRegisterBus<S> {
    /// Take ownership of `spi` and switch it to the PMIC mode.
    pub fn new(spi: S) -> Self {
        Self::with_speed(spi, PMIC_SPI_SPEED)
    }

    /// As [`new`](Self::new), clocking SCLK at `speed_hz`.
    pub fn with_speed(mut spi: S, speed_hz: u32) -> Self {
        spi.configure(SpiConfig {
            speed_hz,
            ..pmic_spi_config()
        });
        Self { spi }
    }

    pub fn spi(&self) -> &S {
        &self.spi
    }

    fn read_frame(&mut self, reg: u8) -> PmicResult<u8> {
        let cmd = [regs::CMD_READ, reg, regs::REG_H];
        let mut value = [0u8; 1];

        self.spi.transfer(Transfer::Write(&cmd))?;
        self.spi.stop()?;
        self.spi.transfer(Transfer::Read(&mut value))?;
        Ok(value[0])
    }

    /// Run `op` with `cs` asserted, then always stop the engine and release
    /// chip select. The first error wins.
    fn with_cs<T>(
        &mut self,
        cs: u8,
        op: impl FnOnce(&mut Self) -> PmicResult<T>,
    ) -> PmicResult<T> {
        self.spi.set_cs(cs, true)?;
        let result = op(self);
        let stopped = self.spi.stop();
        let released = self.spi.set_cs(cs, false);

        let value = result?;
        stopped?;
        released?;
        Ok(value)
    }
}

impl<S: SpiBus> RegisterBus for SpiRegisterBus<S> {
    fn read(&mut self, cs: u8, reg: u8) -> PmicResult<u8> {
        let result = self.with_cs(cs, |bus| bus.read_frame(reg));
        if let Err(err) = result {
            log::error!("rk806: read cs={} reg={:#04x} failed: {}", cs, reg, err);
        }
        result
    }

    fn write(&mut self, cs: u8, reg: u8, value: u8) -> PmicResult {
        let frame = [regs::CMD_WRITE, reg, regs::REG_H, value];
        let result = self.with_cs(cs, |bus| {
            bus.spi.transfer(Transfer::Write(&frame))?;
            Ok(())
        });
        if let Err(err) = result {
            log::error!(
                "rk806: write cs={} reg={:#04x} val={:#04x} failed: {}",
                cs,
                reg,
                value,
                err
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PmicError;
    use rkfw_spi::{SpiError, SpiResult};
    use std::vec::Vec;

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Cs(u8, bool),
        Tx(Vec<u8>),
        Rx(usize),
        Stop,
    }

    /// Records bus operations; reads return `reply`
    struct RecordingSpi {
        ops: Vec<Op>,
        config: Option<SpiConfig>,
        reply: u8,
        fail_rx: bool,
    }

    impl RecordingSpi {
        fn new(reply: u8) -> Self {
            Self { ops: Vec::new(), config: None, reply, fail_rx: false }
        }
    }

    impl SpiBus for RecordingSpi {
        fn configure(&mut self, config: SpiConfig) {
            self.config = Some(config);
        }

        fn set_cs(&mut self, cs: u8, active: bool) -> SpiResult {
            self.ops.push(Op::Cs(cs, active));
            Ok(())
        }

        fn transfer(&mut self, xfer: Transfer<'_>) -> SpiResult {
            match xfer {
                Transfer::Write(tx) => self.ops.push(Op::Tx(tx.to_vec())),
                Transfer::Read(rx) => {
                    self.ops.push(Op::Rx(rx.len()));
                    if self.fail_rx {
                        return Err(SpiError::Timeout);
                    }
                    rx.fill(self.reply);
                }
                Transfer::Duplex { .. } => return Err(SpiError::InvalidConfig),
            }
            Ok(())
        }

        fn stop(&mut self) -> SpiResult {
            self.ops.push(Op::Stop);
            Ok(())
        }
    }

    #[test]
    fn test_configures_pmic_mode() {
        let bus = SpiRegisterBus::new(RecordingSpi::new(0));
        let cfg = bus.spi().config.unwrap();
        assert_eq!(cfg.speed_hz, PMIC_SPI_SPEED);
        assert_eq!(cfg.frame_size, FrameSize::Bits8);
        assert_eq!(cfg.polarity, ClockPolarity::IdleLow);
        assert_eq!(cfg.phase, ClockPhase::FirstEdge);
    }

    #[test]
    fn test_with_speed_keeps_mode() {
        let bus = SpiRegisterBus::with_speed(RecordingSpi::new(0), 1_000_000);
        let cfg = bus.spi().config.unwrap();
        assert_eq!(cfg.speed_hz, 1_000_000);
        assert_eq!(cfg.bit_order, BitOrder::MsbFirst);
    }

    #[test]
    fn test_read_framing() {
        let mut bus = SpiRegisterBus::new(RecordingSpi::new(0xe0));
        assert_eq!(bus.read(1, 0x53), Ok(0xe0));
        assert_eq!(
            bus.spi().ops,
            [
                Op::Cs(1, true),
                Op::Tx(std::vec![0x00, 0x53, 0x00]),
                Op::Stop,
                Op::Rx(1),
                Op::Stop,
                Op::Cs(1, false),
            ]
        );
    }

    #[test]
    fn test_write_framing() {
        let mut bus = SpiRegisterBus::new(RecordingSpi::new(0));
        bus.write(0, 0x04, 0x11).unwrap();
        assert_eq!(
            bus.spi().ops,
            [
                Op::Cs(0, true),
                Op::Tx(std::vec![0x80, 0x04, 0x00, 0x11]),
                Op::Stop,
                Op::Cs(0, false),
            ]
        );
    }

    #[test]
    fn test_failed_read_releases_chip_select() {
        let mut spi = RecordingSpi::new(0);
        spi.fail_rx = true;
        let mut bus = SpiRegisterBus::new(spi);

        assert_eq!(bus.read(0, 0x10), Err(PmicError::Bus(SpiError::Timeout)));
        assert_eq!(bus.spi().ops.last(), Some(&Op::Cs(0, false)));
        assert_eq!(bus.spi().ops[bus.spi().ops.len() - 2], Op::Stop);
    }
}
