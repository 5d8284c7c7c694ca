//! Rockchip SPI controller, polling mode
//!
//! A transaction is configure-then-transfer: CTRLR0, FIFO thresholds and the
//! clock divider are programmed for every transfer, the engine is enabled,
//! and the FIFOs are serviced by PIO until all expected frames have moved or
//! the length-derived deadline passes. Chip select and engine shutdown are
//! left to the caller ([`RkSpi::set_cs`], [`RkSpi::stop`]) so several phases
//! can share one CS assertion.

use rkfw_mmio::{RegisterIo, dsb, write_barrier};
use rkfw_pal::timer::{Deadline, TimeSource, poll_until};
use tock_registers::{interfaces::Readable, registers::InMemoryRegister};

use crate::config::{SpiConfig, TransferMode};
use crate::error::{SpiError, SpiResult};
use crate::regs::{self, SR};

/// Fixed slack added to every transfer timeout (µs)
const TIMEOUT_TOLERANCE_US: u64 = 100_000;

/// Bound on the idle wait in [`RkSpi::stop`] (µs)
const STOP_TIMEOUT_US: u64 = 5_000;

/// Buffers for one transaction.
pub enum Transfer<'a> {
    /// Transmit only; received data is discarded by the controller.
    Write(&'a [u8]),
    /// Receive only; the controller clocks out `buf.len()` bytes of frames.
    Read(&'a mut [u8]),
    /// Full duplex; `tx` and `rx` must be the same length.
    Duplex { tx: &'a [u8], rx: &'a mut [u8] },
}

impl Transfer<'_> {
    fn mode(&self) -> TransferMode {
        match self {
            Self::Write(_) => TransferMode::TransmitOnly,
            Self::Read(_) => TransferMode::ReceiveOnly,
            Self::Duplex { .. } => TransferMode::TransmitReceive,
        }
    }

    /// Transfer length in bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Write(tx) => tx.len(),
            Self::Read(rx) => rx.len(),
            Self::Duplex { tx, .. } => tx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Blocking SPI transaction interface consumed by device drivers.
pub trait SpiBus {
    /// Replace the configuration used by subsequent transfers.
    fn configure(&mut self, config: SpiConfig);

    /// Assert or release chip select `cs`.
    fn set_cs(&mut self, cs: u8, active: bool) -> SpiResult;

    /// Run one transaction to completion.
    fn transfer(&mut self, xfer: Transfer<'_>) -> SpiResult;

    /// Wait for the engine to go idle and disable it.
    fn stop(&mut self) -> SpiResult;
}

/// Even clock divider for `speed` from `max_freq`, rounded up.
///
/// BAUDR does not support odd values; the result may exceed
/// [`regs::BAUDR_MAX`] and must be range checked before use.
pub const fn clock_divider(max_freq: u32, speed: u32) -> u32 {
    let div = max_freq.div_ceil(speed);
    div.saturating_add(1) & !1
}

/// Transfer timeout in µs: twice the wire time of `len` bytes plus slack.
pub const fn transfer_timeout_us(len: usize, actual_speed: u32) -> u64 {
    let mut timeout = 0;
    if actual_speed != 0 {
        timeout = len as u64 * 8 * 1_000_000 / actual_speed as u64;
    }
    timeout + timeout + TIMEOUT_TOLERANCE_US
}

/// A Rockchip SPI controller instance.
pub struct RkSpi<R, T> {
    regs: R,
    timer: T,
    /// Controller input clock (Hz)
    max_freq: u32,
    config: SpiConfig,
    actual_speed: u32,
}

impl<R: RegisterIo, T: TimeSource> RkSpi<R, T> {
    /// Bind a controller with the default master configuration.
    ///
    /// Nothing is written to the hardware until the first transfer.
    pub fn new(regs: R, timer: T, max_freq: u32) -> Self {
        Self {
            regs,
            timer,
            max_freq,
            config: SpiConfig::default(),
            actual_speed: 0,
        }
    }

    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SpiConfig) {
        self.config = config;
    }

    /// SCLK produced by the last programmed divider (Hz)
    pub fn actual_speed(&self) -> u32 {
        self.actual_speed
    }

    pub fn is_busy(&self) -> bool {
        let sr: InMemoryRegister<u32, SR::Register> =
            InMemoryRegister::new(self.regs.read32(regs::SR));
        sr.is_set(SR::BUSY)
    }

    /// Discard everything in the receive FIFO.
    pub fn flush_fifo(&self) {
        while self.regs.read32(regs::RXFLR) != 0 {
            let _ = self.regs.read32(regs::RXDR);
        }
    }

    pub fn set_cs(&self, cs: u8, active: bool) -> SpiResult {
        let bit = 1u32.checked_shl(u32::from(cs)).unwrap_or(0);
        if bit & regs::SER_MASK == 0 {
            return Err(SpiError::InvalidConfig);
        }

        let mut ser = self.regs.read32(regs::SER) & regs::SER_MASK;
        if active {
            ser |= bit;
        } else {
            ser &= !bit;
        }
        self.regs.write32(regs::SER, ser);
        Ok(())
    }

    /// Wait up to 5 ms for the shift register to drain, then disable the
    /// engine. The engine is disabled even when the wait times out.
    pub fn stop(&self) -> SpiResult {
        let idle = poll_until(&self.timer, STOP_TIMEOUT_US, || !self.is_busy());
        self.regs.write32(regs::ENR, 0);
        // Disable must land before the caller drops chip select
        dsb();
        if idle {
            Ok(())
        } else {
            log::error!("spi: controller still busy after {}us", STOP_TIMEOUT_US);
            Err(SpiError::Timeout)
        }
    }

    /// Program the controller for a `len`-byte transfer in `mode`.
    fn program(&mut self, mode: TransferMode, len: usize) -> SpiResult<u64> {
        if !self.config.is_valid() {
            return Err(SpiError::InvalidConfig);
        }

        let frame_bytes = self.config.frame_size.bytes();
        if len == 0 || len % frame_bytes != 0 {
            return Err(SpiError::InvalidConfig);
        }

        let div = clock_divider(self.max_freq, self.config.effective_speed());
        if div == 0 || div > regs::BAUDR_MAX {
            return Err(SpiError::InvalidConfig);
        }
        self.actual_speed = self.max_freq / div;

        self.regs.write32(regs::CTRLR0, self.config.ctrlr0(mode));

        let threshold = regs::FIFO_LENGTH / 2 - 1;
        self.regs.write32(regs::TXFTLR, threshold);
        self.regs.write32(regs::RXFTLR, threshold);
        self.regs.write32(regs::DMATDLR, threshold);
        self.regs.write32(regs::DMARDLR, 0);

        self.regs.write32(regs::BAUDR, div);

        if mode == TransferMode::ReceiveOnly {
            let frames = u32::try_from(len / frame_bytes).map_err(|_| SpiError::InvalidConfig)?;
            self.regs.write32(regs::CTRLR1, frames - 1);
        }

        log::trace!(
            "spi: {:?} {} bytes, div {} ({} Hz)",
            mode,
            len,
            div,
            self.actual_speed
        );

        Ok(transfer_timeout_us(len, self.actual_speed))
    }

    /// Push as many frames from `tx` as the TX FIFO has room for.
    ///
    /// Returns the number of bytes consumed.
    fn pio_write(&self, tx: &[u8]) -> usize {
        let frame_bytes = self.config.frame_size.bytes();
        let left = tx.len() / frame_bytes;
        let room = regs::FIFO_LENGTH.saturating_sub(self.regs.read32(regs::TXFLR)) as usize;

        let mut written = 0;
        for frame in tx.chunks_exact(frame_bytes).take(left.min(room)) {
            let word = match *frame {
                [b] => u32::from(b),
                [lo, hi] => u32::from(u16::from_le_bytes([lo, hi])),
                _ => 0,
            };
            self.regs.write32(regs::TXDR, word);
            written += frame_bytes;
        }
        written
    }

    /// Drain available frames from the RX FIFO into `rx`.
    ///
    /// Returns the number of bytes filled.
    fn pio_read(&self, rx: &mut [u8]) -> usize {
        let frame_bytes = self.config.frame_size.bytes();
        let left = rx.len() / frame_bytes;
        let avail = self.regs.read32(regs::RXFLR) as usize;

        let mut read = 0;
        for frame in rx.chunks_exact_mut(frame_bytes).take(left.min(avail)) {
            let word = self.regs.read32(regs::RXDR);
            match frame {
                [b] => *b = word as u8,
                [lo, hi] => [*lo, *hi] = (word as u16).to_le_bytes(),
                _ => {}
            }
            read += frame_bytes;
        }
        read
    }

    /// Run one transaction.
    ///
    /// Returns once every expected frame has been exchanged. For
    /// [`Transfer::Write`] that means queued in the TX FIFO; call
    /// [`stop`](Self::stop) to wait for the wire to go idle. On timeout the
    /// bytes already moved are not rolled back.
    pub fn transfer(&mut self, xfer: Transfer<'_>) -> SpiResult {
        let mode = xfer.mode();
        let len = xfer.len();

        let (tx, mut rx): (Option<&[u8]>, Option<&mut [u8]>) = match xfer {
            Transfer::Write(tx) => (Some(tx), None),
            Transfer::Read(rx) => (None, Some(rx)),
            Transfer::Duplex { tx, rx } => {
                if tx.len() != rx.len() {
                    return Err(SpiError::InvalidConfig);
                }
                (Some(tx), Some(rx))
            }
        };

        // Control registers are only writable while the engine is idle
        if self.is_busy() {
            log::error!("spi: transfer requested while controller busy");
            return Err(SpiError::Busy);
        }

        let timeout_us = self.program(mode, len)?;
        let deadline = Deadline::after(&self.timer, timeout_us);

        write_barrier();
        self.regs.write32(regs::ENR, 1);

        let mut tx_pos = 0;
        let mut rx_pos = 0;
        loop {
            let mut remain = 0;

            if let Some(tx) = tx {
                tx_pos += self.pio_write(&tx[tx_pos..]);
                remain = tx.len() - tx_pos;
            }

            if let Some(rx) = rx.as_deref_mut() {
                rx_pos += self.pio_read(&mut rx[rx_pos..]);
                remain = rx.len() - rx_pos;
            }

            if remain == 0 {
                return Ok(());
            }

            if deadline.expired(&self.timer) {
                log::error!(
                    "spi: transfer timed out after {}us ({} of {} bytes left)",
                    timeout_us,
                    remain,
                    len
                );
                return Err(SpiError::Timeout);
            }

            core::hint::spin_loop();
        }
    }
}

impl<R: RegisterIo, T: TimeSource> SpiBus for RkSpi<R, T> {
    fn configure(&mut self, config: SpiConfig) {
        self.set_config(config);
    }

    fn set_cs(&mut self, cs: u8, active: bool) -> SpiResult {
        RkSpi::set_cs(self, cs, active)
    }

    fn transfer(&mut self, xfer: Transfer<'_>) -> SpiResult {
        RkSpi::transfer(self, xfer)
    }

    fn stop(&mut self) -> SpiResult {
        RkSpi::stop(self)
    }
}
