//! Polled DW8250 console
//!
//! The firmware console on RK3588 is a Synopsys DesignWare 8250 UART left
//! configured by the boot ROM/loader. Only transmit is needed: wait for the
//! holding register to drain, write the byte.

use core::fmt::{self, Write};

use rkfw_mmio::{MmioRegion, RegisterIo};
use spin::mutex::SpinMutex;

/// DesignWare 8250 register offsets and flags (4-byte stride)
pub mod regs {
    /// Transmit Holding Register
    pub const THR: usize = 0x00;
    /// Line Status Register
    pub const LSR: usize = 0x14;
    /// Transmit Holding Register Empty
    pub const LSR_THRE: u32 = 1 << 5;
    /// Transmitter Empty
    pub const LSR_TEMT: u32 = 1 << 6;
}

/// Spin budget while waiting for THRE before dropping a byte
const TX_SPIN_LIMIT: u32 = 100_000;

/// Transmit side of a DW8250 UART.
pub struct Dw8250<R> {
    regs: R,
}

impl<R: RegisterIo> Dw8250<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Write one byte, dropping it if the transmitter never drains.
    pub fn putc(&self, c: u8) {
        let mut spins = 0;
        while self.regs.read32(regs::LSR) & regs::LSR_THRE == 0 {
            spins += 1;
            if spins >= TX_SPIN_LIMIT {
                return;
            }
            core::hint::spin_loop();
        }
        self.regs.write32(regs::THR, u32::from(c));
    }

    /// Write a string, expanding `\n` to CRLF.
    pub fn puts(&self, s: &str) {
        for c in s.bytes() {
            if c == b'\n' {
                self.putc(b'\r');
            }
            self.putc(c);
        }
    }

    /// Spin until the shift register is empty.
    pub fn flush(&self) {
        let mut spins = 0;
        while self.regs.read32(regs::LSR) & regs::LSR_TEMT == 0 && spins < TX_SPIN_LIMIT {
            spins += 1;
            core::hint::spin_loop();
        }
    }
}

impl<R: RegisterIo> Write for Dw8250<R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.puts(s);
        Ok(())
    }
}

/// Global console instance
static CONSOLE: SpinMutex<Option<Dw8250<MmioRegion>>> = SpinMutex::new(None);

/// Attach the console to the UART at `base`.
///
/// # Safety
///
/// `base` must be the mapped register block of an initialised DW8250 UART.
pub unsafe fn init(base: usize) {
    // SAFETY: Caller guarantees base is a live UART register block
    let regs = unsafe { MmioRegion::new(base, 0x100) };
    *CONSOLE.lock() = Some(Dw8250::new(regs));
}

/// Print a string to the console; a no-op before [`init`]
pub fn puts(s: &str) {
    if let Some(uart) = CONSOLE.lock().as_ref() {
        uart.puts(s);
    }
}

/// Console writer for fmt::Write
pub struct ConsoleWriter;

impl Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts(s);
        Ok(())
    }
}

/// Print formatted output to the console
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = write!($crate::console::ConsoleWriter, $($arg)*);
    }};
}

/// Print formatted output with newline to the console
#[macro_export]
macro_rules! println {
    () => {
        $crate::console::puts("\n")
    };
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = write!($crate::console::ConsoleWriter, $($arg)*);
        $crate::console::puts("\n");
    }};
}
