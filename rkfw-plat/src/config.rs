//! Board configuration
//!
//! Fixed at build time: one `const` instance per supported board.

use log::LevelFilter;

/// Addresses and clocks the voltage domain service depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// SPI controller the PMIC hangs off
    pub spi_base: usize,
    /// SPI source clock (Hz)
    pub spi_clock_hz: u32,
    /// PMIC SCLK (Hz)
    pub pmic_speed_hz: u32,
    /// Debug UART
    pub console_base: usize,
    pub log_level: LevelFilter,
}

impl BoardConfig {
    /// RK3588 reference design: RK806 on SPI2, debug console on UART2.
    pub const RK3588_REFERENCE: Self = Self {
        spi_base: 0xFEB2_0000,
        spi_clock_hz: 24_000_000,
        pmic_speed_hz: 2_000_000,
        console_base: 0xFEB5_0000,
        log_level: LevelFilter::Info,
    };
}

/// Size of the SPI controller register block
pub const SPI_REGION_SIZE: usize = 0x1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pmic_clock_reachable() {
        let cfg = BoardConfig::RK3588_REFERENCE;
        let div = rkfw_spi::clock_divider(cfg.spi_clock_hz, cfg.pmic_speed_hz);
        assert_eq!(div, 12);
        assert_eq!(cfg.spi_clock_hz / div, cfg.pmic_speed_hz);
    }
}
