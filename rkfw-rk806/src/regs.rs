//! RK806 register map and SPI command bytes

// -- SPI framing

/// Command byte for a single-register read
pub const CMD_READ: u8 = 0x00;
/// Command byte for a single-register write
pub const CMD_WRITE: u8 = 0x80;
/// High address byte; all regulator registers live in page 0
pub const REG_H: u8 = 0x00;

// -- Enable registers
//
// Each enable register packs four regulators: bits 0-3 hold the on/off
// state, bits 4-7 are per-regulator write-enable strobes that must be set
// for the corresponding state bit to take effect. Strobes read back as 0.

/// Buck enable register `n` (bucks 4n+1..4n+4)
pub const fn power_en(n: u8) -> u8 {
    n
}

/// NLDO enable register `n`
pub const fn nldo_en(n: u8) -> u8 {
    0x03 + n
}

/// PLDO enable register `n`
pub const fn pldo_en(n: u8) -> u8 {
    0x04 + n
}

// -- Voltage select registers (1-based regulator numbers)

pub const fn buck_config(n: u8) -> u8 {
    0x10 + n - 1
}

pub const fn buck_on_vsel(n: u8) -> u8 {
    0x1A + n - 1
}

pub const fn buck_slp_vsel(n: u8) -> u8 {
    0x24 + n - 1
}

pub const fn nldo_on_vsel(n: u8) -> u8 {
    0x43 + n - 1
}

pub const fn nldo_slp_vsel(n: u8) -> u8 {
    0x48 + n - 1
}

pub const fn pldo_on_vsel(n: u8) -> u8 {
    0x4E + n - 1
}

pub const fn pldo_slp_vsel(n: u8) -> u8 {
    0x54 + n - 1
}

pub const BUCK_VSEL_MASK: u8 = 0xFF;
pub const NLDO_VSEL_MASK: u8 = 0xFF;
pub const PLDO_VSEL_MASK: u8 = 0xFF;
