//! Rockchip RK806 PMIC Driver
//!
//! Regulator voltage and enable control for the RK806 over SPI. The RK3588
//! reference design uses one or two RK806s sharing a bus, distinguished by
//! chip select.
//!
//! # Modules
//!
//! - [`id`]: Validated regulator identifiers (family, index, chip)
//! - [`regs`]: Register addresses and SPI command bytes
//! - [`ranges`]: Voltage selector tables and enable-bit layout
//! - [`bus`]: [`RegisterBus`] and its SPI implementation
//! - [`driver`]: [`Rk806`], the regulator operations
//!
//! # Example
//!
//! ```ignore
//! let bus = SpiRegisterBus::new(spi);
//! let mut pmic = Rk806::new(bus);
//! pmic.set_voltage(RegulatorId::MASTER_PLDO5, 3_300_000)?;
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod driver;
pub mod error;
pub mod id;
pub mod ranges;
pub mod regs;

pub use bus::{RegisterBus, SpiRegisterBus};
pub use driver::Rk806;
pub use error::{PmicError, PmicResult};
pub use id::{Chip, Family, RegulatorId};
