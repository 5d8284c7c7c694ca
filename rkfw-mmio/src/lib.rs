//! MMIO Abstraction Layer for Rockchip Firmware Drivers
//!
//! This crate provides the register-access building blocks shared by the
//! SPI, PMIC and console drivers.
//!
//! # Modules
//!
//! - [`region`]: Offset-based volatile access to a mapped register block, and
//!   the [`RegisterIo`] seam drivers are generic over
//! - [`barrier`]: Memory and speculation barriers for device memory ordering
//!
//! # Example
//!
//! ```ignore
//! use rkfw_mmio::{MmioRegion, RegisterIo};
//!
//! // SPI2 controller on RK3588
//! let spi = unsafe { MmioRegion::new(0xFEB2_0000, 0x1000) };
//!
//! let status = spi.read32(0x24);
//! spi.write32(0x08, 1);
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod barrier;
pub mod region;

pub use barrier::{dsb, speculation_barrier, write_barrier};
pub use region::{MmioRegion, RegisterIo};
