//! Rockchip SPI Controller Driver
//!
//! Synchronous, polling-mode master driver for the SPI block found on
//! RK35xx SoCs. Used by the firmware to reach the RK806 PMIC.
//!
//! # Modules
//!
//! - [`regs`]: Register offsets and CTRLR0/SR bitfields
//! - [`config`]: Frame format, clock mode and speed selection
//! - [`controller`]: The transfer engine and the [`SpiBus`] trait
//! - [`error`]: [`SpiError`]

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod controller;
pub mod error;
pub mod regs;

pub use config::{
    ApbTransform, BitOrder, ClockPhase, ClockPolarity, Endian, FrameSize, SpiConfig, SsDelay,
    TransferMode,
};
pub use controller::{RkSpi, SpiBus, Transfer, clock_divider, transfer_timeout_us};
pub use error::{SpiError, SpiResult};
