//! RK3588 Reference Board
//!
//! Wires the SCMI voltage domain responder to the RK806 PMIC on the
//! RK3588 reference design and exposes the entry points the runtime and
//! the SCMI transport call into.
//!
//! # Modules
//!
//! - [`config`]: Board addresses and clocks
//! - [`board`]: Domain table, bring-up and call triggers

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod config;

pub use board::{early_init, init, scmi_voltd_dispatch, sdmmc_set_signal_voltage};
pub use config::BoardConfig;
