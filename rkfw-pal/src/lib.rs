//! Platform Abstraction Layer
//!
//! Provides the ambient services the firmware drivers lean on:
//! - Architectural timer access and timeout deadlines
//! - A polled DW8250 UART console
//! - A `log` backend that timestamps records onto the console

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod console;
pub mod logger;
pub mod timer;

pub use timer::{Deadline, GenericTimer, TimeSource};
