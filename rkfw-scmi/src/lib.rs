//! SCMI Voltage Domain Protocol
//!
//! Responder for the SCMI voltage domain protocol (0x17): request
//! decoding, validation and response encoding, plus a static registry of
//! regulator-backed domains.
//!
//! # Modules
//!
//! - [`status`]: SCMI status codes
//! - [`index`]: Speculation-safe index clamping for untrusted ids
//! - [`message`]: Wire structures and protocol constants
//! - [`response`]: Owned response buffer
//! - [`voltd`]: [`VoltdResponder`], [`VoltdPlatform`] and [`DomainRegistry`]
//!
//! The transport hands [`VoltdResponder::dispatch`] an agent id, a message
//! id and the request payload, and relays the bytes of the returned
//! [`Response`].

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod index;
pub mod message;
pub mod response;
pub mod status;
pub mod voltd;

pub use index::{DomainIndex, bounded};
pub use response::Response;
pub use status::{ScmiResult, ScmiStatus};
pub use voltd::{
    DomainOps, DomainRegistry, LevelRange, VoltageDomain, VoltdPlatform, VoltdResponder,
};
