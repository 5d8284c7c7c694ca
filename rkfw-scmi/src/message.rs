//! SCMI voltage domain wire format
//!
//! All fields are little-endian. Requests (`*A2p`, agent to platform) are
//! decoded with an exact size check; responses (`*P2a`) are written whole.

use zerocopy::byteorder::little_endian::{I32, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Protocol version reported by VERSION (v1.0)
pub const PROTOCOL_VERSION: u32 = 0x1_0000;

/// Largest request or response payload the transport carries
pub const PAYLOAD_MAX: usize = 92;

/// Domain name field width, NUL included
pub const DOMAIN_NAME_LEN: usize = 16;

/// Message identifiers
pub mod id {
    pub const PROTOCOL_VERSION: u32 = 0x0;
    pub const PROTOCOL_ATTRIBUTES: u32 = 0x1;
    pub const PROTOCOL_MESSAGE_ATTRIBUTES: u32 = 0x2;
    pub const DOMAIN_ATTRIBUTES: u32 = 0x3;
    pub const DESCRIBE_LEVELS: u32 = 0x4;
    pub const CONFIG_SET: u32 = 0x5;
    pub const CONFIG_GET: u32 = 0x6;
    pub const LEVEL_SET: u32 = 0x7;
    pub const LEVEL_GET: u32 = 0x8;
}

/// CONFIG_SET/CONFIG_GET mode encoding
pub mod config {
    /// Mode id in bits 0-2
    pub const MODE_ID_MASK: u32 = 0x7;
    /// Set: mode id is implementation defined
    pub const MODE_TYPE_IMPL: u32 = 1 << 3;
    pub const MODE_ID_ON: u32 = 0x7;
    pub const MODE_ID_OFF: u32 = 0x0;
}

/// Level list format in DESCRIBE_LEVELS flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelFormat {
    List = 0,
    Range = 1,
}

const LEVELS_COUNT_MASK: u32 = 0xfff;
const LEVELS_FORMAT_SHIFT: u32 = 12;
const LEVELS_REMAINING_SHIFT: u32 = 16;

/// Pack DESCRIBE_LEVELS flags: count in 0-11, format in 12, remaining in 16-31.
pub const fn levels_flags(count: u32, format: LevelFormat, remaining: u32) -> u32 {
    (count & LEVELS_COUNT_MASK)
        | ((format as u32) << LEVELS_FORMAT_SHIFT)
        | (remaining << LEVELS_REMAINING_SHIFT)
}

// -- Requests

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct MessageAttributesA2p {
    pub message_id: U32,
}

/// Request carrying only a domain id (DOMAIN_ATTRIBUTES, CONFIG_GET, LEVEL_GET)
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DomainA2p {
    pub domain_id: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DescribeLevelsA2p {
    pub domain_id: U32,
    pub level_index: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ConfigSetA2p {
    pub domain_id: U32,
    pub config: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct LevelSetA2p {
    pub domain_id: U32,
    /// Bit 0 requests asynchronous completion
    pub flags: U32,
    pub voltage_level: I32,
}

// -- Responses

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct StatusP2a {
    pub status: I32,
}

/// VERSION response
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct VersionP2a {
    pub status: I32,
    pub version: U32,
}

/// PROTOCOL_ATTRIBUTES and PROTOCOL_MESSAGE_ATTRIBUTES response
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct AttributesP2a {
    pub status: I32,
    pub attributes: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DomainAttributesP2a {
    pub status: I32,
    pub attributes: U32,
    pub name: [u8; DOMAIN_NAME_LEN],
}

/// DESCRIBE_LEVELS response header; followed by `count` little-endian `i32`
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct DescribeLevelsP2a {
    pub status: I32,
    pub flags: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ConfigGetP2a {
    pub status: I32,
    pub config: U32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct LevelGetP2a {
    pub status: I32,
    pub voltage_level: I32,
}

/// Levels that fit in one DESCRIBE_LEVELS response
pub const LEVELS_PER_RESPONSE: usize =
    (PAYLOAD_MAX - core::mem::size_of::<DescribeLevelsP2a>()) / core::mem::size_of::<i32>();

/// Copy `name` into a NUL-terminated name field, truncating to fit.
pub fn encode_name(name: &str) -> [u8; DOMAIN_NAME_LEN] {
    let mut out = [0u8; DOMAIN_NAME_LEN];
    let len = name.len().min(DOMAIN_NAME_LEN - 1);
    out[..len].copy_from_slice(&name.as_bytes()[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_window() {
        assert_eq!(LEVELS_PER_RESPONSE, 21);
    }

    #[test]
    fn test_levels_flags_layout() {
        assert_eq!(levels_flags(3, LevelFormat::Range, 0), 0x0000_1003);
        assert_eq!(levels_flags(21, LevelFormat::List, 79), (79 << 16) | 21);
        // Count is limited to 12 bits
        assert_eq!(levels_flags(0x1001, LevelFormat::List, 0), 1);
    }

    #[test]
    fn test_encode_name_truncates_and_terminates() {
        let name = encode_name("scmi_vccio_sd_s0");
        assert_eq!(&name[..15], b"scmi_vccio_sd_s");
        assert_eq!(name[15], 0);

        let short = encode_name("vdd");
        assert_eq!(&short[..4], b"vdd\0");
    }

    #[test]
    fn test_request_sizes_are_exact() {
        assert!(LevelSetA2p::read_from_bytes(&[0u8; 12]).is_ok());
        assert!(LevelSetA2p::read_from_bytes(&[0u8; 11]).is_err());
        assert!(LevelSetA2p::read_from_bytes(&[0u8; 13]).is_err());
        assert!(DomainA2p::read_from_bytes(&[]).is_err());
    }
}
