//! SCMI status codes
//!
//! Every response starts with one of these as a little-endian `i32`.

/// SCMI status.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScmiStatus {
    Success = 0,
    NotSupported = -1,
    InvalidParameters = -2,
    Denied = -3,
    NotFound = -4,
    OutOfRange = -5,
    Busy = -6,
    CommsError = -7,
    GenericError = -8,
    HardwareError = -9,
    ProtocolError = -10,
}

impl ScmiStatus {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            -1 => Some(Self::NotSupported),
            -2 => Some(Self::InvalidParameters),
            -3 => Some(Self::Denied),
            -4 => Some(Self::NotFound),
            -5 => Some(Self::OutOfRange),
            -6 => Some(Self::Busy),
            -7 => Some(Self::CommsError),
            -8 => Some(Self::GenericError),
            -9 => Some(Self::HardwareError),
            -10 => Some(Self::ProtocolError),
            _ => None,
        }
    }

    /// Get the status name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::Denied => "DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Busy => "BUSY",
            Self::CommsError => "COMMS_ERROR",
            Self::GenericError => "GENERIC_ERROR",
            Self::HardwareError => "HARDWARE_ERROR",
            Self::ProtocolError => "PROTOCOL_ERROR",
        }
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl core::fmt::Display for ScmiStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a platform operation; the error is never `Success`.
pub type ScmiResult<T = ()> = Result<T, ScmiStatus>;
