//! PMIC error type

use rkfw_spi::SpiError;

/// Failure of a regulator operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PmicError {
    /// No register mapping for the regulator, or voltage out of range.
    InvalidArgument,
    /// The SPI transaction failed.
    Bus(SpiError),
    /// Register read back differs from the value written.
    VerifyFailed,
}

impl PmicError {
    /// Errno-style code for logging and foreign callers.
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::InvalidArgument => -22,
            Self::Bus(err) => err.as_i32(),
            Self::VerifyFailed => -5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::Bus(err) => err.name(),
            Self::VerifyFailed => "VerifyFailed",
        }
    }
}

impl From<SpiError> for PmicError {
    fn from(err: SpiError) -> Self {
        Self::Bus(err)
    }
}

impl core::fmt::Display for PmicError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "bus error: {}", err),
            other => f.write_str(other.name()),
        }
    }
}

pub type PmicResult<T = ()> = Result<T, PmicError>;
