//! SPI error codes

/// Failure of a bus transaction or controller operation.
///
/// Discriminants mirror the errno values firmware callers conventionally
/// report for these conditions.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpiError {
    /// Transfer or idle wait exceeded its deadline.
    Timeout = -110,
    /// Controller still shifting data.
    Busy = -16,
    /// Request cannot be expressed on this controller.
    InvalidConfig = -22,
}

impl SpiError {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            -110 => Some(Self::Timeout),
            -16 => Some(Self::Busy),
            -22 => Some(Self::InvalidConfig),
            _ => None,
        }
    }

    /// Get the error name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::Busy => "Busy",
            Self::InvalidConfig => "InvalidConfig",
        }
    }
}

impl core::fmt::Display for SpiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

pub type SpiResult<T = ()> = Result<T, SpiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for err in [SpiError::Timeout, SpiError::Busy, SpiError::InvalidConfig] {
            assert_eq!(SpiError::from_i32(err.as_i32()), Some(err));
        }
        assert_eq!(SpiError::from_i32(0), None);
    }
}
