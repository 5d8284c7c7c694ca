//! Response buffer
//!
//! A response is built in one step from a complete `*P2a` value (or a
//! status alone) and handed to the transport as a byte slice. The request
//! buffer is never written.

use zerocopy::{Immutable, IntoBytes};
use zerocopy::byteorder::little_endian::I32;

use crate::message::{PAYLOAD_MAX, StatusP2a};
use crate::status::ScmiStatus;

/// An encoded response: status first, then any payload.
#[derive(Clone)]
pub struct Response {
    buf: [u8; PAYLOAD_MAX],
    len: usize,
}

impl Response {
    /// Status-only response.
    pub fn status(status: ScmiStatus) -> Self {
        Self::from_message(&StatusP2a { status: I32::new(status.as_i32()) })
    }

    /// Response holding the bytes of `message`.
    pub fn from_message<T: IntoBytes + Immutable>(message: &T) -> Self {
        Self::with_tail(message, &[])
    }

    /// Response holding `header` followed by `values`, truncated to the
    /// payload budget.
    pub fn with_tail<T: IntoBytes + Immutable>(header: &T, values: &[i32]) -> Self {
        let mut buf = [0u8; PAYLOAD_MAX];
        let head = header.as_bytes();
        let mut len = head.len().min(PAYLOAD_MAX);
        buf[..len].copy_from_slice(&head[..len]);

        for value in values {
            let Some(slot) = buf.get_mut(len..len + 4) else {
                break;
            };
            slot.copy_from_slice(&value.to_le_bytes());
            len += 4;
        }

        Self { buf, len }
    }

    /// Bytes the transport must relay.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Status field of this response.
    pub fn status_code(&self) -> i32 {
        self.word(0).unwrap_or(ScmiStatus::GenericError.as_i32())
    }

    /// Little-endian 32-bit word `index` of the response, if present.
    pub fn word(&self, index: usize) -> Option<i32> {
        let start = index * 4;
        let bytes = self.as_bytes().get(start..start + 4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Some(i32::from_le_bytes(raw))
    }
}

impl core::fmt::Debug for Response {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status_code())
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DescribeLevelsP2a;
    use zerocopy::byteorder::little_endian::U32;

    #[test]
    fn test_status_only() {
        let rsp = Response::status(ScmiStatus::ProtocolError);
        assert_eq!(rsp.as_bytes(), (-10i32).to_le_bytes());
        assert_eq!(rsp.status_code(), -10);
        assert_eq!(rsp.word(1), None);
    }

    #[test]
    fn test_values_follow_header() {
        let header = DescribeLevelsP2a { status: I32::new(0), flags: U32::new(0x1003) };
        let rsp = Response::with_tail(&header, &[1_800_000, 3_300_000, 12_500]);
        assert_eq!(rsp.len(), 20);
        assert_eq!(rsp.word(1), Some(0x1003));
        assert_eq!(rsp.word(4), Some(12_500));
    }

    #[test]
    fn test_values_truncated_at_budget() {
        let header = DescribeLevelsP2a { status: I32::new(0), flags: U32::new(0) };
        let rsp = Response::with_tail(&header, &[7; 40]);
        assert_eq!(rsp.len(), PAYLOAD_MAX);
    }
}
