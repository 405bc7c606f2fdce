//! Error types for unified2-core

use crate::wire::RecordType;
use thiserror::Error;

/// Errors that can occur while reading or decoding unified2 records
///
/// Running out of input is not an error: end of stream and partially written
/// records are reported through [`crate::ReadOutcome`].
#[derive(Debug, Error)]
pub enum Unified2Error {
    /// The underlying stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed-size field ran past the end of an already framed body
    #[error(
        "Decoding error: {record_type} record truncated at {field} (needed {needed} bytes, {remaining} remaining)"
    )]
    Decode {
        record_type: RecordType,
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// An event decode was requested for a non-event record type
    #[error("Not an event record type: {0}")]
    NotAnEvent(RecordType),
}

impl Unified2Error {
    /// Check if this error means the record payload is malformed
    ///
    /// The stream is already positioned after the bad record, so callers
    /// may skip it and keep reading.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Unified2Error::Decode { .. })
    }
}

/// Result type for unified2 operations
pub type Unified2Result<T> = Result<T, Unified2Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decode_error() {
        let err = Unified2Error::Decode {
            record_type: RecordType::Packet,
            field: "link_type",
            needed: 4,
            remaining: 2,
        };
        assert!(err.is_decode_error());

        let io = Unified2Error::Io(std::io::Error::other("disk gone"));
        assert!(!io.is_decode_error());
        assert!(!Unified2Error::NotAnEvent(RecordType::ExtraData).is_decode_error());
    }

    #[test]
    fn test_decode_error_message() {
        let err = Unified2Error::Decode {
            record_type: RecordType::EventIpv6,
            field: "ip_destination",
            needed: 16,
            remaining: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("event_ipv6 (72)"));
        assert!(msg.contains("ip_destination"));
        assert!(msg.contains("needed 16 bytes, 3 remaining"));
    }
}
