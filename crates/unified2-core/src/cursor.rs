//! Bounds-checked field reader over a framed record body

use crate::error::{Unified2Error, Unified2Result};
use crate::wire::RecordType;
use bytes::{Buf, Bytes};

/// Reads big-endian fields off the front of a record body
///
/// Every read checks the remaining length first, so a short body turns into
/// a [`Unified2Error::Decode`] naming the field instead of a panic.
pub(crate) struct FieldCursor {
    record_type: RecordType,
    buf: Bytes,
}

impl FieldCursor {
    pub(crate) fn new(record_type: RecordType, body: Bytes) -> Self {
        Self {
            record_type,
            buf: body,
        }
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Unified2Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(Unified2Error::Decode {
                record_type: self.record_type,
                field,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Unified2Result<u8> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn u16(&mut self, field: &'static str) -> Unified2Result<u16> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_u16())
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> Unified2Result<u32> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_u32())
    }

    pub(crate) fn array<const N: usize>(&mut self, field: &'static str) -> Unified2Result<[u8; N]> {
        self.ensure(field, N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Everything not consumed yet, shared with the original body
    pub(crate) fn into_rest(self) -> Bytes {
        self.buf
    }
}
