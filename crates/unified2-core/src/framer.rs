//! Record framing
//!
//! Reads one length-prefixed record from a seekable stream. A spool file is
//! usually still being written while we read it, so a header or body that is
//! cut short is reported as [`ReadOutcome::Incomplete`] and the stream is
//! rewound to where the call started. Nothing is consumed until a whole
//! record is available.

use crate::error::Unified2Result;
use crate::records::{RawHeader, RawRecord, ReadOutcome};
use crate::wire::RECORD_HEADER_LEN;
use bytes::Bytes;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{trace, warn};

/// Read a raw record from the stream
///
/// Returns [`ReadOutcome::EndOfStream`] when no bytes at all are available at
/// the current offset and [`ReadOutcome::Incomplete`] when only part of a
/// record has been written. In both cases the stream position is the same as
/// on entry. On success the stream is left at the next record boundary.
pub fn read_raw_record<R: Read + Seek>(stream: &mut R) -> Unified2Result<ReadOutcome<RawRecord>> {
    let offset = stream.stream_position()?;

    match frame(stream, offset) {
        Ok(ReadOutcome::Record(record)) => Ok(ReadOutcome::Record(record)),
        Ok(outcome) => {
            stream.seek(SeekFrom::Start(offset))?;
            Ok(outcome)
        }
        Err(err) => {
            if let Err(seek_err) = stream.seek(SeekFrom::Start(offset)) {
                warn!("Failed to rewind to offset {}: {}", offset, seek_err);
            }
            Err(err.into())
        }
    }
}

fn frame<R: Read>(stream: &mut R, offset: u64) -> io::Result<ReadOutcome<RawRecord>> {
    let mut header_buf = Vec::with_capacity(RECORD_HEADER_LEN);
    let got = read_up_to(stream, RECORD_HEADER_LEN as u64, &mut header_buf)?;

    if got == 0 {
        return Ok(ReadOutcome::EndOfStream);
    }

    let header_bytes: [u8; RECORD_HEADER_LEN] = match header_buf.try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            trace!(
                "Incomplete header at offset {}: {} of {} bytes",
                offset,
                got,
                RECORD_HEADER_LEN
            );
            return Ok(ReadOutcome::Incomplete);
        }
    };
    let header = RawHeader::from_bytes(header_bytes);

    // Grows as bytes arrive rather than trusting the length up front
    let mut data = Vec::new();
    let got = read_up_to(stream, u64::from(header.length), &mut data)?;
    if got < header.length as usize {
        trace!(
            "Incomplete body at offset {}: type {}, {} of {} bytes",
            offset,
            header.record_type,
            got,
            header.length
        );
        return Ok(ReadOutcome::Incomplete);
    }

    Ok(ReadOutcome::Record(RawRecord {
        record_type: header.record_type,
        data: Bytes::from(data),
    }))
}

/// Read until `limit` bytes or end of input, retrying short reads
fn read_up_to<R: Read>(stream: &mut R, limit: u64, buf: &mut Vec<u8>) -> io::Result<usize> {
    stream.by_ref().take(limit).read_to_end(buf)
}
