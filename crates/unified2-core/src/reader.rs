//! Stateful record reader
//!
//! Wraps a single stream and keeps track of where the next record starts and
//! what has been read so far. Useful for hosts that tail a spool file and
//! want to report progress.

use crate::dispatch::read_record;
use crate::error::Unified2Result;
use crate::records::{DecodedRecord, ReadOutcome};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

/// Counters for one reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    pub events: u64,
    pub packets: u64,
    pub extra_data: u64,
    pub unknown: u64,
    pub decode_errors: u64,
    /// Calls that found a partially written record
    pub incomplete_reads: u64,
    /// Bytes of framed records consumed, including corrupt ones
    pub bytes_consumed: u64,
}

impl ReaderStats {
    /// Records successfully framed, whatever their type
    pub fn records(&self) -> u64 {
        self.events + self.packets + self.extra_data + self.unknown + self.decode_errors
    }
}

/// Reads decoded records from one seekable stream
pub struct RecordReader<R> {
    stream: R,
    offset: u64,
    stats: ReaderStats,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Create a reader starting at the stream's current position
    pub fn new(mut stream: R) -> Unified2Result<Self> {
        let offset = stream.stream_position()?;
        Ok(Self {
            stream,
            offset,
            stats: ReaderStats::default(),
        })
    }

    /// Create a reader starting at `offset`, which must be a record boundary
    pub fn with_offset(mut stream: R, offset: u64) -> Unified2Result<Self> {
        stream.seek(SeekFrom::Start(offset))?;
        Ok(Self {
            stream,
            offset,
            stats: ReaderStats::default(),
        })
    }

    /// Read the next record
    ///
    /// Same outcomes as [`read_record`]. After a decoding error the reader is
    /// already past the bad record, so calling again continues with the next.
    pub fn next_record(&mut self) -> Unified2Result<ReadOutcome<DecodedRecord>> {
        let result = read_record(&mut self.stream);

        let position = self.stream.stream_position()?;
        self.stats.bytes_consumed += position.saturating_sub(self.offset);
        self.offset = position;

        match &result {
            Ok(ReadOutcome::Record(record)) => match record {
                DecodedRecord::Event(_) => self.stats.events += 1,
                DecodedRecord::Packet(_) => self.stats.packets += 1,
                DecodedRecord::ExtraData(_) => self.stats.extra_data += 1,
                DecodedRecord::Unknown => self.stats.unknown += 1,
            },
            Ok(ReadOutcome::Incomplete) => {
                trace!("Record at offset {} not fully written yet", self.offset);
                self.stats.incomplete_reads += 1;
            }
            Ok(ReadOutcome::EndOfStream) => {}
            Err(err) if err.is_decode_error() => self.stats.decode_errors += 1,
            Err(_) => {}
        }

        result
    }

    /// Offset of the next record boundary
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn stats(&self) -> &ReaderStats {
        &self.stats
    }

    pub fn get_ref(&self) -> &R {
        &self.stream
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}
