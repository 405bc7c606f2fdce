//! Record dispatch
//!
//! Frames the next record and routes it to the decoder for its type tag.

use crate::error::Unified2Result;
use crate::event::decode_event;
use crate::extra_data::decode_extra_data;
use crate::framer::read_raw_record;
use crate::packet::decode_packet;
use crate::records::{DecodedRecord, RawRecord, ReadOutcome};
use crate::wire::RecordType;
use std::io::{Read, Seek};
use tracing::debug;

/// Read and decode the next record from the stream
///
/// End of stream and incomplete records are passed through from the framer
/// untouched. A record with an unrecognised tag comes back as
/// [`DecodedRecord::Unknown`]. A decoding error is returned as `Err` with the
/// stream already positioned at the following record.
pub fn read_record<R: Read + Seek>(stream: &mut R) -> Unified2Result<ReadOutcome<DecodedRecord>> {
    match read_raw_record(stream)? {
        ReadOutcome::Record(raw) => decode_raw_record(&raw).map(ReadOutcome::Record),
        ReadOutcome::EndOfStream => Ok(ReadOutcome::EndOfStream),
        ReadOutcome::Incomplete => Ok(ReadOutcome::Incomplete),
    }
}

/// Decode a record that has already been framed
pub fn decode_raw_record(raw: &RawRecord) -> Unified2Result<DecodedRecord> {
    let Some(record_type) = RecordType::from_tag(raw.record_type) else {
        debug!(
            "Skipping unknown record type {} ({} bytes)",
            raw.record_type,
            raw.data.len()
        );
        return Ok(DecodedRecord::Unknown);
    };

    let body = raw.data.clone();
    let decoded = match record_type {
        RecordType::Event
        | RecordType::EventIpv6
        | RecordType::EventV2
        | RecordType::EventIpv6V2 => DecodedRecord::Event(decode_event(record_type, body)?),
        RecordType::Packet => DecodedRecord::Packet(decode_packet(body)?),
        RecordType::ExtraData => DecodedRecord::ExtraData(decode_extra_data(body)?),
    };

    Ok(decoded)
}
