//! Unified2 spool decoder
//!
//! Reads the binary unified2 log format written by network intrusion
//! detection sensors, including files that are still being appended to:
//!
//! - **Framer**: splits the stream into length-prefixed records and detects
//!   partially written records so they can be retried later
//! - **Decoders**: turn event, packet and extra data bodies into typed records
//! - **Dispatcher**: frames and decodes in one call, routing by type tag
//! - **RecordReader**: tracks offset and counters for a tailing host
//!
//! ```no_run
//! use unified2_core::{DecodedRecord, ReadOutcome, RecordReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("unified2.log")?;
//! let mut reader = RecordReader::new(file)?;
//! while let ReadOutcome::Record(record) = reader.next_record()? {
//!     if let DecodedRecord::Event(event) = record {
//!         println!("event {} sig {}", event.event_id, event.signature_key());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod error;
pub mod event;
pub mod extra_data;
pub mod framer;
pub mod packet;
pub mod reader;
pub mod records;
pub mod wire;

mod cursor;
#[cfg(test)]
mod test_support;

pub use dispatch::{decode_raw_record, read_record};
pub use error::{Unified2Error, Unified2Result};
pub use event::decode_event;
pub use extra_data::decode_extra_data;
pub use framer::read_raw_record;
pub use packet::decode_packet;
pub use reader::{ReaderStats, RecordReader};
pub use records::{
    DecodedRecord, EventRecord, ExtraDataRecord, PacketRecord, RawHeader, RawRecord, ReadOutcome,
    VlanTrailer,
};
pub use wire::{is_event_type, RecordType};
