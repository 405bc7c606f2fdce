//! Record dump loop, with optional tail -f style following

use crate::config::DecodeErrorPolicy;
use crate::render::{render_record, write_json};
use anyhow::Context;
use clap::ValueEnum;
use std::io::{Read, Seek, Write};
use std::time::Duration;
use tracing::{debug, info, warn};
use unified2_core::{DecodedRecord, ReadOutcome, RecordReader};

/// Record kinds selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFilter {
    Event,
    Packet,
    ExtraData,
    Unknown,
}

impl RecordFilter {
    pub fn matches(self, record: &DecodedRecord) -> bool {
        matches!(
            (self, record),
            (RecordFilter::Event, DecodedRecord::Event(_))
                | (RecordFilter::Packet, DecodedRecord::Packet(_))
                | (RecordFilter::ExtraData, DecodedRecord::ExtraData(_))
                | (RecordFilter::Unknown, DecodedRecord::Unknown)
        )
    }
}

/// Dump options
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Only print records of this kind
    pub filter: Option<RecordFilter>,

    /// Stop after printing this many records
    pub limit: Option<usize>,

    /// Keep polling at end of file
    pub follow: bool,

    /// Delay between polls in follow mode
    pub poll_interval: Duration,

    /// Decode error handling
    pub on_decode_error: DecodeErrorPolicy,

    /// Pretty print JSON
    pub pretty: bool,

    /// Include payload bytes
    pub include_payload: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            filter: None,
            limit: None,
            follow: false,
            poll_interval: Duration::from_millis(1000),
            on_decode_error: DecodeErrorPolicy::Skip,
            pretty: false,
            include_payload: true,
        }
    }
}

/// Print records as JSON lines until end of file, the limit, or Ctrl+C
///
/// In follow mode both end of stream and a partially written record mean
/// "wait and poll the same offset again". Returns the number of records
/// printed.
pub async fn run_dump<R, W>(
    reader: &mut RecordReader<R>,
    opts: &DumpOptions,
    out: &mut W,
) -> anyhow::Result<usize>
where
    R: Read + Seek,
    W: Write,
{
    let mut printed = 0usize;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if opts.limit.is_some_and(|limit| printed >= limit) {
            break;
        }

        let offset = reader.offset();
        match reader.next_record() {
            Ok(ReadOutcome::Record(record)) => {
                if opts.filter.is_some_and(|f| !f.matches(&record)) {
                    continue;
                }
                let value = render_record(offset, &record, opts.include_payload)?;
                write_json(out, &value, opts.pretty)?;
                printed += 1;
            }
            Ok(outcome @ (ReadOutcome::EndOfStream | ReadOutcome::Incomplete)) => {
                if !opts.follow {
                    if outcome == ReadOutcome::Incomplete {
                        warn!("Trailing incomplete record at offset {}", offset);
                    }
                    break;
                }

                out.flush()?;
                debug!("Waiting for more data at offset {}", offset);
                tokio::select! {
                    _ = &mut shutdown => {
                        info!("Interrupted, stopping at offset {}", offset);
                        break;
                    }
                    _ = tokio::time::sleep(opts.poll_interval) => {}
                }
            }
            Err(err) if err.is_decode_error() && opts.on_decode_error == DecodeErrorPolicy::Skip => {
                warn!("Skipping corrupt record at offset {}: {}", offset, err);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read record at offset {}", offset));
            }
        }
    }

    out.flush()?;
    Ok(printed)
}
