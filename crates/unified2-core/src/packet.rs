//! Packet record decoder

use crate::cursor::FieldCursor;
use crate::error::Unified2Result;
use crate::records::PacketRecord;
use crate::wire::RecordType;
use bytes::Bytes;

/// Decode the body of a packet record
///
/// The captured bytes are whatever follows the 28-byte header. The declared
/// `length` field is kept but not used for slicing.
pub fn decode_packet(body: Bytes) -> Unified2Result<PacketRecord> {
    let mut cur = FieldCursor::new(RecordType::Packet, body);

    let sensor_id = cur.u32("sensor_id")?;
    let event_id = cur.u32("event_id")?;
    let event_second = cur.u32("event_second")?;
    let packet_second = cur.u32("packet_second")?;
    let packet_microsecond = cur.u32("packet_microsecond")?;
    let link_type = cur.u32("link_type")?;
    let length = cur.u32("length")?;

    Ok(PacketRecord {
        sensor_id,
        event_id,
        event_second,
        packet_second,
        packet_microsecond,
        link_type,
        length,
        data: cur.into_rest(),
    })
}
