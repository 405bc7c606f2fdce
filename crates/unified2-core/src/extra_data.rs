//! Extra data record decoder

use crate::cursor::FieldCursor;
use crate::error::Unified2Result;
use crate::records::ExtraDataRecord;
use crate::wire::RecordType;
use bytes::Bytes;

/// Decode the body of an extra data record
///
/// Same slicing rule as packets: the opaque data is the rest of the body
/// after the 32-byte header, whatever `data_length` claims.
pub fn decode_extra_data(body: Bytes) -> Unified2Result<ExtraDataRecord> {
    let mut cur = FieldCursor::new(RecordType::ExtraData, body);

    let event_type = cur.u32("event_type")?;
    let event_length = cur.u32("event_length")?;
    let sensor_id = cur.u32("sensor_id")?;
    let event_id = cur.u32("event_id")?;
    let event_second = cur.u32("event_second")?;
    let extra_type = cur.u32("type")?;
    let data_type = cur.u32("data_type")?;
    let data_length = cur.u32("data_length")?;

    Ok(ExtraDataRecord {
        event_type,
        event_length,
        sensor_id,
        event_id,
        event_second,
        extra_type,
        data_type,
        data_length,
        data: cur.into_rest(),
    })
}
