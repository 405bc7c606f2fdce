//! JSON rendering of decoded records

use serde_json::{json, Map, Value};
use std::io::Write;
use unified2_core::DecodedRecord;

/// Build the JSON object printed for one record
///
/// Every object carries the record's byte offset and its kind. Events also
/// get an RFC 3339 timestamp and a `gid:sid:rev` signature. Without
/// `include_payload` the hex `data` field is replaced by its byte length.
pub fn render_record(
    offset: u64,
    record: &DecodedRecord,
    include_payload: bool,
) -> serde_json::Result<Value> {
    let mut fields = match record {
        DecodedRecord::Event(event) => {
            let mut value = serde_json::to_value(event)?;
            if let Value::Object(map) = &mut value {
                if let Some(ts) = event.timestamp() {
                    map.insert("timestamp".to_string(), json!(ts.to_rfc3339()));
                }
                map.insert("signature".to_string(), json!(event.signature_key()));
            }
            value
        }
        DecodedRecord::Packet(packet) => {
            let mut value = serde_json::to_value(packet)?;
            if let (Value::Object(map), Some(ts)) = (&mut value, packet.packet_timestamp()) {
                map.insert("packet_timestamp".to_string(), json!(ts.to_rfc3339()));
            }
            strip_payload(value, packet.data.len(), include_payload)
        }
        DecodedRecord::ExtraData(extra) => {
            let value = serde_json::to_value(extra)?;
            strip_payload(value, extra.data.len(), include_payload)
        }
        DecodedRecord::Unknown => Value::Object(Map::new()),
    };

    let mut out = Map::new();
    out.insert("offset".to_string(), json!(offset));
    out.insert("kind".to_string(), json!(record.kind()));
    if let Value::Object(map) = &mut fields {
        out.append(map);
    }
    Ok(Value::Object(out))
}

fn strip_payload(mut value: Value, len: usize, include_payload: bool) -> Value {
    if !include_payload {
        if let Value::Object(map) = &mut value {
            map.remove("data");
            map.insert("data_len".to_string(), json!(len));
        }
    }
    value
}

/// Write one JSON document followed by a newline
pub fn write_json<W: Write>(out: &mut W, value: &Value, pretty: bool) -> std::io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::net::IpAddr;
    use unified2_core::{EventRecord, ExtraDataRecord, PacketRecord, RecordType};

    fn event() -> EventRecord {
        EventRecord {
            record_type: RecordType::Event,
            sensor_id: 0,
            event_id: 11,
            event_second: 1_700_000_000,
            event_microsecond: 0,
            signature_id: 2_013_028,
            generator_id: 1,
            signature_revision: 3,
            classification_id: 2,
            priority: 1,
            ip_source: IpAddr::from([192, 168, 1, 5]),
            ip_destination: IpAddr::from([8, 8, 8, 8]),
            sport_itype: 51000,
            dport_icode: 53,
            protocol: 17,
            impact_flag: 0,
            impact: 0,
            blocked: 0,
            vlan: None,
        }
    }

    fn packet() -> PacketRecord {
        PacketRecord {
            sensor_id: 0,
            event_id: 11,
            event_second: 1_700_000_000,
            packet_second: 1_700_000_000,
            packet_microsecond: 10,
            link_type: 1,
            length: 3,
            data: Bytes::from_static(&[0xAA, 0xBB, 0xCC]),
        }
    }

    #[test]
    fn test_render_event() {
        let value = render_record(96, &DecodedRecord::Event(event()), true).unwrap();
        assert_eq!(value["offset"], 96);
        assert_eq!(value["kind"], "event");
        assert_eq!(value["record_type"], "event");
        assert_eq!(value["signature"], "1:2013028:3");
        assert_eq!(value["ip_source"], "192.168.1.5");
        assert_eq!(value["timestamp"], "2023-11-14T22:13:20+00:00");
        assert!(value.get("vlan").is_none());
    }

    #[test]
    fn test_render_packet_payload() {
        let record = DecodedRecord::Packet(packet());

        let with = render_record(0, &record, true).unwrap();
        assert_eq!(with["data"], "aabbcc");

        let without = render_record(0, &record, false).unwrap();
        assert!(without.get("data").is_none());
        assert_eq!(without["data_len"], 3);
    }

    #[test]
    fn test_render_extra_data() {
        let extra = ExtraDataRecord {
            event_type: 4,
            event_length: 36,
            sensor_id: 0,
            event_id: 11,
            event_second: 1_700_000_000,
            extra_type: 9,
            data_type: 1,
            data_length: 4,
            data: Bytes::from_static(b"root"),
        };
        let value = render_record(7, &DecodedRecord::ExtraData(extra), true).unwrap();
        assert_eq!(value["kind"], "extra_data");
        assert_eq!(value["type"], 9);
        assert_eq!(value["data"], hex::encode(b"root"));
    }

    #[test]
    fn test_render_unknown() {
        let value = render_record(40, &DecodedRecord::Unknown, true).unwrap();
        assert_eq!(value, json!({"offset": 40, "kind": "unknown"}));
    }

    #[test]
    fn test_write_json_lines() {
        let mut out = Vec::new();
        write_json(&mut out, &json!({"a": 1}), false).unwrap();
        write_json(&mut out, &json!({"b": 2}), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }
}
