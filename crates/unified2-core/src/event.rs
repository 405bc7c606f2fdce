//! Event record decoder
//!
//! Handles all four event layouts. The layouts share a preamble and a block
//! of port/protocol/impact fields; they differ in address width (IPv4 or
//! IPv6) and in whether a version 2 MPLS/VLAN trailer follows.

use crate::cursor::FieldCursor;
use crate::error::{Unified2Error, Unified2Result};
use crate::records::{EventRecord, VlanTrailer};
use crate::wire::RecordType;
use bytes::Bytes;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Decode the body of an event record
///
/// The address family and the presence of the MPLS/VLAN trailer are decided
/// by `record_type` alone. A body that ends before the last field of its
/// layout is a decoding error; bytes after the last field are ignored.
pub fn decode_event(record_type: RecordType, body: Bytes) -> Unified2Result<EventRecord> {
    if !record_type.is_event() {
        return Err(Unified2Error::NotAnEvent(record_type));
    }

    let mut cur = FieldCursor::new(record_type, body);

    let sensor_id = cur.u32("sensor_id")?;
    let event_id = cur.u32("event_id")?;
    let event_second = cur.u32("event_second")?;
    let event_microsecond = cur.u32("event_microsecond")?;
    let signature_id = cur.u32("signature_id")?;
    let generator_id = cur.u32("generator_id")?;
    let signature_revision = cur.u32("signature_revision")?;
    let classification_id = cur.u32("classification_id")?;
    let priority = cur.u32("priority")?;

    let (ip_source, ip_destination) = match record_type {
        RecordType::Event | RecordType::EventV2 => (
            IpAddr::V4(Ipv4Addr::from(cur.array::<4>("ip_source")?)),
            IpAddr::V4(Ipv4Addr::from(cur.array::<4>("ip_destination")?)),
        ),
        RecordType::EventIpv6 | RecordType::EventIpv6V2 => (
            IpAddr::V6(Ipv6Addr::from(cur.array::<16>("ip_source")?)),
            IpAddr::V6(Ipv6Addr::from(cur.array::<16>("ip_destination")?)),
        ),
        RecordType::Packet | RecordType::ExtraData => {
            return Err(Unified2Error::NotAnEvent(record_type));
        }
    };

    let sport_itype = cur.u16("sport_itype")?;
    let dport_icode = cur.u16("dport_icode")?;
    let protocol = cur.u8("protocol")?;
    let impact_flag = cur.u8("impact_flag")?;
    let impact = cur.u8("impact")?;
    let blocked = cur.u8("blocked")?;

    let vlan = if record_type.has_vlan_trailer() {
        Some(VlanTrailer {
            mpls_label: cur.u32("mpls_label")?,
            vlan_id: cur.u16("vlan_id")?,
        })
    } else {
        None
    };

    Ok(EventRecord {
        record_type,
        sensor_id,
        event_id,
        event_second,
        event_microsecond,
        signature_id,
        generator_id,
        signature_revision,
        classification_id,
        priority,
        ip_source,
        ip_destination,
        sport_itype,
        dport_icode,
        protocol,
        impact_flag,
        impact,
        blocked,
        vlan,
    })
}
