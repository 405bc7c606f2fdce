//! Decoded unified2 record types

use crate::wire::RecordType;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::net::IpAddr;

/// Raw unified2 record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    /// Raw type tag
    pub record_type: u32,
    /// Number of body bytes that follow the header
    pub length: u32,
}

impl RawHeader {
    /// Parse the 8 header bytes
    pub fn from_bytes(buf: [u8; 8]) -> Self {
        Self {
            record_type: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            length: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }
}

/// A framed record whose body has not been decoded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Raw type tag, possibly one this decoder does not know
    pub record_type: u32,
    /// Exactly `length` body bytes
    pub data: Bytes,
}

/// MPLS label and VLAN id carried by version 2 events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VlanTrailer {
    pub mpls_label: u32,
    pub vlan_id: u16,
}

/// Decoded intrusion event
///
/// One struct covers all four event types. The address family comes from
/// the record type: IPv4 for `Event`/`EventV2`, IPv6 for the other two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Type the event was decoded from
    pub record_type: RecordType,
    pub sensor_id: u32,
    pub event_id: u32,
    pub event_second: u32,
    pub event_microsecond: u32,
    pub signature_id: u32,
    pub generator_id: u32,
    pub signature_revision: u32,
    pub classification_id: u32,
    pub priority: u32,
    pub ip_source: IpAddr,
    pub ip_destination: IpAddr,
    /// Source port, or ICMP type for ICMP events
    pub sport_itype: u16,
    /// Destination port, or ICMP code for ICMP events
    pub dport_icode: u16,
    pub protocol: u8,
    pub impact_flag: u8,
    pub impact: u8,
    pub blocked: u8,
    /// Present only on version 2 events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanTrailer>,
}

impl EventRecord {
    /// Event time, `None` if the microsecond field is out of range
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.event_second, self.event_microsecond)
    }

    /// Source address as it appeared on the wire (4 or 16 bytes)
    pub fn ip_source_octets(&self) -> Vec<u8> {
        octets(&self.ip_source)
    }

    /// Destination address as it appeared on the wire (4 or 16 bytes)
    pub fn ip_destination_octets(&self) -> Vec<u8> {
        octets(&self.ip_destination)
    }

    /// MPLS label, version 2 events only
    pub fn mpls_label(&self) -> Option<u32> {
        self.vlan.map(|v| v.mpls_label)
    }

    /// VLAN id, version 2 events only
    pub fn vlan_id(&self) -> Option<u16> {
        self.vlan.map(|v| v.vlan_id)
    }

    /// Signature in the usual `gid:sid:rev` notation
    pub fn signature_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.generator_id, self.signature_id, self.signature_revision
        )
    }
}

/// Decoded packet record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketRecord {
    pub sensor_id: u32,
    pub event_id: u32,
    pub event_second: u32,
    pub packet_second: u32,
    pub packet_microsecond: u32,
    pub link_type: u32,
    /// Length declared by the sensor; informational only
    pub length: u32,
    /// Captured packet bytes (the rest of the record body)
    #[serde(serialize_with = "serialize_hex")]
    pub data: Bytes,
}

impl PacketRecord {
    /// Capture time of the packet
    pub fn packet_timestamp(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.packet_second, self.packet_microsecond)
    }
}

/// Decoded extra data record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraDataRecord {
    pub event_type: u32,
    pub event_length: u32,
    pub sensor_id: u32,
    pub event_id: u32,
    pub event_second: u32,
    /// Vendor type code
    #[serde(rename = "type")]
    pub extra_type: u32,
    pub data_type: u32,
    /// Length declared by the sensor; informational only
    pub data_length: u32,
    /// Opaque data bytes (the rest of the record body)
    #[serde(serialize_with = "serialize_hex")]
    pub data: Bytes,
}

/// Result of decoding one framed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRecord {
    Event(EventRecord),
    Packet(PacketRecord),
    ExtraData(ExtraDataRecord),
    /// Well-formed record with a type tag this decoder does not handle
    Unknown,
}

impl DecodedRecord {
    /// Short label for logs and filters
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedRecord::Event(_) => "event",
            DecodedRecord::Packet(_) => "packet",
            DecodedRecord::ExtraData(_) => "extra_data",
            DecodedRecord::Unknown => "unknown",
        }
    }

    /// Event id the record belongs to, if it carries one
    pub fn event_id(&self) -> Option<u32> {
        match self {
            DecodedRecord::Event(e) => Some(e.event_id),
            DecodedRecord::Packet(p) => Some(p.event_id),
            DecodedRecord::ExtraData(x) => Some(x.event_id),
            DecodedRecord::Unknown => None,
        }
    }
}

/// Outcome of a read that may run out of input
///
/// `EndOfStream` and `Incomplete` both mean "nothing to hand out right now";
/// after `Incomplete` the stream is back where the call started so the same
/// offset can be polled again once the writer has appended more bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    /// A complete record
    Record(T),
    /// No bytes at all at the record boundary
    EndOfStream,
    /// The header or body is only partially written
    Incomplete,
}

impl<T> ReadOutcome<T> {
    /// Convert into an `Option`, dropping the reason no record was available
    pub fn into_record(self) -> Option<T> {
        match self {
            ReadOutcome::Record(record) => Some(record),
            ReadOutcome::EndOfStream | ReadOutcome::Incomplete => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, ReadOutcome::Record(_))
    }
}

fn to_datetime(seconds: u32, microseconds: u32) -> Option<DateTime<Utc>> {
    if microseconds >= 1_000_000 {
        return None;
    }
    DateTime::from_timestamp(i64::from(seconds), microseconds * 1_000)
}

fn octets(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn serialize_hex<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn sample_event() -> EventRecord {
        EventRecord {
            record_type: RecordType::EventV2,
            sensor_id: 1,
            event_id: 2,
            event_second: 1_700_000_000,
            event_microsecond: 250_000,
            signature_id: 2_100_498,
            generator_id: 1,
            signature_revision: 7,
            classification_id: 3,
            priority: 2,
            ip_source: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            ip_destination: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            sport_itype: 80,
            dport_icode: 443,
            protocol: 6,
            impact_flag: 0,
            impact: 0,
            blocked: 1,
            vlan: Some(VlanTrailer {
                mpls_label: 16,
                vlan_id: 100,
            }),
        }
    }

    #[test]
    fn test_raw_header_from_bytes() {
        let header = RawHeader::from_bytes([0, 0, 0, 7, 0, 0, 1, 0]);
        assert_eq!(header.record_type, 7);
        assert_eq!(header.length, 256);
    }

    #[test]
    fn test_event_helpers() {
        let event = sample_event();
        assert_eq!(event.signature_key(), "1:2100498:7");
        assert_eq!(event.mpls_label(), Some(16));
        assert_eq!(event.vlan_id(), Some(100));
        assert_eq!(event.ip_source_octets(), vec![10, 0, 0, 1]);

        let ts = event.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn test_ipv6_octets_len() {
        let mut event = sample_event();
        event.ip_destination = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert_eq!(event.ip_destination_octets().len(), 16);
    }

    #[test]
    fn test_out_of_range_microseconds() {
        let mut event = sample_event();
        event.event_microsecond = 1_000_000;
        assert!(event.timestamp().is_none());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["record_type"], "event_v2");
        assert_eq!(json["ip_source"], "10.0.0.1");
        assert_eq!(json["vlan"]["vlan_id"], 100);

        let mut v1 = sample_event();
        v1.vlan = None;
        let json = serde_json::to_value(v1).unwrap();
        assert!(json.get("vlan").is_none());
    }

    #[test]
    fn test_tail_serializes_as_hex() {
        let packet = PacketRecord {
            sensor_id: 0,
            event_id: 9,
            event_second: 0,
            packet_second: 0,
            packet_microsecond: 0,
            link_type: 1,
            length: 3,
            data: Bytes::from_static(&[0xAA, 0xBB, 0xCC]),
        };
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["data"], "aabbcc");
        assert_eq!(DecodedRecord::Packet(packet).event_id(), Some(9));
    }

    #[test]
    fn test_read_outcome_into_record() {
        assert_eq!(ReadOutcome::Record(5).into_record(), Some(5));
        assert_eq!(ReadOutcome::<u8>::EndOfStream.into_record(), None);
        assert_eq!(ReadOutcome::<u8>::Incomplete.into_record(), None);
        assert!(!ReadOutcome::<u8>::Incomplete.is_record());
    }
}
