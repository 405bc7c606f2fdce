//! Unified2 wire format table
//!
//! Record type tags and the fixed sizes of every field block. All integers
//! on the wire are big-endian.

use serde::Serialize;
use std::fmt;

/// Size of the record header (type + length)
pub const RECORD_HEADER_LEN: usize = 8;

/// Size of the nine u32 fields that open every event record
pub const EVENT_PREAMBLE_LEN: usize = 36;

/// Size of one IPv4 address in an event record
pub const IPV4_ADDR_LEN: usize = 4;

/// Size of one IPv6 address in an event record
pub const IPV6_ADDR_LEN: usize = 16;

/// Size of the port/protocol/impact block following the addresses
pub const EVENT_MID_LEN: usize = 8;

/// Size of the MPLS label + VLAN id trailer on version 2 events
pub const EVENT_V2_TRAILER_LEN: usize = 6;

/// Length of a packet record before the captured packet bytes
pub const PACKET_RECORD_HDR_LEN: usize = 28;

/// Length of an extra data record before the opaque data bytes
pub const EXTRA_DATA_RECORD_HDR_LEN: usize = 32;

/// Raw tag values as written by the sensor
pub mod tags {
    pub const PACKET: u32 = 2;
    pub const IDS_EVENT: u32 = 7;
    pub const IDS_EVENT_IP6: u32 = 72;
    pub const IDS_EVENT_V2: u32 = 104;
    pub const IDS_EVENT_IP6_V2: u32 = 105;
    pub const EXTRA_DATA: u32 = 110;
}

/// Record types understood by this decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// Captured packet associated with an event
    Packet,
    /// IPv4 event, version 1
    Event,
    /// IPv6 event, version 1
    EventIpv6,
    /// IPv4 event with MPLS/VLAN trailer
    EventV2,
    /// IPv6 event with MPLS/VLAN trailer
    EventIpv6V2,
    /// Vendor extra data associated with an event
    ExtraData,
}

impl RecordType {
    /// The tag value written on the wire
    pub fn tag(self) -> u32 {
        match self {
            RecordType::Packet => tags::PACKET,
            RecordType::Event => tags::IDS_EVENT,
            RecordType::EventIpv6 => tags::IDS_EVENT_IP6,
            RecordType::EventV2 => tags::IDS_EVENT_V2,
            RecordType::EventIpv6V2 => tags::IDS_EVENT_IP6_V2,
            RecordType::ExtraData => tags::EXTRA_DATA,
        }
    }

    /// Look up a tag, returning `None` for tags this decoder does not handle
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            tags::PACKET => Some(RecordType::Packet),
            tags::IDS_EVENT => Some(RecordType::Event),
            tags::IDS_EVENT_IP6 => Some(RecordType::EventIpv6),
            tags::IDS_EVENT_V2 => Some(RecordType::EventV2),
            tags::IDS_EVENT_IP6_V2 => Some(RecordType::EventIpv6V2),
            tags::EXTRA_DATA => Some(RecordType::ExtraData),
            _ => None,
        }
    }

    /// Whether this is one of the four event record types
    pub fn is_event(self) -> bool {
        matches!(
            self,
            RecordType::Event
                | RecordType::EventIpv6
                | RecordType::EventV2
                | RecordType::EventIpv6V2
        )
    }

    /// Length of each address in an event of this type, `None` for non-events
    pub fn address_len(self) -> Option<usize> {
        match self {
            RecordType::Event | RecordType::EventV2 => Some(IPV4_ADDR_LEN),
            RecordType::EventIpv6 | RecordType::EventIpv6V2 => Some(IPV6_ADDR_LEN),
            RecordType::Packet | RecordType::ExtraData => None,
        }
    }

    /// Whether events of this type carry the MPLS label and VLAN id
    pub fn has_vlan_trailer(self) -> bool {
        matches!(self, RecordType::EventV2 | RecordType::EventIpv6V2)
    }

    /// Smallest body that can hold every fixed field of this record type
    pub fn min_body_len(self) -> usize {
        match self {
            RecordType::Packet => PACKET_RECORD_HDR_LEN,
            RecordType::ExtraData => EXTRA_DATA_RECORD_HDR_LEN,
            event => {
                let addr = event.address_len().unwrap_or(0);
                let trailer = if event.has_vlan_trailer() {
                    EVENT_V2_TRAILER_LEN
                } else {
                    0
                };
                EVENT_PREAMBLE_LEN + 2 * addr + EVENT_MID_LEN + trailer
            }
        }
    }

    /// Short name used in logs and JSON output
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Packet => "packet",
            RecordType::Event => "event",
            RecordType::EventIpv6 => "event_ipv6",
            RecordType::EventV2 => "event_v2",
            RecordType::EventIpv6V2 => "event_ipv6_v2",
            RecordType::ExtraData => "extra_data",
        }
    }
}

impl TryFrom<u32> for RecordType {
    type Error = u32;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        RecordType::from_tag(tag).ok_or(tag)
    }
}

impl From<RecordType> for u32 {
    fn from(record_type: RecordType) -> Self {
        record_type.tag()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.tag())
    }
}

/// Check if a raw tag is one of the event record types
pub fn is_event_type(tag: u32) -> bool {
    RecordType::from_tag(tag).is_some_and(RecordType::is_event)
}
