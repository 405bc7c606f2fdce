//! Builders for hand-made unified2 bytes used across the unit tests

use crate::wire::RecordType;
use std::net::IpAddr;

/// Prefix a body with its record header
pub(crate) fn frame_record(tag: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// Field values for an event body
pub(crate) struct EventFields {
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
    pub sport_itype: u16,
    pub dport_icode: u16,
    pub protocol: u8,
    pub impact_flag: u8,
    pub impact: u8,
    pub blocked: u8,
    pub mpls_label: u32,
    pub vlan_id: u16,
}

impl Default for EventFields {
    fn default() -> Self {
        Self {
            sensor_id: 1,
            event_id: 2,
            event_second: 1_000_000,
            event_microsecond: 500,
            signature_id: 2_010_935,
            generator_id: 1,
            signature_revision: 4,
            classification_id: 5,
            priority: 3,
            ip_source: IpAddr::from([10, 0, 0, 1]),
            ip_destination: IpAddr::from([10, 0, 0, 2]),
            sport_itype: 80,
            dport_icode: 443,
            protocol: 6,
            impact_flag: 0,
            impact: 0,
            blocked: 0,
            mpls_label: 0,
            vlan_id: 0,
        }
    }
}

impl EventFields {
    /// Encode the body the way the sensor lays it out for `record_type`
    pub(crate) fn encode(&self, record_type: RecordType) -> Vec<u8> {
        let mut out = Vec::new();
        for v in [
            self.sensor_id,
            self.event_id,
            self.event_second,
            self.event_microsecond,
            self.signature_id,
            self.generator_id,
            self.signature_revision,
            self.classification_id,
            self.priority,
        ] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        push_addr(&mut out, self.ip_source);
        push_addr(&mut out, self.ip_destination);
        out.extend_from_slice(&self.sport_itype.to_be_bytes());
        out.extend_from_slice(&self.dport_icode.to_be_bytes());
        out.extend_from_slice(&[self.protocol, self.impact_flag, self.impact, self.blocked]);
        if record_type.has_vlan_trailer() {
            out.extend_from_slice(&self.mpls_label.to_be_bytes());
            out.extend_from_slice(&self.vlan_id.to_be_bytes());
        }
        out
    }
}

fn push_addr(out: &mut Vec<u8>, addr: IpAddr) {
    match addr {
        IpAddr::V4(v4) => out.extend_from_slice(&v4.octets()),
        IpAddr::V6(v6) => out.extend_from_slice(&v6.octets()),
    }
}

/// Packet body: the seven header fields followed by `tail`
pub(crate) fn packet_body(event_id: u32, declared_length: u32, tail: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [1, event_id, 1_000_000, 1_000_001, 42, 1, declared_length] {
        out.extend_from_slice(&u32::to_be_bytes(v));
    }
    out.extend_from_slice(tail);
    out
}

/// Extra data body: the eight header fields followed by `tail`
pub(crate) fn extra_data_body(event_id: u32, data_length: u32, tail: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [4, 32 + data_length, 1, event_id, 1_000_000, 10, 1, data_length] {
        out.extend_from_slice(&u32::to_be_bytes(v));
    }
    out.extend_from_slice(tail);
    out
}
