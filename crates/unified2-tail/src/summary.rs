//! Spool file summary

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use unified2_core::{DecodedRecord, ReaderStats};

/// Aggregates decoded records for the `stats` command
#[derive(Debug, Default)]
pub struct SpoolSummary {
    signatures: HashMap<String, u64>,
    protocols: HashMap<u8, u64>,
    sensors: BTreeSet<u32>,
    blocked: u64,
    first_event: Option<DateTime<Utc>>,
    last_event: Option<DateTime<Utc>>,
}

impl SpoolSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record to the summary
    pub fn observe(&mut self, record: &DecodedRecord) {
        let DecodedRecord::Event(event) = record else {
            return;
        };

        *self.signatures.entry(event.signature_key()).or_default() += 1;
        *self.protocols.entry(event.protocol).or_default() += 1;
        self.sensors.insert(event.sensor_id);
        if event.blocked != 0 {
            self.blocked += 1;
        }

        if let Some(ts) = event.timestamp() {
            self.first_event = Some(self.first_event.map_or(ts, |first| first.min(ts)));
            self.last_event = Some(self.last_event.map_or(ts, |last| last.max(ts)));
        }
    }

    /// Signatures by descending hit count, ties broken by key
    pub fn top_signatures(&self, n: usize) -> Vec<(&str, u64)> {
        let mut sigs: Vec<(&str, u64)> = self
            .signatures
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        sigs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sigs.truncate(n);
        sigs
    }

    /// Render the summary as a text report
    pub fn render(&self, stats: &ReaderStats, top: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n=== Spool Summary ===\n");
        let _ = writeln!(out, "Records:");
        let _ = writeln!(out, "  {:<20} {:>8}", "events", stats.events);
        let _ = writeln!(out, "  {:<20} {:>8}", "packets", stats.packets);
        let _ = writeln!(out, "  {:<20} {:>8}", "extra data", stats.extra_data);
        let _ = writeln!(out, "  {:<20} {:>8}", "unknown", stats.unknown);
        let _ = writeln!(out, "  {:<20} {:>8}", "decode errors", stats.decode_errors);
        let _ = writeln!(out, "  {:<20} {:>8}", "bytes", stats.bytes_consumed);

        if let (Some(first), Some(last)) = (self.first_event, self.last_event) {
            let _ = writeln!(out, "\nEvent time range:");
            let _ = writeln!(out, "  {} .. {}", first.to_rfc3339(), last.to_rfc3339());
        }

        if !self.sensors.is_empty() {
            let sensors: Vec<String> = self.sensors.iter().map(|s| s.to_string()).collect();
            let _ = writeln!(out, "\nSensors: {}", sensors.join(", "));
            let _ = writeln!(out, "Blocked events: {}", self.blocked);
        }

        let signatures = self.top_signatures(top);
        if !signatures.is_empty() {
            let _ = writeln!(out, "\nTop signatures:");
            for (sig, count) in signatures {
                let _ = writeln!(out, "  {:<20} {:>8}", sig, count);
            }
        }

        if !self.protocols.is_empty() {
            let mut protocols: Vec<_> = self.protocols.iter().collect();
            protocols.sort();
            let _ = writeln!(out, "\nProtocols:");
            for (proto, count) in protocols {
                let _ = writeln!(out, "  {:<20} {:>8}", protocol_name(*proto), count);
            }
        }

        out
    }
}

fn protocol_name(proto: u8) -> String {
    match proto {
        1 => "icmp".to_string(),
        6 => "tcp".to_string(),
        17 => "udp".to_string(),
        58 => "ipv6-icmp".to_string(),
        other => format!("proto {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use unified2_core::{EventRecord, RecordType};

    fn event(sid: u32, second: u32, protocol: u8, blocked: u8) -> DecodedRecord {
        DecodedRecord::Event(EventRecord {
            record_type: RecordType::Event,
            sensor_id: 1,
            event_id: sid,
            event_second: second,
            event_microsecond: 0,
            signature_id: sid,
            generator_id: 1,
            signature_revision: 1,
            classification_id: 0,
            priority: 2,
            ip_source: IpAddr::from([10, 0, 0, 1]),
            ip_destination: IpAddr::from([10, 0, 0, 2]),
            sport_itype: 1024,
            dport_icode: 80,
            protocol,
            impact_flag: 0,
            impact: 0,
            blocked,
            vlan: None,
        })
    }

    #[test]
    fn test_top_signatures() {
        let mut summary = SpoolSummary::new();
        for record in [
            event(100, 10, 6, 0),
            event(200, 20, 6, 0),
            event(200, 30, 17, 1),
            event(300, 5, 1, 0),
            DecodedRecord::Unknown,
        ] {
            summary.observe(&record);
        }

        let top = summary.top_signatures(2);
        assert_eq!(top, vec![("1:200:1", 2), ("1:100:1", 1)]);
        assert_eq!(summary.blocked, 1);
        assert_eq!(summary.first_event.unwrap().timestamp(), 5);
        assert_eq!(summary.last_event.unwrap().timestamp(), 30);
    }

    #[test]
    fn test_render() {
        let mut summary = SpoolSummary::new();
        summary.observe(&event(100, 10, 6, 0));
        let stats = ReaderStats {
            events: 1,
            packets: 2,
            ..Default::default()
        };

        let report = summary.render(&stats, 10);
        assert!(report.contains("Spool Summary"));
        assert!(report.contains("1:100:1"));
        assert!(report.contains("tcp"));
        assert!(report.contains("Sensors: 1"));
    }
}
