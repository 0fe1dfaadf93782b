use csv::StringRecord;
use serde::{Deserialize, Serialize};

use super::EventError;

/// Column order of the sanitized event table
pub const EVENT_COLUMNS: [&str; 13] = [
    "eventid",
    "src_ip",
    "src_port",
    "dst_ip",
    "dst_port",
    "session",
    "protocol",
    "version",
    "hassh",
    "hasshAlgorithms",
    "message",
    "sensor",
    "timestamp",
];

/// One observed honeypot session interaction.
///
/// Read-only once loaded; labels are carried alongside, never inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Event {
    #[serde(rename = "eventid")]
    pub event_id: String,
    #[serde(rename = "src_ip")]
    pub source_ip: String,
    #[serde(rename = "src_port")]
    pub source_port: Option<u16>,
    #[serde(rename = "dst_ip")]
    pub dest_ip: String,
    #[serde(rename = "dst_port")]
    pub dest_port: Option<u16>,
    #[serde(rename = "session")]
    pub session_id: String,
    pub protocol: String,
    pub version: String,
    #[serde(rename = "hassh")]
    pub hash_fingerprint: String,
    #[serde(rename = "hasshAlgorithms")]
    pub hash_algorithms: String,
    pub message: String,
    #[serde(rename = "sensor")]
    pub sensor_id: String,
    pub timestamp: String,
}

impl Event {
    /// Build an event from one table row
    pub fn from_record(record: &StringRecord) -> Result<Self, EventError> {
        if record.len() != EVENT_COLUMNS.len() {
            return Err(EventError::MalformedRecord(format!(
                "expected {} fields, got {}",
                EVENT_COLUMNS.len(),
                record.len()
            )));
        }

        let field = |i: usize| record.get(i).unwrap_or_default().to_string();

        Ok(Self {
            event_id: field(0),
            source_ip: field(1),
            source_port: parse_port(&field(2))?,
            dest_ip: field(3),
            dest_port: parse_port(&field(4))?,
            session_id: field(5),
            protocol: field(6),
            version: field(7),
            hash_fingerprint: field(8),
            hash_algorithms: field(9),
            message: field(10),
            sensor_id: field(11),
            timestamp: field(12),
        })
    }

    /// Serialize back to the table column order
    pub fn to_row(&self) -> [String; 13] {
        let port = |p: Option<u16>| p.map(|v| v.to_string()).unwrap_or_default();
        [
            self.event_id.clone(),
            self.source_ip.clone(),
            port(self.source_port),
            self.dest_ip.clone(),
            port(self.dest_port),
            self.session_id.clone(),
            self.protocol.clone(),
            self.version.clone(),
            self.hash_fingerprint.clone(),
            self.hash_algorithms.clone(),
            self.message.clone(),
            self.sensor_id.clone(),
            self.timestamp.clone(),
        ]
    }
}

/// True when the row is the table's own header line
pub fn is_header(record: &StringRecord) -> bool {
    record.len() == EVENT_COLUMNS.len()
        && record.iter().zip(EVENT_COLUMNS.iter()).all(|(a, b)| a == *b)
}

/// Ports arrive as "2222", "2222.0" (float-typed export) or empty
fn parse_port(raw: &str) -> Result<Option<u16>, EventError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(port) = raw.parse::<u16>() {
        return Ok(Some(port));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && (0.0..=u16::MAX as f64).contains(&v) => Ok(Some(v as u16)),
        _ => Err(EventError::MalformedRecord(format!("invalid port '{}'", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_from_record_full_row() {
        let record = row(&[
            "cowrie.login.failed", "1.2.3.4", "50122", "10.0.0.2", "2222", "abc123",
            "ssh", "SSH-2.0-Go", "f00d", "curve25519;aes", "login attempt [root/1] failed",
            "sensor-1", "2024-10-12T10:00:00.000000Z",
        ]);
        let event = Event::from_record(&record).unwrap();
        assert_eq!(event.event_id, "cowrie.login.failed");
        assert_eq!(event.source_port, Some(50122));
        assert_eq!(event.dest_port, Some(2222));
        assert_eq!(event.hash_algorithms, "curve25519;aes");
        assert_eq!(event.to_row()[2], "50122");
    }

    #[test]
    fn test_float_and_empty_ports() {
        assert_eq!(parse_port("2222.0").unwrap(), Some(2222));
        assert_eq!(parse_port("").unwrap(), None);
        assert!(parse_port("http").is_err());
        assert!(parse_port("70000").is_err());
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let record = row(&["cowrie.session.connect", "1.2.3.4"]);
        assert!(matches!(
            Event::from_record(&record),
            Err(EventError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header(&row(&EVENT_COLUMNS)));
        let mut data = EVENT_COLUMNS.to_vec();
        data[0] = "cowrie.session.connect";
        assert!(!is_header(&row(&data)));
    }
}
