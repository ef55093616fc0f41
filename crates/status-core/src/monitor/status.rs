use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single check: an HTTP status code or a descriptive label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Status {
    Code(u16),
    Text(String),
}

impl Status {
    pub const OK: &'static str = "OK";
    pub const DOWN: &'static str = "Down";
    pub const ERROR: &'static str = "Error";
    pub const TIMEOUT: &'static str = "Timeout";
    pub const UNKNOWN_TYPE: &'static str = "Unknown type";

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn ok() -> Self {
        Self::text(Self::OK)
    }

    pub fn is_up(&self) -> bool {
        match self {
            Self::Code(code) => (200..300).contains(code),
            Self::Text(s) => s == Self::OK,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

/// Uniform result of one check, whatever the monitor type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub name: String,
    pub host_or_url: String,
    pub status: Status,
    pub message: String,
    pub monitor_type: String,
}

impl StatusRecord {
    pub fn new(
        name: impl Into<String>,
        host_or_url: impl Into<String>,
        status: Status,
        message: impl Into<String>,
        monitor_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host_or_url: host_or_url.into(),
            status,
            message: message.into(),
            monitor_type: monitor_type.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

pub fn is_up(record: &StatusRecord) -> bool {
    record.is_up()
}

/// Stable sort by `monitor_type`; records of one type keep their relative order.
pub fn sort_by_type(records: &mut [StatusRecord]) {
    records.sort_by(|a, b| a.monitor_type.cmp(&b.monitor_type));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Status) -> StatusRecord {
        StatusRecord::new("svc", "http://example.com", status, "", "url")
    }

    #[test]
    fn codes_in_2xx_are_up() {
        assert!(is_up(&record(Status::Code(200))));
        assert!(is_up(&record(Status::Code(299))));
    }

    #[test]
    fn codes_outside_2xx_are_down() {
        assert!(!is_up(&record(Status::Code(300))));
        assert!(!is_up(&record(Status::Code(199))));
        assert!(!is_up(&record(Status::Code(503))));
    }

    #[test]
    fn only_exact_ok_text_is_up() {
        assert!(is_up(&record(Status::ok())));
        assert!(!is_up(&record(Status::text("Timeout"))));
        assert!(!is_up(&record(Status::text("ok"))));
        assert!(!is_up(&record(Status::text("HTTP 200"))));
        assert!(!is_up(&record(Status::text("Error: connection refused"))));
    }

    #[test]
    fn serializes_code_as_number_and_text_as_string() {
        let json = serde_json::to_value(record(Status::Code(503))).unwrap();
        assert_eq!(json["status"], 503);
        let json = serde_json::to_value(record(Status::text("Down"))).unwrap();
        assert_eq!(json["status"], "Down");
    }

    #[test]
    fn json_round_trip_preserves_records() {
        let records = vec![
            StatusRecord::new("a", "http://a.test", Status::Code(200), "OK", "url"),
            StatusRecord::new("b", "10.0.0.1", Status::text("Down"), "Host is down", "ping"),
            StatusRecord::new("c", "true", Status::ok(), "Exit code: 0", "command"),
        ];
        let json = serde_json::to_string_pretty(&records).unwrap();
        let parsed: Vec<StatusRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn sort_by_type_is_stable() {
        let mut records = vec![
            StatusRecord::new("u1", "", Status::ok(), "", "url"),
            StatusRecord::new("p1", "", Status::ok(), "", "ping"),
            StatusRecord::new("u2", "", Status::ok(), "", "url"),
            StatusRecord::new("c1", "", Status::ok(), "", "command"),
            StatusRecord::new("p2", "", Status::ok(), "", "ping"),
        ];
        sort_by_type(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "p1", "p2", "u1", "u2"]);
    }
}
