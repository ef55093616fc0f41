use std::time::Duration;

use crate::config::MonitorEntry;
use crate::monitor::checks::command::compose;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// A validated monitor definition, ready to be checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub name: String,
    pub kind: MonitorKind,
}

/// The check to perform, carrying only the fields that check needs.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorKind {
    Url {
        url: String,
        host: Option<String>,
        timeout: Duration,
    },
    Syncthing {
        url: String,
        api_key: String,
        host: Option<String>,
        timeout: Duration,
    },
    Ping {
        host: String,
        timeout: Duration,
    },
    Command {
        command: String,
        host: Option<String>,
        timeout: Option<Duration>,
    },
    /// A `type` tag no check exists for.
    Unknown { type_name: String, target: String },
    /// A known type missing a field it requires.
    Invalid {
        type_name: String,
        target: String,
        reason: String,
    },
}

impl MonitorKind {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Url { .. } => "url",
            Self::Syncthing { .. } => "syncthing",
            Self::Ping { .. } => "ping",
            Self::Command { .. } => "command",
            Self::Unknown { type_name, .. } | Self::Invalid { type_name, .. } => type_name,
        }
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        match self {
            Self::Invalid { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

fn timeout_from_secs(secs: Option<f64>) -> Option<Duration> {
    secs.and_then(|s| Duration::try_from_secs_f64(s).ok())
}

impl Monitor {
    pub fn new(name: impl Into<String>, kind: MonitorKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            name,
            MonitorKind::Url {
                url: url.into(),
                host: None,
                timeout: DEFAULT_HTTP_TIMEOUT,
            },
        )
    }

    pub fn ping(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(
            name,
            MonitorKind::Ping {
                host: host.into(),
                timeout: DEFAULT_PING_TIMEOUT,
            },
        )
    }

    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(
            name,
            MonitorKind::Command {
                command: command.into(),
                host: None,
                timeout: None,
            },
        )
    }

    pub fn monitor_type(&self) -> &str {
        self.kind.type_name()
    }

    /// What a status record shows as `host_or_url` for this monitor.
    pub fn display_target(&self) -> String {
        match &self.kind {
            MonitorKind::Url { url, host, .. } | MonitorKind::Syncthing { url, host, .. } => {
                host.as_deref().unwrap_or(url).to_string()
            }
            MonitorKind::Ping { host, .. } => host.clone(),
            MonitorKind::Command { command, host, .. } => compose(command, host.as_deref()),
            MonitorKind::Unknown { target, .. } | MonitorKind::Invalid { target, .. } => {
                target.clone()
            }
        }
    }

    /// Validate a raw config entry.
    ///
    /// Never fails: a missing required field yields [`MonitorKind::Invalid`]
    /// so the monitor still reports a status instead of aborting the run.
    pub fn from_entry(entry: MonitorEntry) -> Self {
        let type_name = entry.kind().to_string();
        let target = entry
            .host
            .clone()
            .or_else(|| entry.url.clone())
            .unwrap_or_default();
        let timeout = timeout_from_secs(entry.timeout);
        let name = entry.name.unwrap_or_default();

        let missing = |field: &str| MonitorKind::Invalid {
            type_name: type_name.clone(),
            target: target.clone(),
            reason: format!("Monitor type '{}' requires '{}'", type_name, field),
        };

        let kind = match type_name.as_str() {
            "url" => match entry.url {
                Some(url) => MonitorKind::Url {
                    url,
                    host: entry.host,
                    timeout: timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
                },
                None => missing("url"),
            },
            "syncthing" => match (entry.url, entry.api_key) {
                (Some(url), Some(api_key)) => MonitorKind::Syncthing {
                    url,
                    api_key,
                    host: entry.host,
                    timeout: timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
                },
                (None, _) => missing("url"),
                (_, None) => missing("api_key"),
            },
            "ping" => match entry.host {
                Some(host) => MonitorKind::Ping {
                    host,
                    timeout: timeout.unwrap_or(DEFAULT_PING_TIMEOUT),
                },
                None => missing("host"),
            },
            "command" => match entry.command {
                Some(command) => MonitorKind::Command {
                    command,
                    host: entry.host,
                    timeout,
                },
                None => missing("command"),
            },
            _ => MonitorKind::Unknown {
                type_name: type_name.clone(),
                target: target.clone(),
            },
        };

        Self { name, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: Option<&str>) -> MonitorEntry {
        MonitorEntry {
            name: Some("m".into()),
            kind: kind.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn type_defaults_to_url() {
        let mut e = entry(None);
        e.url = Some("http://example.com".into());
        let m = Monitor::from_entry(e);
        assert_eq!(m.monitor_type(), "url");
        assert_eq!(
            m.kind,
            MonitorKind::Url {
                url: "http://example.com".into(),
                host: None,
                timeout: DEFAULT_HTTP_TIMEOUT,
            }
        );
    }

    #[test]
    fn ping_uses_two_second_default_timeout() {
        let mut e = entry(Some("ping"));
        e.host = Some("10.0.0.1".into());
        let m = Monitor::from_entry(e);
        assert!(matches!(m.kind, MonitorKind::Ping { timeout, .. } if timeout == DEFAULT_PING_TIMEOUT));
    }

    #[test]
    fn fractional_timeout_is_honoured() {
        let mut e = entry(Some("url"));
        e.url = Some("http://example.com".into());
        e.timeout = Some(1.5);
        let m = Monitor::from_entry(e);
        assert!(matches!(m.kind, MonitorKind::Url { timeout, .. } if timeout == Duration::from_millis(1500)));
    }

    #[test]
    fn negative_timeout_falls_back_to_default() {
        let mut e = entry(Some("ping"));
        e.host = Some("10.0.0.1".into());
        e.timeout = Some(-1.0);
        let m = Monitor::from_entry(e);
        assert!(matches!(m.kind, MonitorKind::Ping { timeout, .. } if timeout == DEFAULT_PING_TIMEOUT));
    }

    #[test]
    fn unknown_type_keeps_its_tag_and_target() {
        let mut e = entry(Some("bogus"));
        e.host = Some("box".into());
        e.url = Some("http://box".into());
        let m = Monitor::from_entry(e);
        assert_eq!(m.monitor_type(), "bogus");
        assert_eq!(
            m.kind,
            MonitorKind::Unknown {
                type_name: "bogus".into(),
                target: "box".into(),
            }
        );
    }

    #[test]
    fn missing_required_fields_are_invalid() {
        let cases = [
            ("url", "url"),
            ("ping", "host"),
            ("command", "command"),
        ];
        for (kind, field) in cases {
            let m = Monitor::from_entry(entry(Some(kind)));
            let reason = m.kind.invalid_reason().expect("should be invalid");
            assert!(reason.contains(field), "{}: {}", kind, reason);
            assert_eq!(m.monitor_type(), kind);
        }
    }

    #[test]
    fn display_target_prefers_host() {
        let mut e = entry(Some("url"));
        e.url = Some("http://10.0.0.1".into());
        e.host = Some("lb".into());
        assert_eq!(Monitor::from_entry(e).display_target(), "lb");
        assert_eq!(
            Monitor::url("u", "http://example.com").display_target(),
            "http://example.com"
        );
        let mut e = entry(Some("command"));
        e.command = Some("uptime".into());
        e.host = Some("nas".into());
        assert_eq!(Monitor::from_entry(e).display_target(), "ssh nas 'uptime'");
    }

    #[test]
    fn syncthing_requires_api_key() {
        let mut e = entry(Some("syncthing"));
        e.url = Some("http://127.0.0.1:8384".into());
        let m = Monitor::from_entry(e);
        assert!(m.kind.invalid_reason().unwrap().contains("api_key"));
    }
}
