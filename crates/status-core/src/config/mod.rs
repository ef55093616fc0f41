//! Configuration file schema and loading.
//!
//! Example config file (YAML; a `.toml` path is read as TOML with the same shape):
//!
//! ```yaml
//! log_format: pretty
//! follow:
//!   interval: 10
//! web:
//!   listen: 0.0.0.0:8000
//!   static_dir: static
//! ignore:
//!   - legacy-api
//! monitors:
//!   - name: homepage
//!     url: https://example.com
//!   - name: sync
//!     type: syncthing
//!     url: http://127.0.0.1:8384
//!     api_key: abc123
//!   - name: nas
//!     type: ping
//!     host: 192.168.1.10
//!   - name: backups
//!     type: command
//!     host: nas
//!     command: test -f /srv/backup/latest
//!   - type: ping_csv
//!     path: hosts.csv
//!     timeout: 1
//!   - type: url_csv
//!     path: sites.csv
//!     domain: example.com
//! ```

mod expand;

pub use expand::{expand_entries, ExpandWarning, Expansion};

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::Monitor;

pub const DEFAULT_FOLLOW_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Monitor at index {index} has no name")]
    MissingName { index: usize },
}

/// A monitor as written in the config file, before validation.
///
/// CSV-sourced rows are expanded into entries of this shape too, so
/// every field stays optional here and is checked by [`Monitor::from_entry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    /// Seconds; fractional values are allowed.
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl MonitorEntry {
    /// The declared type, defaulting to `url`.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("url")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowConfig {
    #[serde(default = "default_follow_interval")]
    pub interval: u64,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            interval: default_follow_interval(),
        }
    }
}

fn default_follow_interval() -> u64 {
    DEFAULT_FOLLOW_INTERVAL_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// The file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub monitors: Vec<MonitorEntry>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub follow: FollowConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Loaded configuration: CSV sources expanded, monitors validated.
#[derive(Debug, Clone)]
pub struct Config {
    pub monitors: Vec<Monitor>,
    pub ignore: Vec<String>,
    pub follow: FollowConfig,
    pub web: WebConfig,
    pub log_format: LogFormat,
    pub warnings: Vec<ExpandWarning>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let file = if is_toml {
            toml::from_str::<ConfigFile>(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<ConfigFile>(&content).map_err(|e| e.to_string())
        }
        .map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        Self::from_file(file)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                message: e.to_string(),
            })?;
        Self::from_file(file)
    }

    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        // CSV sources may be anonymous; their rows carry the names.
        for (index, entry) in file.monitors.iter().enumerate() {
            let is_source = matches!(entry.kind(), expand::PING_CSV | expand::URL_CSV);
            if !is_source && entry.name.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::MissingName { index });
            }
        }

        let Expansion { entries, warnings } = expand_entries(file.monitors);

        let monitors = entries.into_iter().map(Monitor::from_entry).collect();

        Ok(Self {
            monitors,
            ignore: file.ignore,
            follow: file.follow,
            web: file.web,
            log_format: file.log_format,
            warnings,
        })
    }

    /// Every non-fatal problem found while loading, for the caller to report.
    pub fn problems(&self) -> Vec<String> {
        let expansion = self.warnings.iter().map(ToString::to_string);
        let invalid = self.monitors.iter().filter_map(|m| {
            m.kind
                .invalid_reason()
                .map(|reason| format!("Monitor '{}' is misconfigured: {}", m.name, reason))
        });
        expansion.chain(invalid).collect()
    }

    /// Configured monitors minus those named in `ignore`.
    pub fn active_monitors(&self) -> Vec<Monitor> {
        crate::monitor::filter::remove_ignored(&self.monitors, &self.ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorKind;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml_str(
            r#"
monitors:
  - name: example
    url: http://example.com
"#,
        )
        .unwrap();
        assert_eq!(config.monitors.len(), 1);
        assert_eq!(config.monitors[0].name, "example");
        assert!(matches!(config.monitors[0].kind, MonitorKind::Url { .. }));
        assert_eq!(config.follow.interval, 5);
        assert_eq!(config.web.listen.port(), 8000);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_yaml_str(
            r#"
log_format: json
follow:
  interval: 30
web:
  listen: 127.0.0.1:9090
  static_dir: /srv/status
ignore: [old]
monitors:
  - name: site
    url: https://example.com
    timeout: 2.5
  - name: sync
    type: syncthing
    url: http://127.0.0.1:8384
    api_key: secret
  - name: gateway
    type: ping
    host: 10.0.0.1
  - name: disk
    type: command
    command: df -h
  - name: old
    url: http://old.example.com
"#,
        )
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.follow.interval, 30);
        assert_eq!(config.web.listen.port(), 9090);
        assert_eq!(config.web.static_dir, PathBuf::from("/srv/status"));
        assert_eq!(config.monitors.len(), 5);
        assert_eq!(config.monitors[0].monitor_type(), "url");
        assert_eq!(config.monitors[1].monitor_type(), "syncthing");
        assert_eq!(config.monitors[2].monitor_type(), "ping");
        assert_eq!(config.monitors[3].monitor_type(), "command");

        let active = config.active_monitors();
        assert_eq!(active.len(), 4);
        assert!(active.iter().all(|m| m.name != "old"));
    }

    #[test]
    fn ignore_filters_by_exact_name() {
        let config = Config::from_yaml_str(
            r#"
ignore: ["y"]
monitors:
  - name: x
    url: http://x.test
  - name: y
    url: http://y.test
"#,
        )
        .unwrap();
        let active = config.active_monitors();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "x");
    }

    #[test]
    fn missing_required_field_becomes_invalid_monitor() {
        let config = Config::from_yaml_str(
            r#"
monitors:
  - name: broken
    type: command
"#,
        )
        .unwrap();
        assert_eq!(config.monitors.len(), 1);
        assert!(config.monitors[0].kind.invalid_reason().is_some());
    }

    #[test]
    fn problems_cover_csv_warnings_and_invalid_monitors() {
        let config = Config::from_yaml_str(
            r#"
monitors:
  - name: broken
    type: command
  - name: fine
    url: http://fine.test
  - type: ping_csv
    path: /nonexistent/hosts.csv
"#,
        )
        .unwrap();
        let problems = config.problems();
        assert_eq!(problems.len(), 2, "{:?}", problems);
        assert!(problems[0].contains("CSV file not found"));
        assert_eq!(
            problems[1],
            "Monitor 'broken' is misconfigured: Monitor type 'command' requires 'command'"
        );
    }

    #[test]
    fn clean_config_has_no_problems() {
        let config = Config::from_yaml_str("monitors:\n  - name: a\n    url: http://a.test\n").unwrap();
        assert!(config.problems().is_empty());
    }

    #[test]
    fn rejects_monitor_without_name() {
        let err = Config::from_yaml_str(
            r#"
monitors:
  - url: http://example.com
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingName { index: 0 }));
    }

    #[test]
    fn anonymous_csv_sources_are_allowed() {
        let err = Config::from_yaml_str(
            r#"
monitors:
  - type: ping_csv
    path: /nonexistent/hosts.csv
  - type: ping
    host: 10.0.0.9
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingName { index: 1 }));
    }

    #[test]
    fn rejects_unparseable_yaml() {
        let err = Config::from_yaml_str("monitors: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Config::from_yaml_str("log_format: xml\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"), "{}", err);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reads_toml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
ignore = ["b"]

[follow]
interval = 2

[[monitors]]
name = "a"
url = "http://a.test"

[[monitors]]
name = "b"
type = "ping"
host = "10.0.0.2"
"#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.follow.interval, 2);
        assert_eq!(config.monitors.len(), 2);
        assert_eq!(config.active_monitors().len(), 1);
    }

    #[test]
    fn load_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "monitors:\n  - name: a\n    url: http://a.test\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.monitors[0].name, "a");
    }
}
