//! Expansion of `ping_csv` / `url_csv` entries into individual monitors.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::debug;

use super::MonitorEntry;

pub const PING_CSV: &str = "ping_csv";
pub const URL_CSV: &str = "url_csv";

/// A non-fatal problem found while expanding a CSV source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandWarning {
    #[error("CSV source '{name}' has no path")]
    MissingPath { name: String },
    #[error("CSV file not found at {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("Error reading CSV file {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },
    #[error("Skipping row {line} in {}: {reason}", path.display())]
    SkippedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub entries: Vec<MonitorEntry>,
    pub warnings: Vec<ExpandWarning>,
}

/// Replace every CSV-sourced entry with the monitors its file describes.
///
/// Non-CSV entries keep their order; expanded monitors follow them in source order.
/// Problems are returned, not logged.
pub fn expand_entries(entries: Vec<MonitorEntry>) -> Expansion {
    let mut kept = Vec::with_capacity(entries.len());
    let mut expanded = Vec::new();
    let mut warnings = Vec::new();

    for entry in entries {
        match entry.kind() {
            PING_CSV => expanded.extend(load_ping_monitors(&entry, &mut warnings)),
            URL_CSV => expanded.extend(load_url_monitors(&entry, &mut warnings)),
            _ => kept.push(entry),
        }
    }

    kept.extend(expanded);
    Expansion {
        entries: kept,
        warnings,
    }
}

struct CsvRow {
    line: u64,
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// A column's value, treating empty cells as absent.
    fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn read_rows(path: &Path) -> Result<Vec<CsvRow>, ExpandWarning> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExpandWarning::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ExpandWarning::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let read_failed = |e: csv::Error| ExpandWarning::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    let headers = reader.headers().map_err(read_failed)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_failed)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        rows.push(CsvRow { line, fields });
    }
    debug!(path = %path.display(), rows = rows.len(), "Read CSV source");
    Ok(rows)
}

fn source_rows(parent: &MonitorEntry, warnings: &mut Vec<ExpandWarning>) -> Option<(PathBuf, Vec<CsvRow>)> {
    let Some(path) = parent.path.clone() else {
        warnings.push(ExpandWarning::MissingPath {
            name: parent.name().to_string(),
        });
        return None;
    };
    match read_rows(&path) {
        Ok(rows) => Some((path, rows)),
        Err(w) => {
            warnings.push(w);
            None
        }
    }
}

/// Fill every field the row left unset from the parent CSV entry.
///
/// `type` and `path` are never inherited; `domain` only when `inherit_domain`.
fn inherit(mut child: MonitorEntry, parent: &MonitorEntry, inherit_domain: bool) -> MonitorEntry {
    fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
        if slot.is_none() {
            slot.clone_from(from);
        }
    }
    fill(&mut child.name, &parent.name);
    fill(&mut child.url, &parent.url);
    fill(&mut child.host, &parent.host);
    fill(&mut child.api_key, &parent.api_key);
    fill(&mut child.command, &parent.command);
    fill(&mut child.timeout, &parent.timeout);
    if inherit_domain {
        fill(&mut child.domain, &parent.domain);
    }
    child
}

fn skipped(path: &Path, row: &CsvRow, reason: &str) -> ExpandWarning {
    ExpandWarning::SkippedRow {
        path: path.to_path_buf(),
        line: row.line,
        reason: reason.to_string(),
    }
}

fn load_ping_monitors(parent: &MonitorEntry, warnings: &mut Vec<ExpandWarning>) -> Vec<MonitorEntry> {
    let Some((path, rows)) = source_rows(parent, warnings) else {
        return Vec::new();
    };

    let mut monitors = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(name) = row.get("name") else {
            warnings.push(skipped(&path, row, "missing 'name' column"));
            continue;
        };
        let Some(host) = row.get("host").or_else(|| row.get("ip")) else {
            warnings.push(skipped(&path, row, "missing 'host' or 'ip' column"));
            continue;
        };
        let child = MonitorEntry {
            name: Some(name.to_string()),
            kind: Some("ping".into()),
            host: Some(host.to_string()),
            ..Default::default()
        };
        monitors.push(inherit(child, parent, true));
    }
    monitors
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn load_url_monitors(parent: &MonitorEntry, warnings: &mut Vec<ExpandWarning>) -> Vec<MonitorEntry> {
    let Some((path, rows)) = source_rows(parent, warnings) else {
        return Vec::new();
    };

    let mut monitors = Vec::with_capacity(rows.len());
    for row in &rows {
        let subdomain = row.get("name").or_else(|| row.get("subdomain"));

        let url = match row.get("url") {
            Some(url) => url.to_string(),
            None => {
                let domain = row.get("domain").or(parent.domain.as_deref());
                let (Some(subdomain), Some(domain)) = (subdomain, domain) else {
                    warnings.push(skipped(&path, row, "missing 'subdomain' or 'domain' column"));
                    continue;
                };
                let scheme = if row.get("ssl").is_some_and(is_truthy) {
                    "https"
                } else {
                    "http"
                };
                format!("{}://{}.{}", scheme, subdomain, domain)
            }
        };

        // A row without a name is known by its subdomain.
        let Some(name) = subdomain else {
            warnings.push(skipped(&path, row, "missing 'name' column"));
            continue;
        };

        let child = MonitorEntry {
            name: Some(name.to_string()),
            kind: Some("url".into()),
            url: Some(url),
            ..Default::default()
        };
        monitors.push(inherit(child, parent, false));
    }
    monitors
}
