use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kind::Monitor;
use super::status::StatusRecord;

/// Narrow a result set to monitors that are up, or to those that are down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateFilter {
    Up,
    Down,
}

impl StateFilter {
    pub fn matches(self, record: &StatusRecord) -> bool {
        match self {
            Self::Up => record.is_up(),
            Self::Down => !record.is_up(),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl FromStr for StateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!(
                "Invalid status filter '{}': must be 'up' or 'down'",
                other
            )),
        }
    }
}

pub fn filter_by_state(records: Vec<StatusRecord>, state: Option<StateFilter>) -> Vec<StatusRecord> {
    match state {
        Some(state) => records.into_iter().filter(|r| state.matches(r)).collect(),
        None => records,
    }
}

/// Split records into `(up, down)`, keeping relative order.
pub fn partition(records: Vec<StatusRecord>) -> (Vec<StatusRecord>, Vec<StatusRecord>) {
    records.into_iter().partition(StatusRecord::is_up)
}

/// Monitors matching `name` exactly (when given) whose type is in `types` (when non-empty).
pub fn select_monitors(monitors: &[Monitor], name: Option<&str>, types: &[String]) -> Vec<Monitor> {
    monitors
        .iter()
        .filter(|m| name.is_none_or(|n| m.name == n))
        .filter(|m| types.is_empty() || types.iter().any(|t| t == m.monitor_type()))
        .cloned()
        .collect()
}

pub fn remove_ignored(monitors: &[Monitor], ignore: &[String]) -> Vec<Monitor> {
    monitors
        .iter()
        .filter(|m| !ignore.contains(&m.name))
        .cloned()
        .collect()
}
