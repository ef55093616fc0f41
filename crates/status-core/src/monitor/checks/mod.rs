//! One check strategy per monitor type.
//!
//! Every strategy returns exactly one [`StatusRecord`]; probe failures are
//! folded into the record and never propagated.

pub mod command;
pub mod ping;
pub mod syncthing;
pub mod url;

use crate::monitor::kind::{Monitor, MonitorKind};
use crate::monitor::status::{Status, StatusRecord};
use crate::probe::Probes;

pub async fn run_check(monitor: &Monitor, probes: &Probes) -> StatusRecord {
    let name = monitor.name.as_str();
    match &monitor.kind {
        MonitorKind::Url { url, host, timeout } => {
            url::check_url(name, url, host.as_deref(), *timeout, probes.http.as_ref()).await
        }
        MonitorKind::Syncthing {
            url,
            api_key,
            host,
            timeout,
        } => {
            syncthing::check_syncthing(
                name,
                url,
                api_key,
                host.as_deref(),
                *timeout,
                probes.http.as_ref(),
            )
            .await
        }
        MonitorKind::Ping { host, timeout } => {
            ping::check_ping(name, host, *timeout, probes.ping.as_ref()).await
        }
        MonitorKind::Command {
            command,
            host,
            timeout,
        } => {
            command::check_command(name, command, host.as_deref(), *timeout, probes.command.as_ref())
                .await
        }
        MonitorKind::Unknown { type_name, target } => unknown_type(name, type_name, target),
        MonitorKind::Invalid {
            type_name,
            target,
            reason,
        } => StatusRecord::new(name, target.as_str(), Status::text(Status::ERROR), reason.as_str(), type_name.as_str()),
    }
}

pub fn unknown_type(name: &str, type_name: &str, target: &str) -> StatusRecord {
    StatusRecord::new(
        name,
        target,
        Status::text(Status::UNKNOWN_TYPE),
        format!("Monitor type '{}' is not recognized.", type_name),
        type_name,
    )
}
