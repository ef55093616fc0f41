use std::time::Duration;

use crate::monitor::status::{Status, StatusRecord};
use crate::probe::{CommandOutcome, CommandRunner};

pub const MONITOR_TYPE: &str = "command";

/// The command line actually run: wrapped in `ssh` when a host is given.
pub fn compose(command: &str, host: Option<&str>) -> String {
    match host {
        Some(host) => format!("ssh {} '{}'", host, command),
        None => command.to_string(),
    }
}

pub async fn check_command(
    name: &str,
    command: &str,
    host: Option<&str>,
    timeout: Option<Duration>,
    runner: &dyn CommandRunner,
) -> StatusRecord {
    let command = compose(command, host);
    let (status, message) = match runner.run(&command, timeout).await {
        Ok(CommandOutcome::Exited(0)) => (Status::ok(), "Exit code: 0".to_string()),
        Ok(CommandOutcome::Exited(code)) => (Status::text(Status::DOWN), format!("Exit code: {}", code)),
        Ok(CommandOutcome::TimedOut) => (Status::text(Status::TIMEOUT), String::new()),
        Err(e) => (Status::text(Status::ERROR), e.to_string()),
    };
    StatusRecord::new(name, command, status, message, MONITOR_TYPE)
}
