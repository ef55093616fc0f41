use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutcome, CommandRunner, ProbeError};

/// Runs commands through `sh -c` (`cmd /C` on Windows), capturing and discarding output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

fn shell(command: &str) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Exit code, or the negated signal number for a process killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutcome, ProbeError> {
        let output = shell(command).output();
        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, output).await {
                Ok(result) => result,
                Err(_) => {
                    debug!(command, "Command timed out");
                    return Ok(CommandOutcome::TimedOut);
                }
            },
            None => output.await,
        }
        .map_err(|e| ProbeError::Io(e.to_string()))?;

        let code = exit_code(output.status);
        debug!(command, code, "Command finished");
        Ok(CommandOutcome::Exited(code))
    }
}
