mod http;
mod ping;
mod process;

pub use http::ReqwestProbe;
pub use ping::SurgePinger;
pub use process::ShellRunner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Resolve(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Body(String),
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub read_body: bool,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout,
            read_body: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self) -> Self {
        self.read_body = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Present only when the request asked for it.
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingReply {
    pub alive: bool,
    pub rtt: Option<Duration>,
}

impl PingReply {
    pub fn alive(rtt: Duration) -> Self {
        Self {
            alive: true,
            rtt: Some(rtt),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            alive: false,
            rtt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Exited(i32),
    TimedOut,
}

/// Issues HTTP GET requests. Timeouts surface as [`ProbeError::Timeout`].
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, ProbeError>;
}

/// Sends a single ICMP echo. A missing reply is `Ok` with `alive == false`.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, host: &str, timeout: Duration) -> Result<PingReply, ProbeError>;
}

/// Runs a command line through the platform shell.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutcome, ProbeError>;
}

/// The I/O capabilities a dispatch round shares across all of its checks.
#[derive(Clone)]
pub struct Probes {
    pub http: Arc<dyn HttpProbe>,
    pub ping: Arc<dyn Pinger>,
    pub command: Arc<dyn CommandRunner>,
}

impl Probes {
    pub fn new(
        http: Arc<dyn HttpProbe>,
        ping: Arc<dyn Pinger>,
        command: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            http,
            ping,
            command,
        }
    }

    /// Production probes: a pooled reqwest client, unprivileged ICMP, `sh -c`.
    pub fn system() -> Result<Self, ProbeError> {
        Ok(Self::new(
            Arc::new(ReqwestProbe::new()?),
            Arc::new(SurgePinger),
            Arc::new(ShellRunner),
        ))
    }
}
