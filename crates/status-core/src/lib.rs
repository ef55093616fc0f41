#![forbid(unsafe_code)]

pub mod config;
pub mod monitor;
pub mod probe;

pub use config::{Config, ConfigError, ExpandWarning, LogFormat, MonitorEntry};
pub use monitor::{
    filter_by_state, is_up, partition, remove_ignored, select_monitors, sort_by_type, Dispatcher,
    Monitor, MonitorKind, StateFilter, Status, StatusRecord,
};
pub use probe::{
    CommandOutcome, CommandRunner, HttpProbe, HttpRequest, HttpResponse, PingReply, Pinger,
    ProbeError, Probes,
};
