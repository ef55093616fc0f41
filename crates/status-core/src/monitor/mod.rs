pub mod checks;
pub mod engine;
pub mod filter;
pub mod kind;
pub mod status;

pub use engine::Dispatcher;
pub use filter::{filter_by_state, partition, remove_ignored, select_monitors, StateFilter};
pub use kind::{Monitor, MonitorKind, DEFAULT_HTTP_TIMEOUT, DEFAULT_PING_TIMEOUT};
pub use status::{is_up, sort_by_type, Status, StatusRecord};
