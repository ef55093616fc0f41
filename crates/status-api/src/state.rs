use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use status_core::{Dispatcher, Monitor};

/// The command-line view options, echoed to the web UI by `/api/args`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewArgs {
    pub down: bool,
    pub up: bool,
    pub monitor_name: Option<String>,
    pub monitor: Vec<String>,
    pub follow: bool,
    pub interval: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// Already ignore-filtered and narrowed by the command line.
    pub monitors: Arc<Vec<Monitor>>,
    pub args: ViewArgs,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, monitors: Vec<Monitor>) -> Self {
        Self {
            dispatcher,
            monitors: Arc::new(monitors),
            args: ViewArgs::default(),
            static_dir: PathBuf::from("static"),
        }
    }

    pub fn with_args(mut self, args: ViewArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}
