mod render;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};
use console::Term;
use tracing_subscriber::{fmt, EnvFilter};

use status_api::{AppState, ViewArgs};
use status_core::{
    filter_by_state, select_monitors, Config, Dispatcher, LogFormat, Monitor, Probes,
    StateFilter, StatusRecord,
};

/// Check the status of URLs, hosts, Syncthing instances and commands.
#[derive(Debug, Parser)]
#[command(name = "status", version, about)]
#[command(group(ArgGroup::new("state").args(["down", "up"])))]
#[command(group(ArgGroup::new("mode").args(["console", "follow", "web"])))]
struct Cli {
    /// Check a single monitor by name.
    #[arg(value_name = "MONITOR_NAME", conflicts_with = "monitor")]
    monitor_name: Option<String>,

    /// Only check monitors of this type. Repeatable.
    #[arg(short, long, value_name = "TYPE")]
    monitor: Vec<String>,

    /// Only show monitors that are down.
    #[arg(short, long)]
    down: bool,

    /// Only show monitors that are up.
    #[arg(short, long)]
    up: bool,

    /// Run one round and print it (the default).
    #[arg(short, long)]
    console: bool,

    /// Re-run rounds until interrupted.
    #[arg(short, long)]
    follow: bool,

    /// Serve the status API and web page.
    #[arg(short, long)]
    web: bool,

    /// Seconds between follow rounds. Overrides `follow.interval`.
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Path to the YAML (or `.toml`) config file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Listen address in web mode. Overrides `web.listen`.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Console,
    Follow,
    Web,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.follow {
            Mode::Follow
        } else if self.web {
            Mode::Web
        } else {
            Mode::Console
        }
    }

    fn state_filter(&self) -> Option<StateFilter> {
        if self.down {
            Some(StateFilter::Down)
        } else if self.up {
            Some(StateFilter::Up)
        } else {
            None
        }
    }

    fn view_args(&self, interval: u64) -> ViewArgs {
        ViewArgs {
            down: self.down,
            up: self.up,
            monitor_name: self.monitor_name.clone(),
            monitor: self.monitor.clone(),
            follow: self.follow,
            interval,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = cli.mode();
    let default_level = if mode == Mode::Web { "info" } else { "warn" };

    let config = match Config::load(&cli.config) {
        Ok(c) => {
            init_tracing(c.log_format, default_level);
            tracing::info!(path = %cli.config.display(), monitors = c.monitors.len(), "Loaded config file");
            c
        }
        Err(e) => {
            init_tracing(LogFormat::Pretty, default_level);
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    report_config_problems(&config);

    let monitors = select_monitors(
        &config.active_monitors(),
        cli.monitor_name.as_deref(),
        &cli.monitor,
    );
    if monitors.is_empty() {
        tracing::warn!("No monitors match the selection");
    }

    let dispatcher = match Probes::system() {
        Ok(probes) => Dispatcher::new(probes),
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up probes");
            return ExitCode::FAILURE;
        }
    };

    let interval = cli.interval.unwrap_or(config.follow.interval).max(1);

    match mode {
        Mode::Console => run_console(&cli, &dispatcher, &monitors).await,
        Mode::Follow => run_follow(&cli, &dispatcher, &monitors, interval).await,
        Mode::Web => {
            let listen = cli.listen.unwrap_or(config.web.listen);
            let state = AppState::new(dispatcher, monitors)
                .with_args(cli.view_args(interval))
                .with_static_dir(config.web.static_dir.clone());
            run_web(listen, state).await
        }
    }
}

/// Load-time problems are returned by the loader and reported once logging is up.
fn report_config_problems(config: &Config) {
    for problem in config.problems() {
        tracing::warn!("{}", problem);
    }
}

async fn run_console(cli: &Cli, dispatcher: &Dispatcher, monitors: &[Monitor]) -> ExitCode {
    let records = dispatcher.dispatch_sorted(monitors).await;
    let records = filter_by_state(records, cli.state_filter());
    print_records(&records, cli.output)
}

async fn run_follow(
    cli: &Cli,
    dispatcher: &Dispatcher,
    monitors: &[Monitor],
    interval: u64,
) -> ExitCode {
    let term = Term::stdout();
    let state = cli.state_filter();
    let output = cli.output;
    let mut round = 0u64;

    let rounds = dispatcher.follow(monitors, Duration::from_secs(interval), |records| {
        round += 1;
        if round > 1 {
            term.clear_screen().ok();
        }
        let records = filter_by_state(records, state);
        print_records(&records, output);
    });

    tokio::select! {
        _ = rounds => {}
        _ = status_api::shutdown_signal() => {
            tracing::info!("Follow mode stopped");
        }
    }
    ExitCode::SUCCESS
}

async fn run_web(listen: SocketAddr, state: AppState) -> ExitCode {
    tracing::info!(%listen, "Starting status web server");
    if let Err(e) = status_api::serve_with_state(listen, state, status_api::shutdown_signal()).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_records(records: &[StatusRecord], output: OutputFormat) -> ExitCode {
    match output {
        OutputFormat::Json => match render::render_json(records) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize records");
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => {
            for line in render::render_text(records, render::terminal_width()) {
                println!("{}", line);
            }
        }
    }
    ExitCode::SUCCESS
}

fn init_tracing(log_format: LogFormat, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_format {
        LogFormat::Json => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
