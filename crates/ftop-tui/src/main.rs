//! `ftop`: full-screen host telemetry with a decorative hex dump.
//!
//! The top band shows host identity, the middle splits into usage bars with
//! sparkline history and a CPU-sorted process table, and the bottom scrolls
//! random hex-dump lines at their own erratic pace. Metrics refresh once a
//! second and keys are read on that same tick; the hex dump runs in a
//! separate task that shares the canvas.
//!
//! Logs are written to a file (default `/tmp/ftop.log`) to avoid corrupting
//! the terminal UI. Ctrl-C or `q` quits.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod app;
mod canvas;
mod input;
mod layout;
mod panels;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ftop_core::{HexStream, PlatformProvider, SysinfoProvider};

use crate::app::{App, DashboardConfig};
use crate::canvas::Canvas;
use crate::input::TerminalInput;
use crate::tui::CrosstermMode;

/// Terminal dashboard for host telemetry.
#[derive(Parser, Debug)]
#[command(name = "ftop", version, about)]
struct Cli {
    /// Log file path (defaults to /tmp/ftop.log)
    #[arg(long, default_value = "/tmp/ftop.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Filter used when `RUST_LOG` is unset: both crates at the `-v` level.
fn default_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("ftop={level},ftop_core={level}")
}

/// Split the log path for the appender. A bare file name lives in the
/// working directory.
fn log_location(path: &Path) -> (&Path, &OsStr) {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file = path.file_name().unwrap_or(OsStr::new("ftop.log"));
    (dir, file)
}

/// Log to a file only; the terminal belongs to the dashboard. Keep the
/// returned guard alive until exit or buffered lines are lost.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(cli.verbose)));

    let (dir, file) = log_location(&cli.log_file);
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = DashboardConfig::default();
    let host = SysinfoProvider::new();
    let platform = host.platform();
    info!(
        os = %platform.os,
        host = %platform.host,
        cores = platform.cores,
        "starting ftop"
    );

    let cancel = CancellationToken::new();
    let canvas = Canvas::new(tui::terminal()?, platform)?;
    let mut app = App::new(
        canvas,
        Box::new(host),
        Box::new(TerminalInput),
        HexStream::from_entropy(),
        config,
    );

    // SIGINT is raced here rather than in a task of its own
    {
        let run = app.run(CrosstermMode, cancel.clone());
        tokio::pin!(run);
        tokio::select! {
            result = &mut run => result?,
            Ok(()) = tokio::signal::ctrl_c() => {
                info!("interrupt signal received");
                cancel.cancel();
                run.await?;
            }
        }
    }

    info!(state = ?app.state(), "ftop exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn verbosity_raises_both_crates() {
        assert_eq!(default_directives(0), "ftop=warn,ftop_core=warn");
        assert_eq!(default_directives(2), "ftop=debug,ftop_core=debug");
        assert_eq!(default_directives(9), "ftop=trace,ftop_core=trace");
    }

    #[test]
    fn log_location_splits_path() {
        assert_eq!(
            log_location(Path::new("/var/log/ftop/run.log")),
            (Path::new("/var/log/ftop"), OsStr::new("run.log"))
        );
        assert_eq!(
            log_location(Path::new("ftop.log")),
            (Path::new("."), OsStr::new("ftop.log"))
        );
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["ftop", "-vv"]);
        assert_eq!(cli.log_file, PathBuf::from("/tmp/ftop.log"));
        assert_eq!(cli.verbose, 2);
    }
}
