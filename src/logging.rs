//! Structured logging initialization for the coach CLI.
//!
//! Logs always go to stderr so stdout stays reserved for command results.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogStyle {
    /// JSON lines, for robot mode.
    Json,
    /// Colored, for an interactive terminal.
    Pretty,
    /// Compact and without ANSI, for pipes and files.
    Plain,
}

impl LogStyle {
    const fn select(robot_mode: bool, stderr_is_tty: bool) -> Self {
        if robot_mode {
            Self::Json
        } else if stderr_is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }
}

/// Filter directive for the given verbosity flags.
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "coach=error";
    }
    match verbose {
        0 => "coach=info",
        1 => "coach=debug",
        _ => "coach=trace",
    }
}

/// Initialize the tracing subscriber from CLI flags.
///
/// `RUST_LOG` replaces the verbosity-derived filter when set
/// (e.g. `coach=debug,rusqlite=warn`). Calling this twice is harmless; the
/// first subscriber stays installed.
///
/// | Mode  | TTY | Output              |
/// |-------|-----|---------------------|
/// | Robot | any | JSON lines          |
/// | Human | yes | Pretty colored      |
/// | Human | no  | Compact, no ANSI    |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match LogStyle::select(robot_mode, io::stderr().is_terminal()) {
        LogStyle::Json => registry.with(layer.json().with_target(true)).try_init(),
        LogStyle::Pretty => registry.with(layer.with_target(false)).try_init(),
        LogStyle::Plain => registry
            .with(layer.with_ansi(false).with_target(false).compact())
            .try_init(),
    };
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Subscriber already installed");
    }
}
