//! Terminal mode switching, exactly-once restoration and panic-safe cleanup.
//!
//! [`TerminalGuard`] owns the "terminal is in dashboard mode" fact. It is
//! released explicitly on every normal shutdown path and, failing that,
//! on drop; either way restoration runs once. The panic hook shares the
//! same once-only switch, so a panic followed by an orderly shutdown does
//! not restore twice.

use std::io::{Stdout, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error, warn};

pub type Backend = CrosstermBackend<Stdout>;

/// Set while stdout may be in dashboard mode.
static STDOUT_IN_DASHBOARD: AtomicBool = AtomicBool::new(false);

fn mark_dashboard_mode() {
    STDOUT_IN_DASHBOARD.store(true, Ordering::SeqCst);
}

/// True for exactly one caller after each [`mark_dashboard_mode`].
fn take_restore_duty() -> bool {
    STDOUT_IN_DASHBOARD.swap(false, Ordering::SeqCst)
}

/// Build the production terminal. Does not change terminal modes.
pub fn terminal() -> Result<Terminal<Backend>> {
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

/// Switches the terminal into and out of dashboard mode.
pub trait TerminalMode: Send {
    /// Raw input, alternate screen, hidden cursor.
    fn enter(&mut self) -> Result<()>;
    /// Undo [`enter`](Self::enter). Best effort; must not panic.
    fn restore(&mut self);
}

/// The real terminal, via crossterm.
#[derive(Debug, Default)]
pub struct CrosstermMode;

impl TerminalMode for CrosstermMode {
    fn enter(&mut self) -> Result<()> {
        // Marked first: a half-finished enter still needs undoing
        mark_dashboard_mode();
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(cursor::Hide)?;
        Ok(())
    }

    fn restore(&mut self) {
        restore_stdout();
    }
}

fn restore_stdout() {
    if !take_restore_duty() {
        return;
    }
    // Keep going on partial failures
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Holds the terminal in dashboard mode until released or dropped.
pub struct TerminalGuard<M: TerminalMode> {
    mode: M,
    active: bool,
}

impl<M: TerminalMode> TerminalGuard<M> {
    /// Enter dashboard mode. If entering fails half way, whatever was
    /// switched is restored before the error is returned.
    pub fn acquire(mut mode: M) -> Result<Self> {
        if let Err(err) = mode.enter() {
            warn!(error = %err, "entering terminal mode failed");
            mode.restore();
            return Err(err);
        }
        debug!("terminal mode entered");
        Ok(Self { mode, active: true })
    }

    /// Restore the terminal. Later calls are no-ops.
    pub fn release(&mut self) {
        if self.active {
            self.active = false;
            self.mode.restore();
            debug!("terminal mode restored");
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<M: TerminalMode> Drop for TerminalGuard<M> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Route error reports through color-eyre and make every panic leave the
/// dashboard before its report is printed.
///
/// Call before [`TerminalGuard::acquire`]; until then restoring is a no-op.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let report_panic = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        // The log file keeps a copy; the screen report may scroll away
        error!(panic = %info, "panic");
        restore_stdout();
        report_panic(info);
    }));
    Ok(())
}
