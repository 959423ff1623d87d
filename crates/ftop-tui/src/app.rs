//! Dual-cadence scheduler.
//!
//! Two lines of execution share one [`Canvas`] behind a mutex:
//!
//! - the **foreground** loop (this future) captures a metric snapshot once
//!   per tick, applies pending resizes and repaints;
//! - the **decorative** task feeds hex-dump lines with their own erratic
//!   pacing and repaints after each.
//!
//! Both race their sleeps against one [`CancellationToken`], so an
//! interrupt ends either loop within a single suspension point. If the
//! decorative task stops on its own, panics included, it cancels the token
//! and the foreground follows.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use ratatui::backend::Backend;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use ftop_core::{Emission, HexStream, MetricsProvider, SnapshotBuilder};

use crate::canvas::Canvas;
use crate::input::InputSource;
use crate::tui::{TerminalGuard, TerminalMode};

/// Runtime tunables.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Metric refresh period.
    pub tick: Duration,
    /// Filesystem whose usage the DSK bar shows.
    pub disk_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            disk_path: PathBuf::from("/"),
        }
    }
}

/// Lifecycle of a dashboard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Running,
    Stopping,
    Terminated,
}

pub type SharedCanvas<B> = Arc<Mutex<Canvas<B>>>;

/// Owns the canvas, the data source and the input for one run.
pub struct App<B: Backend> {
    canvas: SharedCanvas<B>,
    snapshots: SnapshotBuilder,
    input: Box<dyn InputSource>,
    stream: Option<HexStream>,
    config: DashboardConfig,
    state: RunState,
}

impl<B> App<B>
where
    B: Backend + Send + 'static,
{
    pub fn new(
        canvas: Canvas<B>,
        provider: Box<dyn MetricsProvider>,
        input: Box<dyn InputSource>,
        stream: HexStream,
        config: DashboardConfig,
    ) -> Self {
        Self {
            canvas: Arc::new(Mutex::new(canvas)),
            snapshots: SnapshotBuilder::new(provider, config.disk_path.clone()),
            input,
            stream: Some(stream),
            config,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    #[cfg(test)]
    pub fn canvas(&self) -> SharedCanvas<B> {
        Arc::clone(&self.canvas)
    }

    fn transition(&mut self, next: RunState) {
        info!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    /// Run until `cancel` fires or an interrupt key arrives.
    ///
    /// Returns an error only when the terminal cannot be put into dashboard
    /// mode. The terminal is restored exactly once on every path out.
    pub async fn run<M: TerminalMode>(&mut self, mode: M, cancel: CancellationToken) -> Result<()> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| eyre!("dashboard already ran"))?;
        let mut guard = TerminalGuard::acquire(mode)?;

        let decorative = tokio::spawn(decorative_loop(
            Arc::clone(&self.canvas),
            stream,
            cancel.clone(),
        ));
        self.transition(RunState::Running);

        self.foreground(&cancel).await;

        self.transition(RunState::Stopping);
        cancel.cancel();
        match decorative.await {
            Ok(emitted) => debug!(emitted, "decorative task joined"),
            Err(err) if err.is_panic() => error!(error = %err, "decorative task panicked"),
            Err(err) => warn!(error = %err, "decorative task failed"),
        }
        guard.release();
        self.transition(RunState::Terminated);
        Ok(())
    }

    async fn foreground(&mut self, cancel: &CancellationToken) {
        info!(tick = ?self.config.tick, "dashboard loop started");
        while !cancel.is_cancelled() {
            let input = self.input.poll();
            if input.interrupt {
                info!("interrupt requested");
                cancel.cancel();
                break;
            }

            {
                // Layout, history reset, capture, paint: in this order
                let mut canvas = self.canvas.lock().await;
                if cancel.is_cancelled() {
                    break;
                }
                if let Some((cols, rows)) = input.resized {
                    canvas.relayout(rows, cols);
                }
                canvas.record(self.snapshots.capture());
                if let Err(err) = canvas.repaint() {
                    warn!(error = %err, "metrics repaint failed");
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.config.tick) => {}
            }
        }
        info!("dashboard loop ended");
    }
}

/// Feed decorative lines into the canvas until cancelled or the stream
/// runs dry. Returns how many lines were pushed.
///
/// However the loop ends, `cancel` is cancelled on the way out so the
/// foreground never keeps painting alone.
pub async fn decorative_loop<B, I>(
    canvas: SharedCanvas<B>,
    mut stream: I,
    cancel: CancellationToken,
) -> u64
where
    B: Backend,
    I: Iterator<Item = Emission>,
{
    let _stop_dashboard = cancel.clone().drop_guard();
    let mut emitted = 0_u64;
    let mut paint_failures = 0_u64;

    while !cancel.is_cancelled() {
        let Some(Emission { line, pacing }) = stream.next() else {
            break;
        };
        {
            let mut canvas = canvas.lock().await;
            canvas.push_decorative(line);
            if let Err(err) = canvas.repaint() {
                // Hundreds of repaints a second; warn once, then count
                if paint_failures == 0 {
                    warn!(error = %err, "decorative repaint failed");
                }
                paint_failures += 1;
            }
        }
        emitted += 1;

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(pacing.total()) => {}
        }
    }

    debug!(emitted, paint_failures, "decorative loop stopped");
    emitted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::atomic::Ordering;

    use ftop_core::{LoadAverage, NetworkCounters, ProcessReadError, ProcessRecord, Usage};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::canvas::tests::canvas;
    use crate::input::InputPoll;
    use crate::layout::DashboardLayout;
    use crate::tui::tests::CountingMode;

    struct SteadyProvider {
        sent: u64,
    }

    impl MetricsProvider for SteadyProvider {
        fn cpu_percent_aggregate(&mut self) -> f64 {
            25.0
        }

        fn cpu_percent_per_core(&mut self) -> Vec<f64> {
            vec![20.0, 30.0]
        }

        fn memory(&mut self) -> Usage {
            Usage::from_bytes(2, 8)
        }

        fn swap(&mut self) -> Usage {
            Usage::default()
        }

        fn disk_usage(&mut self, _path: &Path) -> Usage {
            Usage::from_bytes(1, 2)
        }

        fn load_averages(&mut self) -> LoadAverage {
            LoadAverage::default()
        }

        fn network_counters(&mut self) -> NetworkCounters {
            self.sent += 1_000;
            NetworkCounters {
                bytes_sent: self.sent,
                bytes_recv: 0,
            }
        }

        fn processes(&mut self) -> Vec<Result<ProcessRecord, ProcessReadError>> {
            vec![
                Ok(ProcessRecord {
                    pid: 1,
                    user: "root".into(),
                    cpu_percent: 1.0,
                    mem_percent: 0.1,
                    command: "init".into(),
                }),
                Err(ProcessReadError::Vanished { pid: 2 }),
            ]
        }
    }

    /// Replays canned polls, then reports nothing.
    struct ScriptedInput(VecDeque<InputPoll>);

    impl ScriptedInput {
        fn boxed(polls: impl IntoIterator<Item = InputPoll>) -> Box<dyn InputSource> {
            Box::new(Self(polls.into_iter().collect()))
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> InputPoll {
            self.0.pop_front().unwrap_or_default()
        }
    }

    fn interrupt() -> InputPoll {
        InputPoll {
            resized: None,
            interrupt: true,
        }
    }

    fn app(input: Box<dyn InputSource>) -> App<TestBackend> {
        App::new(
            canvas(80, 24),
            Box::new(SteadyProvider { sent: 0 }),
            input,
            HexStream::seeded(17),
            DashboardConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn two_hundred_decorative_lines_stay_bounded() {
        let shared = Arc::new(Mutex::new(canvas(80, 24)));
        let lines = HexStream::seeded(3).take(200);

        let emitted = decorative_loop(Arc::clone(&shared), lines, CancellationToken::new()).await;

        assert_eq!(emitted, 200);
        let canvas = shared.lock().await;
        assert_eq!(canvas.decorative_emitted(), 200);
        assert_eq!(canvas.hex_window().len(), canvas.hex_window().capacity());
        assert_eq!(canvas.hex_window().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn decorative_loop_stops_on_cancel() {
        let shared = Arc::new(Mutex::new(canvas(80, 24)));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(decorative_loop(
            Arc::clone(&shared),
            HexStream::seeded(9),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(2)).await;
        cancel.cancel();
        let emitted = task.await.unwrap();

        assert!(emitted > 0);
        assert_eq!(shared.lock().await.decorative_emitted(), emitted);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_stream_stops_the_dashboard() {
        let shared = Arc::new(Mutex::new(canvas(80, 24)));
        let cancel = CancellationToken::new();

        let emitted = decorative_loop(shared, HexStream::seeded(2).take(4), cancel.clone()).await;

        assert_eq!(emitted, 4);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn decorative_panic_stops_the_dashboard() {
        let shared = Arc::new(Mutex::new(canvas(80, 24)));
        let cancel = CancellationToken::new();
        let lines = HexStream::seeded(4).enumerate().map(|(i, emission)| {
            assert!(i < 3, "hex source broke");
            emission
        });

        let err = tokio::spawn(decorative_loop(Arc::clone(&shared), lines, cancel.clone()))
            .await
            .unwrap_err();

        assert!(err.is_panic());
        assert!(cancel.is_cancelled());
        // Lines pushed before the failure stay on the canvas
        assert_eq!(shared.lock().await.decorative_emitted(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_key_terminates_and_restores_once() {
        let mode = CountingMode::default();
        let mut app = app(ScriptedInput::boxed([
            InputPoll::default(),
            InputPoll::default(),
            interrupt(),
        ]));

        app.run(mode.clone(), CancellationToken::new()).await.unwrap();

        assert_eq!(app.state(), RunState::Terminated);
        assert_eq!(mode.restore_count(), 1);
        let canvas = app.canvas();
        let canvas = canvas.lock().await;
        assert_eq!(canvas.histories().cpu.len(), 2);
        assert_eq!(canvas.latest().unwrap().skipped_processes, 1);
        assert!(canvas.decorative_emitted() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn external_cancel_terminates_and_restores_once() {
        let mode = CountingMode::default();
        let mut app = app(ScriptedInput::boxed([]));
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            stopper.cancel();
        });

        app.run(mode.clone(), cancel).await.unwrap();

        assert_eq!(app.state(), RunState::Terminated);
        assert_eq!(mode.restore_count(), 1);
        assert_eq!(mode.entered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resize_relayouts_before_capture() {
        let mut app = app(ScriptedInput::boxed([
            InputPoll {
                resized: Some((100, 30)),
                interrupt: false,
            },
            interrupt(),
        ]));

        app.run(CountingMode::default(), CancellationToken::new())
            .await
            .unwrap();

        let canvas = app.canvas();
        let canvas = canvas.lock().await;
        assert_eq!(canvas.layout(), &DashboardLayout::compute(30, 100));
        // Reset happened first, so the tick's sample is the only one
        assert_eq!(canvas.histories().cpu.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_terminal_acquisition_is_returned() {
        let mode = CountingMode {
            fail_enter: true,
            ..CountingMode::default()
        };
        let mut app = app(ScriptedInput::boxed([]));

        assert!(app.run(mode.clone(), CancellationToken::new()).await.is_err());
        assert_eq!(app.state(), RunState::Init);
        assert_eq!(mode.restore_count(), 1);
    }
}
