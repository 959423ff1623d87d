// ── Metric snapshots ──
//
// One `Snapshot` per slow tick, built from a single pass over the metrics
// provider. Network counters are cumulative, so the builder retains the
// previous reading and derives per-second rates from the delta.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::trace;

use crate::provider::{LoadAverage, MetricsProvider, NetworkCounters, ProcessRecord, Usage};

/// Per-second network throughput.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkRates {
    pub sent_per_sec: f64,
    pub recv_per_sec: f64,
}

/// A process row as shown in the process panel.
pub type ProcessEntry = ProcessRecord;

/// Everything measured at one instant. Superseded, never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: Instant,
    pub wall_time: DateTime<Local>,
    pub cpu_percent: f64,
    pub per_core: Vec<f64>,
    pub memory: Usage,
    pub swap: Usage,
    pub disk: Usage,
    pub load: LoadAverage,
    pub network: NetworkRates,
    /// Sorted by CPU% descending.
    pub processes: Vec<ProcessEntry>,
    /// Processes that could not be read this tick.
    pub skipped_processes: usize,
}

#[derive(Debug, Clone, Copy)]
struct CounterState {
    counters: NetworkCounters,
    at: Instant,
}

/// Captures snapshots from a provider, keeping the last counter reading.
pub struct SnapshotBuilder {
    provider: Box<dyn MetricsProvider>,
    disk_path: PathBuf,
    previous: Option<CounterState>,
}

impl SnapshotBuilder {
    pub fn new(provider: Box<dyn MetricsProvider>, disk_path: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            disk_path: disk_path.into(),
            previous: None,
        }
    }

    pub fn capture(&mut self) -> Snapshot {
        self.capture_at(Instant::now())
    }

    /// Capture with an explicit monotonic timestamp for the rate delta.
    pub fn capture_at(&mut self, now: Instant) -> Snapshot {
        let per_core = self.provider.cpu_percent_per_core();
        let cpu_percent = if per_core.is_empty() {
            round_tenth(self.provider.cpu_percent_aggregate())
        } else {
            mean_percent(&per_core)
        };
        let memory = self.provider.memory();
        let swap = self.provider.swap();
        let disk = self.provider.disk_usage(&self.disk_path);
        let load = self.provider.load_averages();

        let counters = self.provider.network_counters();
        let network = self.rates(counters, now);
        self.previous = Some(CounterState { counters, at: now });

        let mut processes = Vec::new();
        let mut skipped_processes = 0;
        for read in self.provider.processes() {
            match read {
                Ok(record) => processes.push(record),
                Err(err) => {
                    trace!(pid = err.pid(), error = %err, "skipping unreadable process");
                    skipped_processes += 1;
                }
            }
        }
        // Stable: equal CPU keeps enumeration order
        processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));

        Snapshot {
            taken_at: now,
            wall_time: Local::now(),
            cpu_percent,
            per_core,
            memory,
            swap,
            disk,
            load,
            network,
            processes,
            skipped_processes,
        }
    }

    fn rates(&self, current: NetworkCounters, now: Instant) -> NetworkRates {
        let Some(prev) = self.previous else {
            return NetworkRates::default();
        };
        let elapsed = now
            .checked_duration_since(prev.at)
            .map_or(0.0, |d| d.as_secs_f64());
        if elapsed <= 0.0 {
            return NetworkRates::default();
        }
        NetworkRates {
            sent_per_sec: per_second(current.bytes_sent, prev.counters.bytes_sent, elapsed),
            recv_per_sec: per_second(current.bytes_recv, prev.counters.bytes_recv, elapsed),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn per_second(current: u64, previous: u64, elapsed_secs: f64) -> f64 {
    // A counter that went backwards (interface reset) reads as idle
    current.saturating_sub(previous) as f64 / elapsed_secs
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mean_percent(per_core: &[f64]) -> f64 {
    let sum: f64 = per_core.iter().sum();
    round_tenth(sum / per_core.len() as f64)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ProcessReadError;

    #[derive(Default)]
    struct Script {
        per_core: Vec<f64>,
        aggregate: f64,
        counters: NetworkCounters,
        processes: Vec<Result<ProcessRecord, ProcessReadError>>,
    }

    /// Fake provider whose readings the test can change between captures.
    struct FakeProvider(Arc<Mutex<Script>>);

    impl MetricsProvider for FakeProvider {
        fn cpu_percent_aggregate(&mut self) -> f64 {
            self.0.lock().unwrap().aggregate
        }
        fn cpu_percent_per_core(&mut self) -> Vec<f64> {
            self.0.lock().unwrap().per_core.clone()
        }
        fn memory(&mut self) -> Usage {
            Usage::from_bytes(4, 16)
        }
        fn swap(&mut self) -> Usage {
            Usage::from_bytes(0, 0)
        }
        fn disk_usage(&mut self, _path: &Path) -> Usage {
            Usage::from_bytes(50, 100)
        }
        fn load_averages(&mut self) -> LoadAverage {
            LoadAverage {
                one: 0.5,
                five: 0.4,
                fifteen: 0.3,
            }
        }
        fn network_counters(&mut self) -> NetworkCounters {
            self.0.lock().unwrap().counters
        }
        fn processes(&mut self) -> Vec<Result<ProcessRecord, ProcessReadError>> {
            self.0.lock().unwrap().processes.clone()
        }
    }

    fn builder() -> (SnapshotBuilder, Arc<Mutex<Script>>) {
        let script = Arc::new(Mutex::new(Script::default()));
        let builder = SnapshotBuilder::new(Box::new(FakeProvider(script.clone())), "/");
        (builder, script)
    }

    fn proc(pid: u32, cpu: f64) -> ProcessRecord {
        ProcessRecord {
            pid,
            user: "root".into(),
            cpu_percent: cpu,
            mem_percent: 1.0,
            command: format!("proc-{pid}"),
        }
    }

    #[test]
    fn first_capture_has_zero_rates() {
        let (mut builder, script) = builder();
        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 5_000,
            bytes_recv: 9_000,
        };
        let snap = builder.capture_at(Instant::now());
        assert_eq!(snap.network, NetworkRates::default());
    }

    #[test]
    fn rates_are_counter_delta_per_second() {
        let (mut builder, script) = builder();
        let t0 = Instant::now();
        builder.capture_at(t0);

        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 2_000,
            bytes_recv: 8_000,
        };
        let snap = builder.capture_at(t0 + Duration::from_secs(2));
        assert_eq!(snap.network.sent_per_sec, 1_000.0);
        assert_eq!(snap.network.recv_per_sec, 4_000.0);
    }

    #[test]
    fn zero_elapsed_gives_zero_rates() {
        let (mut builder, script) = builder();
        let t0 = Instant::now();
        builder.capture_at(t0);
        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 1_000_000,
            bytes_recv: 1_000_000,
        };
        let snap = builder.capture_at(t0);
        assert_eq!(snap.network, NetworkRates::default());
    }

    #[test]
    fn clock_going_backwards_gives_zero_rates() {
        let (mut builder, script) = builder();
        let t0 = Instant::now() + Duration::from_secs(10);
        builder.capture_at(t0);
        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 10,
            bytes_recv: 10,
        };
        let snap = builder.capture_at(t0 - Duration::from_secs(5));
        assert_eq!(snap.network, NetworkRates::default());
    }

    #[test]
    fn counter_reset_never_goes_negative() {
        let (mut builder, script) = builder();
        let t0 = Instant::now();
        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 10_000,
            bytes_recv: 10_000,
        };
        builder.capture_at(t0);
        script.lock().unwrap().counters = NetworkCounters {
            bytes_sent: 100,
            bytes_recv: 20_000,
        };
        let snap = builder.capture_at(t0 + Duration::from_secs(1));
        assert_eq!(snap.network.sent_per_sec, 0.0);
        assert_eq!(snap.network.recv_per_sec, 10_000.0);
    }

    #[test]
    fn processes_sorted_by_cpu_descending() {
        let (mut builder, script) = builder();
        script.lock().unwrap().processes =
            vec![Ok(proc(1, 10.0)), Ok(proc(2, 55.2)), Ok(proc(3, 0.0))];
        let snap = builder.capture();
        let cpus: Vec<f64> = snap.processes.iter().map(|p| p.cpu_percent).collect();
        assert_eq!(cpus, vec![55.2, 10.0, 0.0]);
    }

    #[test]
    fn equal_cpu_keeps_enumeration_order() {
        let (mut builder, script) = builder();
        script.lock().unwrap().processes =
            vec![Ok(proc(7, 1.0)), Ok(proc(3, 1.0)), Ok(proc(9, 2.0))];
        let snap = builder.capture();
        let pids: Vec<u32> = snap.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![9, 7, 3]);
    }

    #[test]
    fn unreadable_processes_are_omitted() {
        let (mut builder, script) = builder();
        script.lock().unwrap().processes = vec![
            Ok(proc(1, 3.0)),
            Err(ProcessReadError::Vanished { pid: 2 }),
            Err(ProcessReadError::AccessDenied { pid: 3 }),
            Ok(proc(4, 1.0)),
            Err(ProcessReadError::Zombie { pid: 5 }),
        ];
        let snap = builder.capture();
        let pids: Vec<u32> = snap.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1, 4]);
        assert_eq!(snap.skipped_processes, 3);
    }

    #[test]
    fn aggregate_cpu_is_rounded_core_mean() {
        let (mut builder, script) = builder();
        script.lock().unwrap().per_core = vec![10.0, 20.0, 33.33];
        let snap = builder.capture();
        assert_eq!(snap.cpu_percent, 21.1);
        assert_eq!(snap.per_core.len(), 3);
    }

    #[test]
    fn aggregate_falls_back_without_cores() {
        let (mut builder, script) = builder();
        script.lock().unwrap().aggregate = 42.26;
        let snap = builder.capture();
        assert_eq!(snap.cpu_percent, 42.3);
    }

    #[test]
    fn usage_fields_come_from_provider() {
        let (mut builder, _script) = builder();
        let snap = builder.capture();
        assert_eq!(snap.memory.percent, 25.0);
        assert_eq!(snap.disk.percent, 50.0);
        assert_eq!(snap.swap.percent, 0.0);
        assert_eq!(snap.load.one, 0.5);
    }
}
