//! Seam to the host metrics source.
//!
//! The snapshot builder only talks to [`MetricsProvider`]; the production
//! implementation lives in [`crate::system`], tests plug in scripted fakes.

use std::path::Path;

use crate::error::ProcessReadError;

/// User name used when a process owner cannot be resolved.
pub const UNKNOWN_USER: &str = "N/A";

/// Used/total pair with its percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Usage {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

impl Usage {
    /// Build from byte counts; an empty total reads as 0%.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn from_bytes(used: u64, total: u64) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        Self {
            used,
            total,
            percent,
        }
    }
}

/// 1, 5 and 15 minute load averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Cumulative interface byte counters, summed over all interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One readable process, with every field resolved at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    /// Owner name, or [`UNKNOWN_USER`].
    pub user: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub command: String,
}

/// Source of host metrics. Every call reads current values.
pub trait MetricsProvider: Send {
    /// Machine-wide CPU usage in percent.
    fn cpu_percent_aggregate(&mut self) -> f64;

    /// Per-core CPU usage in percent, in core order.
    fn cpu_percent_per_core(&mut self) -> Vec<f64>;

    fn memory(&mut self) -> Usage;

    fn swap(&mut self) -> Usage;

    /// Usage of the filesystem mounted at (or containing) `path`.
    fn disk_usage(&mut self, path: &Path) -> Usage;

    fn load_averages(&mut self) -> LoadAverage;

    fn network_counters(&mut self) -> NetworkCounters;

    /// All processes; each read succeeds or fails on its own.
    fn processes(&mut self) -> Vec<Result<ProcessRecord, ProcessReadError>>;
}
