//! `sysinfo`-backed metrics and platform providers.

use std::path::Path;

use chrono::{DateTime, Utc};
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessStatus,
    ProcessesToUpdate, RefreshKind, System, UpdateKind, Users,
};
use tracing::debug;

use crate::error::ProcessReadError;
use crate::platform::{PlatformInfo, PlatformProvider};
use crate::provider::{
    LoadAverage, MetricsProvider, NetworkCounters, ProcessRecord, UNKNOWN_USER, Usage,
};

/// Reusable `sysinfo` handles; CPU usage needs the previous refresh as a baseline.
pub struct SysinfoProvider {
    sys: System,
    disks: Disks,
    networks: Networks,
    users: Users,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::everything()),
        );
        // Baseline for the first usage delta
        sys.refresh_cpu_usage();

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent_aggregate(&mut self) -> f64 {
        f64::from(self.sys.global_cpu_usage())
    }

    fn cpu_percent_per_core(&mut self) -> Vec<f64> {
        self.sys.refresh_cpu_usage();
        self.sys
            .cpus()
            .iter()
            .map(|cpu| f64::from(cpu.cpu_usage()))
            .collect()
    }

    fn memory(&mut self) -> Usage {
        self.sys.refresh_memory();
        Usage::from_bytes(self.sys.used_memory(), self.sys.total_memory())
    }

    fn swap(&mut self) -> Usage {
        Usage::from_bytes(self.sys.used_swap(), self.sys.total_swap())
    }

    fn disk_usage(&mut self, path: &Path) -> Usage {
        self.disks.refresh(true);
        // Deepest mount point containing `path`
        let disk = self
            .disks
            .list()
            .iter()
            .filter(|d| path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len());

        disk.map_or_else(Usage::default, |d| {
            let total = d.total_space();
            Usage::from_bytes(total.saturating_sub(d.available_space()), total)
        })
    }

    fn load_averages(&mut self) -> LoadAverage {
        let load = System::load_average();
        LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        }
    }

    fn network_counters(&mut self) -> NetworkCounters {
        self.networks.refresh(true);
        self.networks
            .iter()
            .fold(NetworkCounters::default(), |acc, (_name, data)| {
                NetworkCounters {
                    bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
                    bytes_recv: acc.bytes_recv.saturating_add(data.total_received()),
                }
            })
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn processes(&mut self) -> Vec<Result<ProcessRecord, ProcessReadError>> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
        let total_memory = self.sys.total_memory().max(1) as f64;
        let users = &self.users;

        let records: Vec<_> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, proc)| {
                let pid = pid.as_u32();
                if matches!(proc.status(), ProcessStatus::Zombie | ProcessStatus::Dead) {
                    return Err(ProcessReadError::Zombie { pid });
                }
                let user = proc
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map_or_else(|| UNKNOWN_USER.to_owned(), |u| u.name().to_owned());
                Ok(ProcessRecord {
                    pid,
                    user,
                    cpu_percent: f64::from(proc.cpu_usage()),
                    mem_percent: proc.memory() as f64 / total_memory * 100.0,
                    command: proc.name().to_string_lossy().into_owned(),
                })
            })
            .collect();
        debug!(count = records.len(), "enumerated processes");
        records
    }
}

impl PlatformProvider for SysinfoProvider {
    #[allow(clippy::cast_possible_wrap, clippy::as_conversions)]
    fn platform(&self) -> PlatformInfo {
        let name = System::name().unwrap_or_else(|| "Unknown".into());
        let os = match System::long_os_version() {
            Some(long) if long != name => format!("{name} ({long})"),
            _ => name,
        };
        let processor = self
            .sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_owned())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "Unknown CPU".into());

        PlatformInfo {
            os,
            kernel: System::kernel_version().unwrap_or_else(|| "?".into()),
            host: System::host_name().unwrap_or_else(|| "localhost".into()),
            processor,
            cores: self.sys.cpus().len(),
            boot_time: DateTime::<Utc>::from_timestamp(System::boot_time() as i64, 0)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_live_host_without_nan() {
        let mut provider = SysinfoProvider::new();
        let memory = provider.memory();
        assert!(memory.percent.is_finite());
        assert!(memory.used <= memory.total);

        for core in provider.cpu_percent_per_core() {
            assert!(core.is_finite());
        }
        assert!(provider.disk_usage(Path::new("/")).percent.is_finite());
    }

    #[test]
    fn platform_has_identity() {
        let provider = SysinfoProvider::new();
        let platform = provider.platform();
        assert!(!platform.os.is_empty());
        assert!(!platform.host.is_empty());
    }
}
