//! Static host identification shown in the system panel.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

/// Host facts that do not change while the dashboard runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    /// OS name, release and version, e.g. "Linux (Debian 12)".
    pub os: String,
    pub kernel: String,
    pub host: String,
    /// Processor brand of the first core.
    pub processor: String,
    pub cores: usize,
    pub boot_time: DateTime<Utc>,
}

impl PlatformInfo {
    /// Time since boot as of `now`. Zero if the clock reads before boot.
    pub fn uptime_at(&self, now: DateTime<Local>) -> Duration {
        now.with_timezone(&Utc)
            .signed_duration_since(self.boot_time)
            .to_std()
            .unwrap_or_default()
    }
}

/// Source of [`PlatformInfo`].
pub trait PlatformProvider {
    fn platform(&self) -> PlatformInfo;
}
