// ── Core error types ──
//
// Per-process read failures are the only errors the metrics side produces.
// They are transient by nature (a process exits between enumeration and
// read) and the snapshot builder drops the affected row.

use thiserror::Error;

/// Why a single process could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessReadError {
    #[error("process {pid} exited before it could be read")]
    Vanished { pid: u32 },

    #[error("access to process {pid} denied")]
    AccessDenied { pid: u32 },

    #[error("process {pid} is a zombie")]
    Zombie { pid: u32 },
}

impl ProcessReadError {
    pub fn pid(&self) -> u32 {
        match self {
            Self::Vanished { pid } | Self::AccessDenied { pid } | Self::Zombie { pid } => *pid,
        }
    }
}
