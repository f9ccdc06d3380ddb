use serde::Serialize;
use std::time::Instant;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("process {0} not found in process table")]
    ProcessNotFound(u32),
    #[error("{0}")]
    Unavailable(String),
}

/// Memory figures for this process and the host, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_memory: u64,
    pub system_total: u64,
    pub system_used: u64,
}

/// Source of runtime statistics for health reports.
pub trait ProcessProbe: Send + Sync {
    /// Seconds since the process started, from a monotonic clock.
    fn uptime(&self) -> Result<f64, IntrospectionError>;

    fn memory(&self) -> Result<MemoryUsage, IntrospectionError>;
}

pub struct SysinfoProbe {
    started_at: Instant,
}

impl SysinfoProbe {
    pub fn new(started_at: Instant) -> Self {
        Self { started_at }
    }
}

impl ProcessProbe for SysinfoProbe {
    fn uptime(&self) -> Result<f64, IntrospectionError> {
        Ok(self.started_at.elapsed().as_secs_f64())
    }

    fn memory(&self) -> Result<MemoryUsage, IntrospectionError> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| IntrospectionError::Unavailable(e.to_string()))?;

        // Fresh System per call; only this pid and the memory totals are refreshed.
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let process = sys
            .process(pid)
            .ok_or(IntrospectionError::ProcessNotFound(pid.as_u32()))?;

        Ok(MemoryUsage {
            rss: process.memory(),
            virtual_memory: process.virtual_memory(),
            system_total: sys.total_memory(),
            system_used: sys.used_memory(),
        })
    }
}
