//! Built-in resource checks.
//!
//! Both checks read through a pluggable probe so the threshold logic can be
//! exercised with fixed numbers. Probes make blocking syscalls and run on the
//! blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{PulseError, Result};

use super::{Health, HealthCheck};

/// `DOWN` below this share of free disk space.
pub const DISK_MIN_FREE_PERCENT: f64 = 10.0;
/// `DOWN` above this share of used memory.
pub const MEMORY_MAX_USED_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub free: u64,
    pub total: u64,
}

pub type DiskProbe = Arc<dyn Fn() -> Result<DiskUsage> + Send + Sync>;

pub struct DiskSpaceCheck {
    probe: DiskProbe,
    min_free_percent: f64,
}

impl DiskSpaceCheck {
    /// Check the filesystem holding `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_probe(Arc::new(move || disk_usage(&path)))
    }

    pub fn with_probe(probe: DiskProbe) -> Self {
        Self {
            probe,
            min_free_percent: DISK_MIN_FREE_PERCENT,
        }
    }

    pub fn min_free_percent(mut self, percent: f64) -> Self {
        self.min_free_percent = percent;
        self
    }

    /// Verdict for one reading.
    pub fn evaluate(&self, usage: DiskUsage) -> Result<Health> {
        if usage.total == 0 {
            return Err(PulseError::CheckEvaluation("filesystem reports zero total space".into()));
        }
        let free_percent = usage.free as f64 / usage.total as f64 * 100.0;
        let health = if free_percent < self.min_free_percent {
            Health::down().with_detail("error", "insufficient disk space")
        } else {
            Health::up()
        };
        Ok(health
            .with_detail("freeSpace", usage.free)
            .with_detail("totalSpace", usage.total)
            .with_detail("freeSpacePercent", format!("{free_percent:.2}%")))
    }
}

#[async_trait]
impl HealthCheck for DiskSpaceCheck {
    async fn check(&self) -> Result<Health> {
        self.evaluate(run_probe(Arc::clone(&self.probe)).await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used: u64,
    pub max: u64,
}

pub type MemoryProbe = Arc<dyn Fn() -> Result<MemoryUsage> + Send + Sync>;

pub struct MemoryCheck {
    probe: MemoryProbe,
    max_used_percent: f64,
}

impl Default for MemoryCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCheck {
    /// System memory as reported by the OS.
    pub fn new() -> Self {
        Self::with_probe(Arc::new(memory_usage))
    }

    pub fn with_probe(probe: MemoryProbe) -> Self {
        Self {
            probe,
            max_used_percent: MEMORY_MAX_USED_PERCENT,
        }
    }

    pub fn max_used_percent(mut self, percent: f64) -> Self {
        self.max_used_percent = percent;
        self
    }

    pub fn evaluate(&self, usage: MemoryUsage) -> Result<Health> {
        if usage.max == 0 {
            return Err(PulseError::CheckEvaluation("memory limit reported as zero".into()));
        }
        let used_percent = usage.used as f64 / usage.max as f64 * 100.0;
        let health = if used_percent > self.max_used_percent {
            Health::down().with_detail("error", "memory usage too high")
        } else {
            Health::up()
        };
        Ok(health
            .with_detail("maxMemory", usage.max)
            .with_detail("usedMemory", usage.used)
            .with_detail("freeMemory", usage.max.saturating_sub(usage.used))
            .with_detail("memoryUsagePercent", format!("{used_percent:.2}%")))
    }
}

#[async_trait]
impl HealthCheck for MemoryCheck {
    async fn check(&self) -> Result<Health> {
        self.evaluate(run_probe(Arc::clone(&self.probe)).await?)
    }
}

/// Run `probe` via `spawn_blocking`; a panicking probe resumes its panic here.
async fn run_probe<T>(probe: Arc<dyn Fn() -> Result<T> + Send + Sync>) -> Result<T>
where
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(move || probe()).await {
        Ok(res) => res,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(PulseError::CheckEvaluation(format!("probe task: {e}"))),
    }
}

/// Free (available to unprivileged users) and total bytes of the filesystem at `path`.
#[cfg(unix)]
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| PulseError::CheckEvaluation(format!("invalid path: {}", path.display())))?;
    let mut st = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: `c_path` is NUL-terminated and `st` is a writable statvfs buffer.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), st.as_mut_ptr()) };
    if rc != 0 {
        return Err(PulseError::CheckEvaluation(format!(
            "statvfs {}: {}",
            path.display(),
            std::io::Error::last_os_error()
        )));
    }
    // SAFETY: statvfs returned 0, so the buffer is initialised.
    let st = unsafe { st.assume_init() };
    let frsize = st.f_frsize as u64;
    Ok(DiskUsage {
        free: (st.f_bavail as u64).saturating_mul(frsize),
        total: (st.f_blocks as u64).saturating_mul(frsize),
    })
}

#[cfg(not(unix))]
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    Err(PulseError::CheckEvaluation(format!(
        "disk usage unavailable on this platform ({})",
        path.display()
    )))
}

/// `MemTotal - MemAvailable` over `MemTotal`, from `/proc/meminfo`.
#[cfg(target_os = "linux")]
pub fn memory_usage() -> Result<MemoryUsage> {
    let info = std::fs::read_to_string("/proc/meminfo")
        .map_err(|e| PulseError::CheckEvaluation(format!("read /proc/meminfo: {e}")))?;
    parse_meminfo(&info)
}

#[cfg(not(target_os = "linux"))]
pub fn memory_usage() -> Result<MemoryUsage> {
    Err(PulseError::CheckEvaluation(
        "memory usage unavailable on this platform".into(),
    ))
}

/// Parse the `MemTotal`/`MemAvailable` lines (kB) of a meminfo dump.
pub fn parse_meminfo(info: &str) -> Result<MemoryUsage> {
    let field = |name: &str| -> Option<u64> {
        info.lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.trim_start_matches(':').split_whitespace().next())
            .and_then(|kb| kb.parse::<u64>().ok())
            .and_then(|kb| kb.checked_mul(1024))
    };
    let total = field("MemTotal")
        .ok_or_else(|| PulseError::CheckEvaluation("meminfo: missing MemTotal".into()))?;
    let available = field("MemAvailable")
        .ok_or_else(|| PulseError::CheckEvaluation("meminfo: missing MemAvailable".into()))?;
    Ok(MemoryUsage {
        used: total.saturating_sub(available),
        max: total,
    })
}
