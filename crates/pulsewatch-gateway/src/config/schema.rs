use serde::Deserialize;
use pulsewatch_core::error::{PulseError, Result};
use pulsewatch_core::health::checks::{DISK_MIN_FREE_PERCENT, MEMORY_MAX_USED_PERCENT};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PulseConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub health: HealthSection,

    #[serde(default)]
    pub samples: SampleSection,
}

impl PulseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PulseError::UnsupportedVersion);
        }

        self.health.validate()?;
        self.samples.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthSection {
    #[serde(default = "default_disk_path")]
    pub disk_path: String,

    #[serde(default = "default_disk_min_free_percent")]
    pub disk_min_free_percent: f64,

    #[serde(default = "default_memory_max_used_percent")]
    pub memory_max_used_percent: f64,
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            disk_path: default_disk_path(),
            disk_min_free_percent: default_disk_min_free_percent(),
            memory_max_used_percent: default_memory_max_used_percent(),
        }
    }
}

impl HealthSection {
    pub fn validate(&self) -> Result<()> {
        if self.disk_path.is_empty() {
            return Err(PulseError::BadRequest("health.disk_path must not be empty".into()));
        }
        if !(0.0..=100.0).contains(&self.disk_min_free_percent) {
            return Err(PulseError::BadRequest(
                "health.disk_min_free_percent must be between 0 and 100".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.memory_max_used_percent) {
            return Err(PulseError::BadRequest(
                "health.memory_max_used_percent must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_seed_records")]
    pub seed_records: usize,
}

impl Default for SampleSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            seed_records: default_seed_records(),
        }
    }
}

impl SampleSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=3_600_000).contains(&self.interval_ms) {
            return Err(PulseError::BadRequest(
                "samples.interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if self.seed_records > 1000 {
            return Err(PulseError::BadRequest(
                "samples.seed_records must be at most 1000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_disk_path() -> String {
    "/".into()
}
fn default_disk_min_free_percent() -> f64 {
    DISK_MIN_FREE_PERCENT
}
fn default_memory_max_used_percent() -> f64 {
    MEMORY_MAX_USED_PERCENT
}
fn default_interval_ms() -> u64 {
    60000
}
fn default_seed_records() -> usize {
    10
}
