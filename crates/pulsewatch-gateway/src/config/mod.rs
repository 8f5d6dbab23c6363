//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use pulsewatch_core::error::{PulseError, Result};

pub use schema::{GatewaySection, HealthSection, PulseConfig, SampleSection};

/// Environment variable overriding the config path.
pub const CONFIG_PATH_ENV: &str = "PULSEWATCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pulsewatch.yaml";

pub fn load_from_file(path: &str) -> Result<PulseConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PulseError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PulseConfig> {
    let cfg: PulseConfig = serde_yaml::from_str(s)
        .map_err(|e| PulseError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Path from `PULSEWATCH_CONFIG`, falling back to `pulsewatch.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
