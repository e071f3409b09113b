//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the settings it
//! changes:
//!
//! ```json
//! { "kernel": { "tuning": { "realism": "sim", ... } }, "max_ticks": 2000 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_logic::sim::kernel::KernelContext;
use skirmish_logic::sim::tuning::{Realism, SimulationTuning};
use skirmish_logic::units::I32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Passed to every `step_world` call.
    pub kernel: KernelContext,
    /// Run the AI layer for entities that have a policy.
    pub ai_enabled: bool,
    /// Grid cell for AI perception. `None` reuses the kernel cell size.
    pub ai_cell_size_m: Option<I32>,
    /// Upper bound for `run_until_resolved`.
    pub max_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kernel: KernelContext::default(),
            ai_enabled: true,
            ai_cell_size_m: None,
            max_ticks: 1200,
        }
    }
}

impl EngineConfig {
    pub fn with_realism(realism: Realism) -> Self {
        let mut cfg = Self::default();
        cfg.kernel.tuning = SimulationTuning::for_realism(realism);
        cfg
    }

    pub fn ai_cell_size(&self) -> I32 {
        self.ai_cell_size_m.filter(|c| *c > 0).unwrap_or_else(|| self.kernel.cell_size())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_json_str(&text)?;
        log::info!("loaded engine config from {}", path.as_ref().display());
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors that can occur while loading a config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
