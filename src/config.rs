//! Engine settings and exchange-rate fallback.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{AuditContext, Investigation, InvestigationSnapshot, ProductConfig};
use crate::util::persistence::{project_dirs, PersistSaveError};

const SETTINGS_FILE: &str = "settings.json";

/// Rate used when the daily feed has nothing usable.
pub const DEFAULT_EXCHANGE_RATE: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub fallback_exchange_rate: f64,
    /// Defaults for products without their own pricing objectives.
    pub default_product: ProductConfig,
    /// Stamped on every snapshot as `valid_for_days`.
    pub snapshot_validity_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fallback_exchange_rate: DEFAULT_EXCHANGE_RATE,
            default_product: ProductConfig::default(),
            snapshot_validity_days: 30,
        }
    }
}

impl EngineSettings {
    pub fn resolve_exchange_rate(&self, daily_rate: Option<f64>) -> f64 {
        resolve_exchange_rate(daily_rate, self.fallback_exchange_rate)
    }

    /// Snapshot carrying the configured validity window.
    pub fn snapshot(
        &self,
        investigation: &Investigation,
        audit: &AuditContext,
    ) -> crate::error::Result<InvestigationSnapshot> {
        investigation.snapshot(audit, self.snapshot_validity_days)
    }
}

/// Returns the daily rate when it is finite and positive, else `fallback`.
pub fn resolve_exchange_rate(daily_rate: Option<f64>, fallback: f64) -> f64 {
    match daily_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        other => {
            warn!(rate = ?other, fallback, "no usable exchange rate, using fallback");
            fallback
        }
    }
}

fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

pub fn load_settings() -> EngineSettings {
    match settings_file() {
        Some(path) => load_settings_from(&path),
        None => {
            warn!("config directory unavailable, using default settings");
            EngineSettings::default()
        }
    }
}

/// Missing or unreadable files fall back to defaults; partial files keep
/// defaults for absent keys.
pub fn load_settings_from(path: &Path) -> EngineSettings {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            info!(path = %path.display(), %err, "no settings file, using defaults");
            return EngineSettings::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to parse settings, using defaults");
            EngineSettings::default()
        }
    }
}

pub fn save_settings(settings: &EngineSettings) -> Result<(), PersistSaveError> {
    let path = settings_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_settings_to(&path, settings)
}

pub fn save_settings_to(path: &Path, settings: &EngineSettings) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
