use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fleet::EngineType;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Raw permission table: role token -> status token -> grant tokens.
///
/// Kept as strings so that a bad token in a user file is skipped with a
/// warning instead of rejecting the whole file.
pub type PermissionTable = BTreeMap<String, BTreeMap<String, Vec<String>>>;

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub fuel_efficiency: FuelEfficiencyConfig,
    #[serde(default)]
    pub permissions: PermissionTable,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub default_min_fuel_level: f64,
    #[serde(default)]
    pub max_allocation_attempts: usize,
    #[serde(default)]
    pub log_level: String,
    /// Audit trail path; `~` is expanded. Empty disables the trail.
    #[serde(default)]
    pub audit_log: String,
}

/// Bounds for the fuel-efficient allocation rule.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FuelEfficiencyConfig {
    #[serde(default)]
    pub efficient_engines: Vec<EngineType>,
    #[serde(default)]
    pub petrol_max_mileage: f64,
    #[serde(default)]
    pub petrol_min_max_speed: f64,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    fuel_efficiency: FuelEfficiencyOverlay,
    #[serde(default)]
    permissions: PermissionsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    default_min_fuel_level: Option<f64>,
    max_allocation_attempts: Option<usize>,
    log_level: Option<String>,
    audit_log: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FuelEfficiencyOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    efficient_engines: Vec<EngineType>,
    #[serde(default)]
    remove_efficient_engines: Vec<EngineType>,
    petrol_max_mileage: Option<f64>,
    petrol_min_max_speed: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct PermissionsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    remove_roles: Vec<String>,
    #[serde(flatten)]
    roles: PermissionTable,
}

// ── Merge logic ──

/// Fold overlay entries into `base`. With `replace`, `add` becomes the whole
/// list; otherwise entries in `remove` are dropped and `add` is appended,
/// skipping values `base` already holds, so existing order is preserved.
fn merge_list<T: PartialEq>(base: &mut Vec<T>, add: Vec<T>, remove: &[T], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Path of the user overlay: ~/.config/fleet-allocator/config.toml.
    pub fn user_config_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(Path::new(&home).join(".config/fleet-allocator/config.toml"))
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/fleet-allocator/config.toml (if exists)
    ///
    /// A broken overlay is reported on stderr and ignored, since this runs
    /// before a logger exists.
    pub fn load() -> Self {
        let Some(path) = Self::user_config_path().filter(|p| p.exists()) else {
            return Self::default_config();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("fleet-allocator: {e}");
                Self::default_config()
            }
        }
    }

    /// Defaults merged with the overlay file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_overlay_str(&content)
    }

    /// Defaults merged with an overlay given as TOML text.
    pub fn from_overlay_str(toml_str: &str) -> Result<Self, ConfigError> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        let mut config = Self::default_config();
        config.apply_overlay(overlay);
        Ok(config)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        let s = overlay.settings;
        if let Some(v) = s.default_min_fuel_level {
            self.settings.default_min_fuel_level = v;
        }
        if let Some(v) = s.max_allocation_attempts {
            self.settings.max_allocation_attempts = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.audit_log {
            self.settings.audit_log = v;
        }

        // Fuel efficiency
        let f = overlay.fuel_efficiency;
        merge_list(
            &mut self.fuel_efficiency.efficient_engines,
            f.efficient_engines,
            &f.remove_efficient_engines,
            f.replace,
        );
        if let Some(v) = f.petrol_max_mileage {
            self.fuel_efficiency.petrol_max_mileage = v;
        }
        if let Some(v) = f.petrol_min_max_speed {
            self.fuel_efficiency.petrol_min_max_speed = v;
        }

        // Permissions: an overlay cell replaces the default cell
        let p = overlay.permissions;
        if p.replace {
            self.permissions.clear();
        }
        for role in &p.remove_roles {
            self.permissions.remove(role);
        }
        for (role, cells) in p.roles {
            let entry = self.permissions.entry(role).or_default();
            for (status, grants) in cells {
                entry.insert(status, grants);
            }
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
