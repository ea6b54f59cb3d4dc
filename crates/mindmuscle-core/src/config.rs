use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WEIGHT_UNIT: &str = "kg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmuscleConfig {
    /// Where the collections are stored. Only honored in the global config.
    pub data_dir: Option<String>,
    /// Allowed study subjects, in the order they are offered.
    /// Unset or empty accepts any subject.
    pub subjects: Option<Vec<String>>,
    /// Unit label shown next to weights (e.g. "kg", "lb").
    pub weight_unit: Option<String>,
}

/// Effective settings for one data directory after layering configs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub subjects: Vec<String>,
    pub weight_unit: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            weight_unit: DEFAULT_WEIGHT_UNIT.to_string(),
        }
    }
}

pub fn config_filename_candidates() -> [&'static str; 2] {
    [".mindmuscle.toml", ".mindmusclerc"]
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".mindmuscle.toml")
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

pub fn resolve_mindmuscle_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var("MINDMUSCLE_HOME") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".mindmuscle"))
}

pub fn global_config_path() -> Option<PathBuf> {
    resolve_mindmuscle_home_dir().map(|home| home.join("config.toml"))
}

pub fn load_config(data_dir: &Path) -> Option<MindmuscleConfig> {
    for name in config_filename_candidates() {
        let path = data_dir.join(name);
        if path.is_file() {
            if let Ok(text) = fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str::<MindmuscleConfig>(&text) {
                    return Some(config);
                }
            }
        }
    }
    None
}

pub fn load_global_config() -> Option<MindmuscleConfig> {
    let path = global_config_path()?;
    if !path.is_file() {
        return None;
    }
    let text = fs::read_to_string(path).ok()?;
    toml::from_str::<MindmuscleConfig>(&text).ok()
}

pub fn write_config(data_dir: &Path, config: &MindmuscleConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path(data_dir);
    let body = toml::to_string_pretty(config)?;
    fs::write(&path, body)?;
    Ok(path)
}

/// Data directory: explicit flag, then the global config's `data_dir`, then
/// the MindMuscle home directory.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    let configured = load_global_config()
        .and_then(|config| config.data_dir)
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty());
    if let Some(dir) = configured {
        return Some(PathBuf::from(dir));
    }
    resolve_mindmuscle_home_dir()
}

pub fn resolve_subjects_with_source(data_dir: &Path) -> (Vec<String>, &'static str) {
    let clean = |values: Vec<String>| -> Vec<String> {
        values
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };
    if let Some(values) = load_config(data_dir).and_then(|config| config.subjects) {
        return (clean(values), "project");
    }
    if let Some(values) = load_global_config().and_then(|config| config.subjects) {
        return (clean(values), "global");
    }
    (Vec::new(), "default")
}

pub fn resolve_weight_unit_with_source(data_dir: &Path) -> (String, &'static str) {
    let pick = |config: MindmuscleConfig| {
        config
            .weight_unit
            .map(|unit| unit.trim().to_string())
            .filter(|unit| !unit.is_empty())
    };
    if let Some(unit) = load_config(data_dir).and_then(pick) {
        return (unit, "project");
    }
    if let Some(unit) = load_global_config().and_then(pick) {
        return (unit, "global");
    }
    (DEFAULT_WEIGHT_UNIT.to_string(), "default")
}

pub fn resolve_settings(data_dir: &Path) -> Settings {
    Settings {
        subjects: resolve_subjects_with_source(data_dir).0,
        weight_unit: resolve_weight_unit_with_source(data_dir).0,
    }
}
