// PageKeeper Settings Engine
// Loads, updates and resets agent settings kept as a JSON file at the platform config path.
// PAGEKEEPER_API_BASE overrides the service URL in memory without being written back.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AgentSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AgentSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    /// Persisted settings, without environment overrides.
    fn get_settings(&self) -> &AgentSettings;
    /// Settings in force: persisted values with environment overrides applied.
    fn effective(&self) -> AgentSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

pub struct SettingsEngine {
    config_path: PathBuf,
    settings: AgentSettings,
    api_base_override: Option<String>,
}

impl SettingsEngine {
    /// Uses `path_override` when given, otherwise `PAGEKEEPER_CONFIG` or the platform default.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self {
            config_path: path_override.unwrap_or_else(platform::get_settings_path),
            settings: AgentSettings::default(),
            api_base_override: platform::api_base_override(),
        }
    }

    /// Replaces the service URL override read from the environment.
    pub fn with_api_base_override(mut self, base: Option<String>) -> Self {
        self.api_base_override = base;
        self
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file means defaults; a malformed or out-of-range file is an error.
    fn load(&mut self) -> Result<AgentSettings, SettingsError> {
        if !self.config_path.exists() {
            debug!("no settings file at {}, using defaults", self.config_path.display());
            self.settings = AgentSettings::default();
            return Ok(self.effective());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;
        let parsed: AgentSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        parsed.validate()?;
        self.settings = parsed;
        info!("loaded settings from {}", self.config_path.display());
        Ok(self.effective())
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &AgentSettings {
        &self.settings
    }

    fn effective(&self) -> AgentSettings {
        let mut settings = self.settings.clone();
        if let Some(base) = &self.api_base_override {
            settings.service.base_url = base.clone();
        }
        settings
    }

    /// Updates one value by dot path (`reminders.meeting_lead_minutes`) and saves.
    ///
    /// The key must already exist and the new tree must deserialize and validate.
    /// A rejected value leaves the settings and the file untouched.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Err(SettingsError::InvalidKey(key.to_string())),
        };
        let mut current = &mut tree;
        for part in parents {
            current = current
                .get_mut(*part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        }
        match current {
            serde_json::Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )))
            }
        }

        let updated: AgentSettings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        updated.validate()?;
        self.settings = updated;
        info!("setting {} updated", key);
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AgentSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
