use crate::domain::{Settings, SettingsPatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Holds the single settings record. The fields are stored flat in the slot
/// state, next to each other rather than under a nested key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    #[serde(flatten)]
    settings: Settings,
    #[serde(skip)]
    needs_save: bool,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            needs_save: false,
        }
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn mark_saved(&mut self) {
        self.needs_save = false;
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Merge `patch` into the current settings. A zero task cap is ignored.
    pub fn update(&mut self, patch: SettingsPatch) {
        if patch.max_daily_tasks == Some(0) {
            debug!("ignoring max_daily_tasks of 0");
        }
        self.settings.apply(patch);
        self.needs_save = true;
    }

    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.needs_save = true;
        debug!("settings reset to defaults");
    }
}
