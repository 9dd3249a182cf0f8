use crate::persistence::{load_slot, save_slot, FileStorage, MemoryStorage, Slot, SlotStorage};
use crate::store::{GoalStore, HistoryStore, SettingsStore, TaskStore, TimerStore};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Every store plus the backend they persist to. Built once at startup and
/// passed to whatever needs it.
pub struct AppContext {
    pub tasks: TaskStore,
    pub goals: GoalStore,
    pub history: HistoryStore,
    pub settings: SettingsStore,
    /// In-memory only; never saved
    pub timer: TimerStore,
    storage: Box<dyn SlotStorage>,
}

impl AppContext {
    /// Load every slot from `storage`. Empty slots start from defaults.
    pub fn load(storage: Box<dyn SlotStorage>) -> Result<Self> {
        let tasks = load_slot::<TaskStore>(storage.as_ref(), Slot::Tasks)
            .context("Failed to load tasks")?
            .unwrap_or_default();
        let goals = load_slot::<GoalStore>(storage.as_ref(), Slot::Goals)
            .context("Failed to load goals")?
            .unwrap_or_default();
        let history = load_slot::<HistoryStore>(storage.as_ref(), Slot::History)
            .context("Failed to load history")?
            .map(HistoryStore::normalized)
            .unwrap_or_default();
        let settings = load_slot::<SettingsStore>(storage.as_ref(), Slot::Settings)
            .context("Failed to load settings")?
            .unwrap_or_default();

        info!(
            tasks = tasks.all().len(),
            goals = goals.all().len(),
            history_rows = history.all().len(),
            "state loaded"
        );

        Ok(Self {
            tasks,
            goals,
            history,
            settings,
            timer: TimerStore::new(),
            storage,
        })
    }

    /// Load from a directory with one JSON file per slot
    pub fn open(dir: &Path) -> Result<Self> {
        debug!(dir = %dir.display(), "opening data directory");
        Self::load(Box::new(FileStorage::new(dir)))
    }

    /// Fresh context that keeps everything in memory
    pub fn in_memory() -> Self {
        Self {
            tasks: TaskStore::new(),
            goals: GoalStore::new(),
            history: HistoryStore::new(),
            settings: SettingsStore::new(),
            timer: TimerStore::new(),
            storage: Box::new(MemoryStorage::new()),
        }
    }

    pub fn needs_save(&self) -> bool {
        self.tasks.needs_save()
            || self.goals.needs_save()
            || self.history.needs_save()
            || self.settings.needs_save()
    }

    /// Write every slot and clear the dirty flags
    pub fn save(&mut self) -> Result<()> {
        save_slot(self.storage.as_mut(), Slot::Tasks, &self.tasks)?;
        save_slot(self.storage.as_mut(), Slot::Goals, &self.goals)?;
        save_slot(self.storage.as_mut(), Slot::History, &self.history)?;
        save_slot(self.storage.as_mut(), Slot::Settings, &self.settings)?;

        self.tasks.mark_saved();
        self.goals.mark_saved();
        self.history.mark_saved();
        self.settings.mark_saved();
        Ok(())
    }

    /// Write only the slots whose store changed. Returns whether anything was
    /// written.
    pub fn save_if_needed(&mut self) -> Result<bool> {
        let mut saved = false;

        if self.tasks.needs_save() {
            save_slot(self.storage.as_mut(), Slot::Tasks, &self.tasks)?;
            self.tasks.mark_saved();
            saved = true;
        }
        if self.goals.needs_save() {
            save_slot(self.storage.as_mut(), Slot::Goals, &self.goals)?;
            self.goals.mark_saved();
            saved = true;
        }
        if self.history.needs_save() {
            save_slot(self.storage.as_mut(), Slot::History, &self.history)?;
            self.history.mark_saved();
            saved = true;
        }
        if self.settings.needs_save() {
            save_slot(self.storage.as_mut(), Slot::Settings, &self.settings)?;
            self.settings.mark_saved();
            saved = true;
        }

        Ok(saved)
    }
}
